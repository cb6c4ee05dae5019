//! 配置加载和管理模块
//! 处理配置文件的读取、写入、验证和环境变量覆盖

use super::types::*;
use super::validator::ConfigValidator;
use crate::util::logging::standards::events;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_BUNDLE_NAME: &str = "VERSION_HELPER_BUNDLE_NAME";
pub const ENV_BUNDLE_DIRS: &str = "VERSION_HELPER_BUNDLE_DIRS";
pub const ENV_PRODUCT_NAME: &str = "VERSION_HELPER_PRODUCT_NAME";
pub const ENV_LOG_LEVEL: &str = "VERSION_HELPER_LOG_LEVEL";
pub const ENV_LOG_JSON: &str = "VERSION_HELPER_LOG_JSON";

/// 默认配置文件名
pub const CONFIG_FILE_NAME: &str = "version-helper.yaml";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从YAML文件读取配置
    pub fn read_yaml(path: impl AsRef<Path>) -> Result<Config> {
        let config_str = fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&config_str)?;
        Ok(config)
    }

    /// 从进程环境变量读取配置覆盖
    pub fn apply_env_overrides(config: Config) -> Config {
        Self::apply_overrides_from(config, |key| std::env::var(key).ok())
    }

    /// 按给定的查找函数应用覆盖
    pub fn apply_overrides_from<F>(mut config: Config, lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup(ENV_BUNDLE_NAME) {
            let name = name.trim().to_string();
            tracing::debug!(event = events::CONFIG_ENV_OVERRIDE, key = ENV_BUNDLE_NAME, value = %name);
            config.bundle.name = name;
        }

        if let Some(dirs) = lookup(ENV_BUNDLE_DIRS) {
            let search_dirs: Vec<String> = std::env::split_paths(&dirs)
                .filter(|path| !path.as_os_str().is_empty())
                .map(|path| path.to_string_lossy().to_string())
                .collect();
            tracing::debug!(
                event = events::CONFIG_ENV_OVERRIDE,
                key = ENV_BUNDLE_DIRS,
                dirs = ?search_dirs
            );
            config.bundle.search_dirs = search_dirs;
        }

        if let Some(product_name) = lookup(ENV_PRODUCT_NAME) {
            tracing::debug!(
                event = events::CONFIG_ENV_OVERRIDE,
                key = ENV_PRODUCT_NAME,
                value = %product_name
            );
            config.placeholder.product_name = product_name;
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.logging.level = level.trim().to_ascii_lowercase();
        }

        if let Some(flag) = lookup(ENV_LOG_JSON) {
            match Self::parse_bool(&flag) {
                Ok(structured) => config.logging.structured = Some(structured),
                Err(()) => tracing::warn!(
                    event = events::CONFIG_ENV_INVALID,
                    key = ENV_LOG_JSON,
                    value = %flag,
                    "无法解析为布尔值"
                ),
            }
        }

        config
    }

    fn parse_bool(value: &str) -> Result<bool, ()> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => Ok(true),
            "false" | "0" | "no" | "n" => Ok(false),
            _ => Err(()),
        }
    }

    /// 智能配置加载：文件 → 环境变量覆盖 → 验证
    pub fn load_with_env_overrides(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let base_config = Self::read_yaml(path)?;
        let config = Self::apply_env_overrides(base_config);
        Self::validate_config(&config)?;

        tracing::debug!(event = events::CONFIG_LOAD_SUCCESS, path = %path.display());
        Ok(config)
    }

    /// 配置文件不存在时使用默认配置（仍然应用环境变量覆盖）
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load_with_env_overrides(path);
        }

        tracing::debug!(event = events::CONFIG_MISSING, path = %path.display(), "使用默认配置");
        let config = Self::apply_env_overrides(Config::default());
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// 验证配置的有效性
    pub fn validate_config(config: &Config) -> Result<()> {
        let report = ConfigValidator::validate_all(config);
        for warning in &report.warnings {
            tracing::warn!("[warn] 配置 {}: {}", warning.field, warning.message);
        }

        if report.has_errors() {
            let details = report
                .errors
                .iter()
                .map(|issue| format!("{}: {}", issue.field, issue.message))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(anyhow::anyhow!("配置验证失败: {}", details));
        }

        Ok(())
    }

    /// 查找配置文件路径，适应开发和部署环境
    pub fn find_config_file_path(filename: &str) -> PathBuf {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        // 当前目录下的 config/
        let config_in_current = current_dir.join("config").join(filename);
        if config_in_current.exists() {
            return config_in_current;
        }

        // 在 bin/ 目录运行时，尝试上级目录的 config/
        if let Some(parent) = current_dir.parent() {
            let config_in_parent = parent.join("config").join(filename);
            if config_in_parent.exists() {
                return config_in_parent;
            }
        }

        current_dir.join(filename)
    }
}

/// 配置写入器
pub struct ConfigWriter;

impl ConfigWriter {
    /// 将配置写入YAML文件
    pub fn write_yaml(config: &Config, path: impl AsRef<Path>) -> Result<()> {
        let yaml_content = serde_yaml::to_string(config)?;
        fs::write(path, yaml_content)?;
        Ok(())
    }

    /// 写入配置到指定路径，确保目录存在
    pub fn write_yaml_with_dir(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::write_yaml(config, path)
    }

    /// 生成配置模板
    pub fn generate_template(path: &Path) -> Result<()> {
        Self::write_yaml_with_dir(&Config::default(), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "bundle:\n  search_dirs: [\"conf\", \"res\"]\n").unwrap();

        let config = ConfigLoader::read_yaml(&path).unwrap();

        assert_eq!(config.bundle.name, DEFAULT_BUNDLE_NAME);
        assert_eq!(config.bundle.search_dirs, vec!["conf", "res"]);
        assert_eq!(config.placeholder.version, DEFAULT_VERSION_PLACEHOLDER);
        assert_eq!(config.placeholder.product_name, DEFAULT_PRODUCT_NAME);
        assert!(!config.logging.file.enabled);
    }

    #[test]
    fn env_overrides_apply() {
        let dirs = std::env::join_paths(["/opt/app/conf", "/etc/app"]).unwrap();
        let dirs = dirs.to_string_lossy().to_string();
        let lookup = lookup_from(&[
            (ENV_BUNDLE_NAME, " build "),
            (ENV_BUNDLE_DIRS, dirs.as_str()),
            (ENV_PRODUCT_NAME, "Reporting Server"),
            (ENV_LOG_LEVEL, "DEBUG"),
            (ENV_LOG_JSON, "yes"),
        ]);

        let config = ConfigLoader::apply_overrides_from(Config::default(), lookup);

        assert_eq!(config.bundle.name, "build");
        assert_eq!(config.bundle.search_dirs, vec!["/opt/app/conf", "/etc/app"]);
        assert_eq!(
            config.placeholder.unavailable_message(),
            "Reporting Server - No Version Information Available"
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.structured, Some(true));
    }

    #[test]
    fn invalid_bool_override_is_ignored() {
        let lookup = lookup_from(&[(ENV_LOG_JSON, "maybe")]);

        let config = ConfigLoader::apply_overrides_from(Config::default(), lookup);

        assert_eq!(config.logging.structured, None);
    }

    #[test]
    fn validation_rejects_empty_bundle_name() {
        let mut config = Config::default();
        config.bundle.name = String::new();

        let err = ConfigLoader::validate_config(&config).unwrap_err();

        assert!(err.to_string().contains("bundle.name"));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();

        let config = ConfigLoader::load_or_default(temp_dir.path().join(CONFIG_FILE_NAME)).unwrap();

        assert!(!config.bundle.name.is_empty());
    }

    #[test]
    fn template_round_trips_through_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config").join(CONFIG_FILE_NAME);

        ConfigWriter::generate_template(&path).unwrap();
        let config = Config::read_yaml(&path).unwrap();

        assert_eq!(config.bundle.name, DEFAULT_BUNDLE_NAME);
        assert_eq!(config.logging.file.prefix, "version-helper");
    }
}
