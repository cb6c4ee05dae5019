//! 配置结构定义模块

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub const DEFAULT_BUNDLE_NAME: &str = "version";
pub const DEFAULT_VERSION_PLACEHOLDER: &str = "No Version Information Available";
pub const DEFAULT_PRODUCT_NAME: &str = "Pentaho BI Platform";

/// 主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bundle: BundleConfig,
    #[serde(default)]
    pub placeholder: PlaceholderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 资源包配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    /// 资源包名称，对应 `<name>.properties`
    #[serde(default = "default_bundle_name")]
    pub name: String,
    /// 按顺序查找的目录
    #[serde(default = "default_search_dirs")]
    pub search_dirs: Vec<String>,
}

impl BundleConfig {
    pub fn search_paths(&self) -> Vec<PathBuf> {
        self.search_dirs.iter().map(PathBuf::from).collect()
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            name: default_bundle_name(),
            search_dirs: default_search_dirs(),
        }
    }
}

/// 元数据不可用时的占位文本
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderConfig {
    #[serde(default = "default_version_placeholder")]
    pub version: String,
    #[serde(default = "default_product_name")]
    pub product_name: String,
}

impl PlaceholderConfig {
    /// 字符串查询失败时返回的完整文本
    pub fn unavailable_message(&self) -> String {
        format!("{} - {}", self.product_name, self.version)
    }
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            version: default_version_placeholder(),
            product_name: default_product_name(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: LogFileConfig,
    #[serde(default)]
    pub structured: Option<bool>,
    #[serde(default)]
    pub level_config: Option<LevelConfig>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: LogFileConfig::default(),
            structured: None,
            level_config: None,
        }
    }
}

/// 日志文件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogFileConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_log_directory")]
    pub directory: String,
    #[serde(default = "default_log_prefix")]
    pub prefix: String,
}

impl Default for LogFileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: default_log_directory(),
            prefix: default_log_prefix(),
        }
    }
}

/// 日志级别配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelConfig {
    /// 清单/资源包读取
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_bundle_name() -> String {
    DEFAULT_BUNDLE_NAME.to_string()
}

fn default_search_dirs() -> Vec<String> {
    vec![".".to_string()]
}

fn default_version_placeholder() -> String {
    DEFAULT_VERSION_PLACEHOLDER.to_string()
}

fn default_product_name() -> String {
    DEFAULT_PRODUCT_NAME.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_log_prefix() -> String {
    "version-helper".to_string()
}
