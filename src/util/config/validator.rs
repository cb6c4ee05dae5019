//! 配置验证模块

use super::types::*;
use std::path::Path;

/// 配置验证器
pub struct ConfigValidator;

impl ConfigValidator {
    /// 全面验证配置
    pub fn validate_all(config: &Config) -> ValidationReport {
        let mut report = ValidationReport::new();

        Self::validate_bundle_config(&config.bundle, &mut report);
        Self::validate_placeholder_config(&config.placeholder, &mut report);
        Self::validate_logging_config(&config.logging, &mut report);

        report
    }

    /// 验证资源包配置
    fn validate_bundle_config(bundle: &BundleConfig, report: &mut ValidationReport) {
        if bundle.name.trim().is_empty() {
            report.add_error("bundle.name", "资源包名称不能为空");
        } else if bundle.name.contains(&['/', '\\'][..]) {
            report.add_error(
                "bundle.name",
                &format!("资源包名称不能包含路径分隔符: {}", bundle.name),
            );
        }

        if bundle.search_dirs.is_empty() {
            report.add_warning("bundle.search_dirs", "未配置查找目录，资源包回退将始终失败");
        }

        for dir in &bundle.search_dirs {
            if !Path::new(dir).is_dir() {
                report.add_info("bundle.search_dirs", &format!("目录不存在: {}", dir));
            }
        }
    }

    /// 验证占位文本
    fn validate_placeholder_config(placeholder: &PlaceholderConfig, report: &mut ValidationReport) {
        if placeholder.version.trim().is_empty() {
            report.add_error("placeholder.version", "占位文本不能为空");
        }
        if placeholder.product_name.trim().is_empty() {
            report.add_warning("placeholder.product_name", "产品名称为空");
        }
    }

    /// 验证日志配置
    fn validate_logging_config(logging: &LoggingConfig, report: &mut ValidationReport) {
        let valid_levels = ["off", "trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&logging.level.to_lowercase().as_str()) {
            report.add_error("logging.level", &format!("无效的日志级别: {}", logging.level));
        }

        if logging.file.enabled && logging.file.directory.trim().is_empty() {
            report.add_error("logging.file.directory", "启用文件日志时必须指定目录");
        }
    }
}

/// 验证报告
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub info: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors.push(ValidationIssue::new(field, message));
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationIssue::new(field, message));
    }

    pub fn add_info(&mut self, field: &str, message: &str) {
        self.info.push(ValidationIssue::new(field, message));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }
}

/// 验证问题
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let report = ConfigValidator::validate_all(&Config::default());

        assert!(report.is_valid());
    }

    #[test]
    fn reports_bad_bundle_name_and_level() {
        let mut config = Config::default();
        config.bundle.name = "../version".to_string();
        config.logging.level = "verbose".to_string();

        let report = ConfigValidator::validate_all(&config);

        let fields: Vec<&str> = report.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["bundle.name", "logging.level"]);
    }

    #[test]
    fn off_level_is_accepted() {
        let mut config = Config::default();
        config.logging.level = "OFF".to_string();

        let report = ConfigValidator::validate_all(&config);

        assert!(report.is_valid());
    }

    #[test]
    fn empty_search_dirs_is_a_warning() {
        let mut config = Config::default();
        config.bundle.search_dirs.clear();

        let report = ConfigValidator::validate_all(&config);

        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }
}
