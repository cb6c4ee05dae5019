//! 版本信息查询
//!
//! 先查代码单元所在制品的清单，没有清单时回退到 `version` 资源包，两者都不可用时
//! 返回占位文本。任何失败都不会返回给调用方。

use crate::build_info;
use crate::error::MetadataResult;
use crate::model::version::{BundleFields, VersionInfo};
use crate::source::bundle::ResourceBundle;
use crate::source::traits::{BundleSource, CodeUnit, ManifestSource};
use crate::source::SourceFactory;
use crate::util::config::{Config, PlaceholderConfig, DEFAULT_BUNDLE_NAME};
use crate::util::logging::standards::events;
use std::path::PathBuf;

pub const KEY_PRODUCT_ID: &str = "impl.productID";
pub const KEY_TITLE: &str = "impl.title";
pub const KEY_MAJOR: &str = "release.major.number";
pub const KEY_MINOR: &str = "release.minor.number";
pub const KEY_MILESTONE: &str = "release.milestone.number";
pub const KEY_BUILD: &str = "release.build.number";

pub struct VersionHelper {
    manifests: Box<dyn ManifestSource>,
    bundles: Box<dyn BundleSource>,
    bundle_name: String,
    placeholder: PlaceholderConfig,
}

impl VersionHelper {
    pub fn new(
        manifests: impl ManifestSource + 'static,
        bundles: impl BundleSource + 'static,
    ) -> Self {
        Self {
            manifests: Box::new(manifests),
            bundles: Box::new(bundles),
            bundle_name: DEFAULT_BUNDLE_NAME.to_string(),
            placeholder: PlaceholderConfig::default(),
        }
    }

    /// 使用文件系统/嵌入式来源，`extra_dirs` 优先于配置的资源包目录
    pub fn from_config(config: &Config, extra_dirs: &[PathBuf]) -> Self {
        Self::new(
            SourceFactory::manifest_source(),
            SourceFactory::bundle_source(&config.bundle, extra_dirs),
        )
        .with_bundle_name(config.bundle.name.clone())
        .with_placeholder(config.placeholder.clone())
    }

    pub fn with_bundle_name(mut self, bundle_name: impl Into<String>) -> Self {
        self.bundle_name = bundle_name.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: PlaceholderConfig) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// 本程序自身的代码单元
    pub fn own_unit() -> CodeUnit {
        CodeUnit::new(build_info::UNIT_NAME)
    }

    pub fn own_version_info(&self) -> VersionInfo {
        self.version_info(&Self::own_unit())
    }

    pub fn own_version_information(&self) -> String {
        self.version_information(&Self::own_unit())
    }

    /// 查询版本记录
    pub fn version_info(&self, unit: &CodeUnit) -> VersionInfo {
        if let Some(manifest) = self.manifests.manifest_for(unit) {
            let info = VersionInfo::from_manifest(
                manifest.product_id().map(str::to_string),
                manifest.title().map(str::to_string),
                manifest.version().map(str::to_string),
            );
            tracing::debug!(event = events::VERSION_RESOLVED, unit = %unit.name(), from_manifest = true);
            return info;
        }

        let bundle = match self.bundles.bundle(&self.bundle_name) {
            Ok(bundle) => bundle,
            Err(err) => {
                tracing::warn!(
                    event = events::BUNDLE_UNAVAILABLE,
                    unit = %unit.name(),
                    bundle = %self.bundle_name,
                    error = %err
                );
                return VersionInfo::unavailable(self.placeholder.version.clone());
            }
        };

        let mut fields = BundleFields::default();
        match read_bundle_fields(&bundle, &mut fields) {
            Ok(()) => {
                tracing::debug!(event = events::VERSION_RESOLVED, unit = %unit.name(), from_manifest = false);
                VersionInfo::from_bundle(fields, None)
            }
            Err(err) => {
                // 缺键之前读到的字段保留
                tracing::warn!(
                    event = events::BUNDLE_UNAVAILABLE,
                    unit = %unit.name(),
                    bundle = %self.bundle_name,
                    error = %err
                );
                VersionInfo::from_bundle(fields, Some(self.placeholder.version.clone()))
            }
        }
    }

    /// 查询可读的版本字符串
    ///
    /// 清单带有 `Implementation-Version` 时返回 `<title> <version>`，否则返回
    /// `<title> <major>.<minor>.<milestone>.<build> (class)`。
    pub fn version_information(&self, unit: &CodeUnit) -> String {
        if let Some(manifest) = self.manifests.manifest_for(unit) {
            if let Some(version) = manifest.version() {
                return format!("{} {}", manifest.title().unwrap_or_default(), version);
            }
        }

        self.information_from_bundle().unwrap_or_else(|err| {
            tracing::warn!(
                event = events::BUNDLE_UNAVAILABLE,
                unit = %unit.name(),
                bundle = %self.bundle_name,
                error = %err
            );
            self.placeholder.unavailable_message()
        })
    }

    fn information_from_bundle(&self) -> MetadataResult<String> {
        let bundle = self.bundles.bundle(&self.bundle_name)?;

        Ok(format!(
            "{} {}.{}.{}.{} (class)",
            bundle.get(KEY_TITLE)?,
            bundle.get(KEY_MAJOR)?,
            bundle.get(KEY_MINOR)?,
            bundle.get(KEY_MILESTONE)?,
            bundle.get(KEY_BUILD)?
        ))
    }
}

/// 按 productID、title、major、minor、build、milestone 的顺序读取，遇到缺键即停止
fn read_bundle_fields(bundle: &ResourceBundle, fields: &mut BundleFields) -> MetadataResult<()> {
    fields.product_id = Some(bundle.get(KEY_PRODUCT_ID)?.to_string());
    fields.title = Some(bundle.get(KEY_TITLE)?.to_string());
    fields.major = Some(bundle.get(KEY_MAJOR)?.to_string());
    fields.minor = Some(bundle.get(KEY_MINOR)?.to_string());
    fields.build = Some(bundle.get(KEY_BUILD)?.to_string());

    let (release, milestone) = split_release_milestone(bundle.get(KEY_MILESTONE)?);
    fields.release = release;
    fields.milestone = milestone;
    Ok(())
}

/// 拆分 `release.milestone.number`，如 `3-4` → (`3`, `4`)
///
/// `-` 视同 `.`，只取前两段，末尾的空段忽略。
pub(crate) fn split_release_milestone(raw: &str) -> (Option<String>, Option<String>) {
    let normalized = raw.replace('-', ".");
    let mut parts: Vec<&str> = normalized.split('.').collect();
    if parts.len() > 1 {
        while parts.last() == Some(&"") {
            parts.pop();
        }
    }

    let mut parts = parts.into_iter().map(str::to_string);
    (parts.next(), parts.next())
}
