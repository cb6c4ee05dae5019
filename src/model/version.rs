use serde::Serialize;
use std::fmt;

/// 版本信息记录
///
/// 每次查询都会新建一份，构造后不可修改。`from_manifest` 表示数据来自制品清单
/// (manifest)，否则来自 `version` 资源包。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    product_id: Option<String>,
    title: Option<String>,
    version: Option<String>,
    version_major: Option<String>,
    version_minor: Option<String>,
    version_release: Option<String>,
    version_milestone: Option<String>,
    version_build: Option<String>,
    from_manifest: bool,
}

/// 从资源包依次读出的字段，读取中断时之前的字段保留
#[derive(Debug, Clone, Default)]
pub(crate) struct BundleFields {
    pub product_id: Option<String>,
    pub title: Option<String>,
    pub major: Option<String>,
    pub minor: Option<String>,
    pub release: Option<String>,
    pub milestone: Option<String>,
    pub build: Option<String>,
}

impl VersionInfo {
    /// 制品清单中的三个属性
    pub(crate) fn from_manifest(
        product_id: Option<String>,
        title: Option<String>,
        version: Option<String>,
    ) -> Self {
        Self {
            product_id,
            title,
            version,
            from_manifest: true,
            ..Default::default()
        }
    }

    /// `version` 只在资源包缺键时填入占位文本
    pub(crate) fn from_bundle(fields: BundleFields, version: Option<String>) -> Self {
        Self {
            product_id: fields.product_id,
            title: fields.title,
            version,
            version_major: fields.major,
            version_minor: fields.minor,
            version_release: fields.release,
            version_milestone: fields.milestone,
            version_build: fields.build,
            from_manifest: false,
        }
    }

    /// 两种来源都不可用时的记录，只填充 `version`
    pub fn unavailable(placeholder: impl Into<String>) -> Self {
        Self {
            version: Some(placeholder.into()),
            ..Default::default()
        }
    }

    pub fn product_id(&self) -> Option<&str> {
        self.product_id.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn version_major(&self) -> Option<&str> {
        self.version_major.as_deref()
    }

    pub fn version_minor(&self) -> Option<&str> {
        self.version_minor.as_deref()
    }

    pub fn version_release(&self) -> Option<&str> {
        self.version_release.as_deref()
    }

    pub fn version_milestone(&self) -> Option<&str> {
        self.version_milestone.as_deref()
    }

    pub fn version_build(&self) -> Option<&str> {
        self.version_build.as_deref()
    }

    pub fn is_from_manifest(&self) -> bool {
        self.from_manifest
    }

    /// 按 major.minor.release.milestone.build 顺序拼接已有的数字段
    pub fn numeric_version(&self) -> Option<String> {
        let parts: Vec<&str> = [
            &self.version_major,
            &self.version_minor,
            &self.version_release,
            &self.version_milestone,
            &self.version_build,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("."))
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expression = self
            .version
            .clone()
            .or_else(|| self.numeric_version())
            .unwrap_or_default();

        match self.title.as_deref() {
            Some(title) if !expression.is_empty() => write!(f, "{} {}", title, expression),
            Some(title) => f.write_str(title),
            None => f.write_str(&expression),
        }
    }
}
