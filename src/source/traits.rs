use std::path::{Path, PathBuf};

use super::bundle::ResourceBundle;
use super::manifest::Manifest;
use crate::error::MetadataResult;

/// 代码单元：查询元数据时的作用域
///
/// `location` 指向包含该单元的制品（解包后的目录或清单文件本身）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeUnit {
    name: String,
    location: Option<PathBuf>,
}

impl CodeUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }
}

/// 制品清单来源
pub trait ManifestSource: Send + Sync {
    /// 查找代码单元所在制品的清单，没有则返回 `None`
    fn manifest_for(&self, unit: &CodeUnit) -> Option<Manifest>;
}

/// 资源包来源
pub trait BundleSource: Send + Sync {
    /// 按名称加载资源包
    fn bundle(&self, name: &str) -> MetadataResult<ResourceBundle>;
}
