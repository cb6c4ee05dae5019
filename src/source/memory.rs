use std::collections::HashMap;

use super::bundle::ResourceBundle;
use super::manifest::Manifest;
use super::traits::{BundleSource, CodeUnit, ManifestSource};
use crate::error::{MetadataError, MetadataResult};

/// 内存中的清单来源，按代码单元名称索引
#[derive(Debug, Clone, Default)]
pub struct StaticManifestSource {
    manifests: HashMap<String, Manifest>,
}

impl StaticManifestSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manifest(mut self, unit_name: impl Into<String>, manifest: Manifest) -> Self {
        self.manifests.insert(unit_name.into(), manifest);
        self
    }
}

impl ManifestSource for StaticManifestSource {
    fn manifest_for(&self, unit: &CodeUnit) -> Option<Manifest> {
        self.manifests.get(unit.name()).cloned()
    }
}

/// 内存中的资源包来源
#[derive(Debug, Clone, Default)]
pub struct StaticBundleSource {
    bundles: HashMap<String, ResourceBundle>,
}

impl StaticBundleSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bundle(mut self, bundle: ResourceBundle) -> Self {
        self.bundles.insert(bundle.name().to_string(), bundle);
        self
    }
}

impl BundleSource for StaticBundleSource {
    fn bundle(&self, name: &str) -> MetadataResult<ResourceBundle> {
        self.bundles
            .get(name)
            .cloned()
            .ok_or_else(|| MetadataError::BundleNotFound {
                name: name.to_string(),
            })
    }
}
