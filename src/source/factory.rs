use std::path::PathBuf;

use super::artifact::{ArtifactManifestSource, ChainedManifestSource, EmbeddedManifestSource};
use super::bundle::DirectoryBundleSource;
use crate::util::config::BundleConfig;
use crate::util::logging::standards::events;

/// 按配置创建元数据来源
pub struct SourceFactory;

impl SourceFactory {
    /// 先查编译期嵌入的清单，再查代码单元所在制品的清单
    pub fn manifest_source() -> ChainedManifestSource {
        ChainedManifestSource::new()
            .with(EmbeddedManifestSource::new())
            .with(ArtifactManifestSource::new())
    }

    /// `extra_dirs` 排在配置的查找目录之前
    pub fn bundle_source(config: &BundleConfig, extra_dirs: &[PathBuf]) -> DirectoryBundleSource {
        let search_dirs: Vec<PathBuf> = extra_dirs
            .iter()
            .cloned()
            .chain(config.search_paths())
            .collect();

        tracing::debug!(
            event = events::BUNDLE_SEARCH_DIRS,
            bundle = %config.name,
            dirs = ?search_dirs,
            "资源包查找目录"
        );
        DirectoryBundleSource::new(search_dirs)
    }
}
