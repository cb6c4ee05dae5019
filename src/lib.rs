//! 读取产品构建/版本元数据
//!
//! 优先读取代码单元所在制品的清单 (MANIFEST.MF)，没有清单时回退到
//! `version.properties` 资源包，两者都不可用时返回占位文本。

pub mod build_info;
pub mod error;
pub mod helper;
pub mod model;
pub mod source;
pub mod util;

pub use error::{MetadataError, MetadataResult};
pub use helper::VersionHelper;
pub use model::VersionInfo;
pub use source::{BundleSource, CodeUnit, Manifest, ManifestSource, ResourceBundle};
pub use util::config::Config;

/// 查找配置文件路径，适应开发和部署环境
pub fn find_config_file_path(filename: &str) -> std::path::PathBuf {
    util::config::ConfigLoader::find_config_file_path(filename)
}
