// 元数据来源抽象层

pub mod artifact;
pub mod bundle;
pub mod factory;
pub mod manifest;
pub mod memory;
pub mod traits;

pub use artifact::{ArtifactManifestSource, ChainedManifestSource, EmbeddedManifestSource};
pub use bundle::{DirectoryBundleSource, ResourceBundle};
pub use factory::SourceFactory;
pub use manifest::Manifest;
pub use memory::{StaticBundleSource, StaticManifestSource};
pub use traits::{BundleSource, CodeUnit, ManifestSource};
