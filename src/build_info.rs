//! Build-time metadata exposed at runtime.
//!
//! 这些值由 `build.rs` 写入编译期环境变量，作为本程序自身的“制品清单”。

use crate::source::manifest::{
    Manifest, IMPLEMENTATION_PRODUCT_ID, IMPLEMENTATION_TITLE, IMPLEMENTATION_VERSION,
};

pub const BUILD_VERSION: &str = env!("APP_BUILD_VERSION");
pub const BUILD_COMMIT: &str = env!("APP_BUILD_COMMIT");
pub const BUILD_TIMESTAMP: &str = env!("APP_BUILD_TIMESTAMP");
pub const PRODUCT_ID: &str = env!("APP_PRODUCT_ID");

/// 本程序自身的代码单元名称
pub const UNIT_NAME: &str = env!("CARGO_PKG_NAME");

pub const BUILD_VERSION_ATTRIBUTE: &str = "Build-Version";
pub const BUILD_COMMIT_ATTRIBUTE: &str = "Build-Commit";
pub const BUILD_TIMESTAMP_ATTRIBUTE: &str = "Build-Timestamp";

/// 以清单形式呈现的构建元数据
pub fn manifest() -> Manifest {
    Manifest::from_pairs([
        (IMPLEMENTATION_PRODUCT_ID, PRODUCT_ID),
        (IMPLEMENTATION_TITLE, env!("CARGO_PKG_NAME")),
        (IMPLEMENTATION_VERSION, env!("CARGO_PKG_VERSION")),
        (BUILD_VERSION_ATTRIBUTE, BUILD_VERSION),
        (BUILD_COMMIT_ATTRIBUTE, BUILD_COMMIT),
        (BUILD_TIMESTAMP_ATTRIBUTE, BUILD_TIMESTAMP),
    ])
}

/// Human-readable summary combining Cargo version and build metadata.
pub fn summary() -> String {
    format!(
        "{} {} (build {}, commit {}, built at {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        BUILD_VERSION,
        BUILD_COMMIT,
        BUILD_TIMESTAMP
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_carries_package_identity() {
        let manifest = manifest();

        assert_eq!(manifest.len(), 6);
        assert_eq!(manifest.product_id(), Some(PRODUCT_ID));
        assert_eq!(manifest.title(), Some("version-helper"));
        assert_eq!(manifest.version(), Some(env!("CARGO_PKG_VERSION")));
        assert_eq!(manifest.get(BUILD_COMMIT_ATTRIBUTE), Some(BUILD_COMMIT));
    }

    #[test]
    fn summary_mentions_version_and_commit() {
        let summary = summary();

        assert!(summary.starts_with("version-helper "));
        assert!(summary.contains(env!("CARGO_PKG_VERSION")));
        assert!(summary.contains(BUILD_COMMIT));
    }
}
