//! Centralised logging metadata (event names, shared keys, etc.).

/// Canonical event names used across the crate.
pub mod events {
    /// Logging / configuration lifecycle.
    pub const LOG_INIT: &str = "log.init";
    pub const CONFIG_LOAD_SUCCESS: &str = "config.load.success";
    pub const CONFIG_MISSING: &str = "config.missing";
    pub const CONFIG_ENV_OVERRIDE: &str = "config.env_override";
    pub const CONFIG_ENV_INVALID: &str = "config.env_invalid";

    /// Artifact manifest lookup.
    pub const MANIFEST_LOADED: &str = "manifest.loaded";
    pub const MANIFEST_ABSENT: &str = "manifest.absent";
    pub const MANIFEST_UNREADABLE: &str = "manifest.unreadable";

    /// Resource bundle fallback.
    pub const BUNDLE_SEARCH_DIRS: &str = "bundle.search_dirs";
    pub const BUNDLE_LOCATED: &str = "bundle.located";
    pub const BUNDLE_UNAVAILABLE: &str = "bundle.unavailable";

    /// 版本查询结果
    pub const VERSION_RESOLVED: &str = "version.resolved";
}
