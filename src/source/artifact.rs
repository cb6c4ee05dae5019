use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::ZipArchive;

use super::manifest::Manifest;
use super::traits::{CodeUnit, ManifestSource};
use crate::build_info;
use crate::error::{MetadataError, MetadataResult};
use crate::util::logging::standards::events;

pub const MANIFEST_DIR: &str = "META-INF";
pub const MANIFEST_FILE: &str = "MANIFEST.MF";
pub const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

const ARCHIVE_EXTENSIONS: &[&str] = &["jar", "zip", "war", "ear"];

/// 从制品读取 `META-INF/MANIFEST.MF`
///
/// 代码单元的 `location` 可以是解包目录、`.jar`/`.zip` 归档，或者直接指向清单文件。
/// 读取或解析失败都按“没有清单”处理。
#[derive(Debug, Clone, Default)]
pub struct ArtifactManifestSource;

impl ArtifactManifestSource {
    pub fn new() -> Self {
        Self
    }

    pub fn manifest_path(location: &Path) -> PathBuf {
        if location.is_dir() {
            location.join(MANIFEST_DIR).join(MANIFEST_FILE)
        } else {
            location.to_path_buf()
        }
    }

    fn is_archive(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ARCHIVE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
            .unwrap_or(false)
    }

    /// 归档内没有清单条目时返回 `None`
    fn read_archive_entry(path: &Path) -> MetadataResult<Option<String>> {
        let source_name = path.display().to_string();
        let mut archive = ZipArchive::new(File::open(path)?)
            .map_err(|err| zip_error(&source_name, err))?;

        let mut entry = match archive.by_name(MANIFEST_ENTRY) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(err) => return Err(zip_error(&source_name, err)),
        };

        let mut content = String::new();
        entry.read_to_string(&mut content)?;
        Ok(Some(content))
    }

    fn read_manifest_text(path: &Path) -> MetadataResult<Option<String>> {
        if Self::is_archive(path) {
            Self::read_archive_entry(path)
        } else {
            Ok(Some(fs::read_to_string(path)?))
        }
    }
}

fn zip_error(source_name: &str, err: ZipError) -> MetadataError {
    match err {
        ZipError::Io(io) => MetadataError::Io(io),
        other => MetadataError::malformed(source_name, 0, other.to_string()),
    }
}

impl ManifestSource for ArtifactManifestSource {
    fn manifest_for(&self, unit: &CodeUnit) -> Option<Manifest> {
        let location = unit.location()?;
        let path = Self::manifest_path(location);

        if !path.is_file() {
            tracing::debug!(
                event = events::MANIFEST_ABSENT,
                unit = %unit.name(),
                path = %path.display()
            );
            return None;
        }

        let content = match Self::read_manifest_text(&path) {
            Ok(Some(content)) => content,
            Ok(None) => {
                tracing::debug!(
                    event = events::MANIFEST_ABSENT,
                    unit = %unit.name(),
                    path = %path.display()
                );
                return None;
            }
            Err(err) => {
                tracing::warn!(
                    event = events::MANIFEST_UNREADABLE,
                    unit = %unit.name(),
                    path = %path.display(),
                    error = %err
                );
                return None;
            }
        };

        match Manifest::parse(&path.display().to_string(), &content) {
            Ok(manifest) => {
                tracing::debug!(
                    event = events::MANIFEST_LOADED,
                    unit = %unit.name(),
                    attributes = manifest.len()
                );
                Some(manifest)
            }
            Err(err) => {
                tracing::warn!(
                    event = events::MANIFEST_UNREADABLE,
                    unit = %unit.name(),
                    path = %path.display(),
                    error = %err
                );
                None
            }
        }
    }
}

/// 本程序自身的清单：编译期嵌入的构建元数据
#[derive(Debug, Clone, Default)]
pub struct EmbeddedManifestSource;

impl EmbeddedManifestSource {
    pub fn new() -> Self {
        Self
    }
}

impl ManifestSource for EmbeddedManifestSource {
    fn manifest_for(&self, unit: &CodeUnit) -> Option<Manifest> {
        if unit.name() == build_info::UNIT_NAME {
            Some(build_info::manifest())
        } else {
            None
        }
    }
}

/// 依次尝试多个清单来源，返回第一个命中的结果
#[derive(Default)]
pub struct ChainedManifestSource {
    sources: Vec<Box<dyn ManifestSource>>,
}

impl ChainedManifestSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl ManifestSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl ManifestSource for ChainedManifestSource {
    fn manifest_for(&self, unit: &CodeUnit) -> Option<Manifest> {
        self.sources
            .iter()
            .find_map(|source| source.manifest_for(unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticManifestSource;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_manifest(root: &Path, content: &str) -> PathBuf {
        let dir = root.join(MANIFEST_DIR);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(MANIFEST_FILE);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reads_manifest_from_exploded_artifact() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(
            temp_dir.path(),
            "Manifest-Version: 1.0\nImplementation-Title: T\nImplementation-Version: 1.2\n",
        );
        let unit = CodeUnit::new("core").with_location(temp_dir.path());

        let manifest = ArtifactManifestSource::new().manifest_for(&unit).unwrap();

        assert_eq!(manifest.title(), Some("T"));
        assert_eq!(manifest.version(), Some("1.2"));
    }

    #[test]
    fn accepts_location_pointing_at_manifest_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_manifest(temp_dir.path(), "Implementation-ProductID: P\n");
        let unit = CodeUnit::new("core").with_location(path);

        let manifest = ArtifactManifestSource::new().manifest_for(&unit).unwrap();

        assert_eq!(manifest.product_id(), Some("P"));
    }

    fn write_archive(path: &Path, entries: &[(&str, &str)]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn reads_manifest_from_packaged_jar() {
        let temp_dir = TempDir::new().unwrap();
        let jar = temp_dir.path().join("core.jar");
        write_archive(
            &jar,
            &[
                ("org/example/Core.class", "\u{0}"),
                (
                    MANIFEST_ENTRY,
                    "Manifest-Version: 1.0\r\nImplementation-Title: T\r\nImplementation-Version: 1.2\r\n",
                ),
            ],
        );
        let unit = CodeUnit::new("core").with_location(&jar);

        let manifest = ArtifactManifestSource::new().manifest_for(&unit).unwrap();
        assert_eq!(manifest.title(), Some("T"));
        assert_eq!(manifest.version(), Some("1.2"));

        let helper = crate::VersionHelper::new(
            ArtifactManifestSource::new(),
            crate::source::StaticBundleSource::new(),
        );
        let info = helper.version_info(&unit);
        assert!(info.is_from_manifest());
        assert_eq!(info.title(), Some("T"));
        assert_eq!(info.version(), Some("1.2"));
        assert_eq!(helper.version_information(&unit), "T 1.2");
    }

    #[test]
    fn archive_without_manifest_or_corrupt_is_absent() {
        let temp_dir = TempDir::new().unwrap();
        let jar = temp_dir.path().join("plain.zip");
        write_archive(&jar, &[("readme.txt", "no manifest here")]);
        let unit = CodeUnit::new("core").with_location(&jar);
        assert!(ArtifactManifestSource::new().manifest_for(&unit).is_none());

        let corrupt = temp_dir.path().join("broken.JAR");
        fs::write(&corrupt, "Implementation-Title: T\n").unwrap();
        let unit = CodeUnit::new("core").with_location(&corrupt);
        assert!(ArtifactManifestSource::new().manifest_for(&unit).is_none());
    }

    #[test]
    fn missing_or_malformed_manifest_is_absent() {
        let temp_dir = TempDir::new().unwrap();
        let unit = CodeUnit::new("core").with_location(temp_dir.path());
        assert!(ArtifactManifestSource::new().manifest_for(&unit).is_none());

        write_manifest(temp_dir.path(), "not a manifest\n");
        assert!(ArtifactManifestSource::new().manifest_for(&unit).is_none());

        assert!(ArtifactManifestSource::new()
            .manifest_for(&CodeUnit::new("unlocated"))
            .is_none());
    }

    #[test]
    fn embedded_source_only_serves_own_unit() {
        let source = EmbeddedManifestSource::new();

        let manifest = source
            .manifest_for(&CodeUnit::new(build_info::UNIT_NAME))
            .unwrap();
        assert_eq!(manifest.title(), Some(env!("CARGO_PKG_NAME")));
        assert_eq!(manifest.version(), Some(env!("CARGO_PKG_VERSION")));

        assert!(source.manifest_for(&CodeUnit::new("other")).is_none());
    }

    #[test]
    fn chain_returns_first_hit() {
        let first = StaticManifestSource::new().with_manifest(
            "core",
            Manifest::from_pairs([("Implementation-Version", "1.0")]),
        );
        let second = StaticManifestSource::new()
            .with_manifest(
                "core",
                Manifest::from_pairs([("Implementation-Version", "2.0")]),
            )
            .with_manifest(
                "plugin",
                Manifest::from_pairs([("Implementation-Version", "3.0")]),
            );
        let chain = ChainedManifestSource::new().with(first).with(second);

        assert_eq!(chain.len(), 2);
        let core = chain.manifest_for(&CodeUnit::new("core")).unwrap();
        assert_eq!(core.version(), Some("1.0"));
        let plugin = chain.manifest_for(&CodeUnit::new("plugin")).unwrap();
        assert_eq!(plugin.version(), Some("3.0"));
        assert!(chain.manifest_for(&CodeUnit::new("missing")).is_none());
    }
}
