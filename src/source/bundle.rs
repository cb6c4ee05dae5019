//! `.properties` 资源包解析与目录查找

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::traits::BundleSource;
use crate::error::{MetadataError, MetadataResult};

pub const BUNDLE_EXTENSION: &str = "properties";

/// 键值资源包
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceBundle {
    name: String,
    entries: HashMap<String, String>,
}

impl ResourceBundle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
        }
    }

    pub fn from_pairs<K, V>(name: impl Into<String>, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            entries: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// 解析 properties 文本
    ///
    /// 支持 `#`/`!` 注释、`=`/`:`/空白分隔、反斜杠续行以及 `\uXXXX` 转义。
    pub fn parse(name: &str, content: &str) -> MetadataResult<Self> {
        let mut bundle = Self::new(name);

        for (line_no, logical) in logical_lines(content) {
            let (raw_key, raw_value) = split_key_value(&logical);
            let key = unescape(name, line_no, raw_key)?;
            let value = unescape(name, line_no, raw_value)?;
            bundle.entries.insert(key, value);
        }

        Ok(bundle)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> MetadataResult<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| MetadataError::MissingKey {
                key: key.to_string(),
            })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{0c}')
}

/// 合并续行，返回 (起始行号, 逻辑行)，注释和空行不返回
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim_start_matches(is_blank);

        if pending.is_none() && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
            continue;
        }

        let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
        let continues = trailing % 2 == 1;
        let text = if continues {
            &line[..line.len() - 1]
        } else {
            line
        };

        let (start, mut buffer) = pending.take().unwrap_or_else(|| (index + 1, String::new()));
        buffer.push_str(text);

        if continues {
            pending = Some((start, buffer));
        } else {
            lines.push((start, buffer));
        }
    }

    // 文件末尾的续行
    if let Some(last) = pending {
        lines.push(last);
    }

    lines
}

/// 按第一个未转义的分隔符拆分键值，值保持转义形式
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    let mut separator = None;

    for (pos, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = pos;
                separator = Some(c);
                break;
            }
            c if is_blank(c) => {
                key_end = pos;
                separator = Some(c);
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = match separator {
        Some(sep) => &line[key_end + sep.len_utf8()..],
        None => "",
    };

    rest = rest.trim_start_matches(is_blank);
    if matches!(separator, Some(sep) if is_blank(sep)) {
        if let Some(stripped) = rest.strip_prefix(&['=', ':'][..]) {
            rest = stripped.trim_start_matches(is_blank);
        }
    }

    (key, rest)
}

fn unescape(source_name: &str, line_no: usize, raw: &str) -> MetadataResult<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{0c}'),
            Some('u') => {
                let high = read_code_unit(source_name, line_no, &mut chars)?;
                let decoded = if (0xD800..0xDC00).contains(&high) {
                    // 代理对：必须紧跟低位 \uXXXX
                    if chars.next() != Some('\\') || chars.next() != Some('u') {
                        return Err(MetadataError::malformed(
                            source_name,
                            line_no,
                            "高位代理之后缺少低位代理",
                        ));
                    }
                    let low = read_code_unit(source_name, line_no, &mut chars)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(MetadataError::malformed(
                            source_name,
                            line_no,
                            format!("无效的低位代理: {:04X}", low),
                        ));
                    }
                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    high
                };
                let ch = char::from_u32(decoded).ok_or_else(|| {
                    MetadataError::malformed(
                        source_name,
                        line_no,
                        format!("无效的 unicode 转义: {:04X}", decoded),
                    )
                })?;
                out.push(ch);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

fn read_code_unit(
    source_name: &str,
    line_no: usize,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> MetadataResult<u32> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.len() != 4 {
        return Err(MetadataError::malformed(
            source_name,
            line_no,
            "\\u 转义不足4位",
        ));
    }
    u32::from_str_radix(&digits, 16).map_err(|_| {
        MetadataError::malformed(
            source_name,
            line_no,
            format!("无效的 \\u 转义: \\u{}", digits),
        )
    })
}

/// 文件内容优先按 UTF-8 解码，失败时按 ISO-8859-1 解码
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
    }
}

/// 按顺序在若干目录中查找 `<name>.properties`
#[derive(Debug, Clone, Default)]
pub struct DirectoryBundleSource {
    search_dirs: Vec<PathBuf>,
}

impl DirectoryBundleSource {
    pub fn new<P: Into<PathBuf>>(search_dirs: impl IntoIterator<Item = P>) -> Self {
        Self {
            search_dirs: search_dirs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        let filename = format!("{}.{}", name, BUNDLE_EXTENSION);
        self.search_dirs
            .iter()
            .map(|dir| dir.join(&filename))
            .find(|candidate| candidate.is_file())
    }

    fn read(path: &Path, name: &str) -> MetadataResult<ResourceBundle> {
        let content = decode(fs::read(path)?);
        ResourceBundle::parse(name, &content)
    }
}

impl BundleSource for DirectoryBundleSource {
    fn bundle(&self, name: &str) -> MetadataResult<ResourceBundle> {
        let path = self
            .locate(name)
            .ok_or_else(|| MetadataError::BundleNotFound {
                name: name.to_string(),
            })?;

        tracing::debug!(
            event = crate::util::logging::standards::events::BUNDLE_LOCATED,
            bundle = %name,
            path = %path.display()
        );
        Self::read(&path, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_separators_and_comments() {
        let content = "# build numbers\n\
                       ! legacy comment\n\
                       impl.productID=P\n\
                       impl.title : Business Server\n\
                       release.major.number 1\n\
                       release.minor.number\t=\t2\n\
                       \n\
                       empty.value=\n";

        let bundle = ResourceBundle::parse("version", content).unwrap();

        assert_eq!(bundle.len(), 5);
        assert_eq!(bundle.get("impl.productID").unwrap(), "P");
        assert_eq!(bundle.get("impl.title").unwrap(), "Business Server");
        assert_eq!(bundle.get("release.major.number").unwrap(), "1");
        assert_eq!(bundle.get("release.minor.number").unwrap(), "2");
        assert_eq!(bundle.get("empty.value").unwrap(), "");
    }

    #[test]
    fn joins_continuation_lines() {
        let content = "impl.title=Business \\\n    Server\nnext=1\n";

        let bundle = ResourceBundle::parse("version", content).unwrap();

        assert_eq!(bundle.get("impl.title").unwrap(), "Business Server");
        assert_eq!(bundle.get("next").unwrap(), "1");
    }

    #[test]
    fn even_backslashes_do_not_continue() {
        let content = "path=C:\\\\\nnext=1\n";

        let bundle = ResourceBundle::parse("version", content).unwrap();

        assert_eq!(bundle.get("path").unwrap(), "C:\\");
        assert_eq!(bundle.get("next").unwrap(), "1");
    }

    #[test]
    fn decodes_escapes() {
        let content = "key\\ with\\ spaces=tab\\there\nunicode=caf\\u00e9 \\uD83D\\uDE00\n";

        let bundle = ResourceBundle::parse("version", content).unwrap();

        assert_eq!(bundle.get("key with spaces").unwrap(), "tab\there");
        assert_eq!(bundle.get("unicode").unwrap(), "café 😀");
    }

    #[test]
    fn rejects_short_unicode_escape() {
        let err = ResourceBundle::parse("version", "ok=1\nbad=\\u12\n").unwrap_err();

        match err {
            MetadataError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_key_is_reported() {
        let bundle = ResourceBundle::from_pairs("version", [("impl.title", "T")]);

        match bundle.get("impl.productID") {
            Err(MetadataError::MissingKey { key }) => assert_eq!(key, "impl.productID"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn directory_source_respects_search_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join("version.properties"), "impl.title=second\n").unwrap();

        let source = DirectoryBundleSource::new([first.path(), second.path()]);
        assert_eq!(source.bundle("version").unwrap().get("impl.title").unwrap(), "second");

        fs::write(first.path().join("version.properties"), "impl.title=first\n").unwrap();
        assert_eq!(source.bundle("version").unwrap().get("impl.title").unwrap(), "first");
    }

    #[test]
    fn directory_source_reports_missing_bundle() {
        let dir = TempDir::new().unwrap();
        let source = DirectoryBundleSource::new([dir.path()]);

        match source.bundle("version") {
            Err(MetadataError::BundleNotFound { name }) => assert_eq!(name, "version"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn latin1_files_are_decoded() {
        let dir = TempDir::new().unwrap();
        let mut bytes = b"impl.title=caf".to_vec();
        bytes.push(0xE9);
        bytes.push(b'\n');
        fs::write(dir.path().join("version.properties"), bytes).unwrap();

        let source = DirectoryBundleSource::new([dir.path()]);

        assert_eq!(source.bundle("version").unwrap().get("impl.title").unwrap(), "café");
    }
}
