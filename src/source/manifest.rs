//! 制品清单 (MANIFEST.MF) 主段解析

use crate::error::{MetadataError, MetadataResult};

pub const IMPLEMENTATION_PRODUCT_ID: &str = "Implementation-ProductID";
pub const IMPLEMENTATION_TITLE: &str = "Implementation-Title";
pub const IMPLEMENTATION_VERSION: &str = "Implementation-Version";

/// 清单主段属性，属性名不区分大小写
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    attributes: Vec<(String, String)>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从键值对构造，后出现的同名属性覆盖先出现的
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut manifest = Self::new();
        for (name, value) in pairs {
            manifest.insert(name, value);
        }
        manifest
    }

    /// 解析清单文本，只读取主段（第一个空行之前）
    pub fn parse(source_name: &str, content: &str) -> MetadataResult<Self> {
        let mut manifest = Self::new();
        let mut current: Option<(String, String)> = None;

        for (index, raw) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.strip_suffix('\r').unwrap_or(raw);

            if line.is_empty() {
                break;
            }

            if let Some(continuation) = line.strip_prefix(' ') {
                match current.as_mut() {
                    Some((_, value)) => value.push_str(continuation),
                    None => {
                        return Err(MetadataError::malformed(
                            source_name,
                            line_no,
                            "续行之前没有属性",
                        ))
                    }
                }
                continue;
            }

            if let Some((name, value)) = current.take() {
                manifest.insert(name, value);
            }

            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| MetadataError::malformed(source_name, line_no, "缺少 ':' 分隔符"))?;

            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(MetadataError::malformed(
                    source_name,
                    line_no,
                    format!("无效的属性名: {:?}", name),
                ));
            }

            let value = value.strip_prefix(' ').ok_or_else(|| {
                MetadataError::malformed(source_name, line_no, "':' 之后缺少空格")
            })?;
            current = Some((name.to_string(), value.to_string()));
        }

        if let Some((name, value)) = current {
            manifest.insert(name, value);
        }

        Ok(manifest)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn product_id(&self) -> Option<&str> {
        self.get(IMPLEMENTATION_PRODUCT_ID)
    }

    pub fn title(&self) -> Option<&str> {
        self.get(IMPLEMENTATION_TITLE)
    }

    pub fn version(&self) -> Option<&str> {
        self.get(IMPLEMENTATION_VERSION)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
