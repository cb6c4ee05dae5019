//! 元数据读取错误
//!
//! 这些错误只在数据源内部流转，`VersionHelper` 会记录日志并回退为占位文本，
//! 不会返回给调用方。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("资源包不存在: {name}")]
    BundleNotFound { name: String },

    #[error("资源包缺少键: {key}")]
    MissingKey { key: String },

    #[error("{source_name} 第{line}行格式错误: {reason}")]
    Malformed {
        source_name: String,
        line: usize,
        reason: String,
    },

    #[error("读取元数据失败: {0}")]
    Io(#[from] std::io::Error),
}

impl MetadataError {
    pub(crate) fn malformed(source_name: &str, line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            source_name: source_name.to_string(),
            line,
            reason: reason.into(),
        }
    }
}

pub type MetadataResult<T> = std::result::Result<T, MetadataError>;
