//! # `bourse-store` - 平面文件存储
//!
//! 代码列表为一行一个代码的文本文件，阈值为 `TICKER:VALUE` 行。
//! 文件缺失一律降级为空结果。

pub mod list;
pub mod threshold;

use bourse_core::common::Symbol;
use bourse_core::store::error::StoreError;
use std::path::Path;
use tracing::warn;

/// 读取整个文件的原始字节；文件不存在时返回 None。
pub(crate) async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, std::io::Error> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// # Summary
/// 按行切分文件内容并逐行解码。
///
/// # Logic
/// 1. 以 `\n` 切分原始字节，行号从 1 开始。
/// 2. 非 UTF-8 的行记录 warn 后跳过，其余行照常返回。
pub(crate) fn utf8_lines(bytes: &[u8]) -> impl Iterator<Item = (usize, &str)> {
    bytes
        .split(|b| *b == b'\n')
        .enumerate()
        .filter_map(|(idx, raw)| match std::str::from_utf8(raw) {
            Ok(line) => Some((idx + 1, line)),
            Err(e) => {
                warn!("Skipping line {} with invalid UTF-8: {}", idx + 1, e);
                None
            }
        })
}

/// 写入前逐个校验代码，任一不合法即拒绝整个文件。
pub(crate) fn ensure_storable<'a>(
    symbols: impl IntoIterator<Item = &'a Symbol>,
) -> Result<(), StoreError> {
    for symbol in symbols {
        symbol.validate().map_err(StoreError::InvalidSymbol)?;
    }
    Ok(())
}

/// 覆盖写入整个文件，必要时创建父目录。
pub(crate) async fn write_all(path: &Path, contents: String) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await
}
