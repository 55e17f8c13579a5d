use crate::{ensure_storable, read_optional, utf8_lines, write_all};
use async_trait::async_trait;
use bourse_core::common::{ListKind, Symbol};
use bourse_core::config::StorageConfig;
use bourse_core::store::error::StoreError;
use bourse_core::store::port::SymbolListStore;
use tracing::debug;

/// # Summary
/// 基于文本文件的代码列表存储，每个列表类别一个文件。
///
/// # Invariants
/// - 文件格式为一行一个代码，保存时整体覆盖。
/// - 文件不存在时加载结果为空列表。
pub struct FileSymbolListStore {
    storage: StorageConfig,
}

impl FileSymbolListStore {
    pub fn new(storage: StorageConfig) -> Self {
        Self { storage }
    }
}

/// 解析列表文件：去除首尾空白，忽略空行与无法解码的行，保持顺序。
pub fn parse_list(bytes: &[u8]) -> Vec<Symbol> {
    utf8_lines(bytes)
        .map(|(_, line)| Symbol::new(line))
        .filter(|s| !s.is_empty())
        .collect()
}

#[async_trait]
impl SymbolListStore for FileSymbolListStore {
    /// # Summary
    /// 加载指定类别的代码列表。
    ///
    /// # Logic
    /// 1. 按配置解析出类别对应的文件路径。
    /// 2. 文件不存在返回空列表，否则逐行解析。
    async fn load(&self, kind: ListKind) -> Result<Vec<Symbol>, StoreError> {
        let path = self.storage.list_path(kind);
        match read_optional(&path).await? {
            Some(bytes) => Ok(parse_list(&bytes)),
            None => {
                debug!("List file {} not found, using empty list", path.display());
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, kind: ListKind, symbols: &[Symbol]) -> Result<(), StoreError> {
        ensure_storable(symbols)?;
        let path = self.storage.list_path(kind);
        let contents: String = symbols.iter().map(|s| format!("{}\n", s)).collect();
        write_all(&path, contents).await?;
        debug!("Saved {} symbols to {}", symbols.len(), path.display());
        Ok(())
    }
}
