use async_trait::async_trait;
use bourse_core::cache::error::CacheError;
use bourse_core::cache::port::Cache;
use dashmap::DashMap;

/// # Summary
/// 基于 DashMap 的内存缓存实现，用于记忆行情与派息请求结果。
///
/// # Invariants
/// - 所有操作均通过并发哈希表 `DashMap` 执行，保证多线程安全。
/// - 不提供自动过期或容量限制，进程重启或显式 `clear` 即失效。
pub struct MemCache {
    // 线程安全的 KV 存储容器
    storage: DashMap<String, Vec<u8>>,
}

impl MemCache {
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// 当前条目数。
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl Default for MemCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for MemCache {
    async fn set_raw(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        self.storage.insert(key.to_string(), value);
        Ok(())
    }

    /// # Summary
    /// 获取原始字节数据。
    ///
    /// # Logic
    /// 从哈希表中检索 Key 对应的引用，并将其克隆为独立的所有权对象返回。
    async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.storage.get(key).map(|v| v.value().clone()))
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        self.storage.remove(key);
        Ok(())
    }

    /// # Summary
    /// 清空全部条目。
    ///
    /// # Logic
    /// 先记录条目数再清空；并发写入的新条目可能在清空后保留。
    async fn clear(&self) -> Result<usize, CacheError> {
        let count = self.storage.len();
        self.storage.clear();
        Ok(count)
    }
}
