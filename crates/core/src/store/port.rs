use super::error::StoreError;
use crate::common::{ListKind, Symbol};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// 代码 → 阈值价格映射，每个代码至多一个阈值。
pub type ThresholdMap = BTreeMap<Symbol, f64>;

/// # Summary
/// 代码列表存储接口，每个 `ListKind` 对应一份有序列表。
///
/// # Invariants
/// - 保持用户保存时的顺序。
/// - 列表不存在时视为空列表。
#[async_trait]
pub trait SymbolListStore: Send + Sync {
    /// # Summary
    /// 加载指定类别的代码列表。
    ///
    /// # Logic
    /// 1. 读取类别对应的持久化介质。
    /// 2. 介质不存在时返回空列表。
    ///
    /// # Arguments
    /// * `kind`: 列表类别。
    ///
    /// # Returns
    /// 成功返回有序代码列表，失败返回 `StoreError`。
    async fn load(&self, kind: ListKind) -> Result<Vec<Symbol>, StoreError>;

    /// # Summary
    /// 覆盖保存指定类别的代码列表。
    ///
    /// # Arguments
    /// * `kind`: 列表类别。
    /// * `symbols`: 按显示顺序排列的代码。
    ///
    /// # Returns
    /// 成功返回 Ok，失败返回 `StoreError`。
    async fn save(&self, kind: ListKind, symbols: &[Symbol]) -> Result<(), StoreError>;
}

/// # Summary
/// 阈值（参考价）存储接口。
///
/// # Invariants
/// - 单行损坏只跳过该行，不影响其余阈值的加载。
#[async_trait]
pub trait ThresholdStore: Send + Sync {
    /// 加载全部阈值；介质不存在时返回空映射。
    async fn load(&self) -> Result<ThresholdMap, StoreError>;

    /// 以给定映射整体覆盖已保存的阈值。
    async fn save(&self, thresholds: &ThresholdMap) -> Result<(), StoreError>;
}
