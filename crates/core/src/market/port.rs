use crate::common::{HistoryRange, Symbol};
use crate::market::entity::{DividendEvent, PriceSeries};
use crate::market::error::MarketError;
use async_trait::async_trait;

/// # Summary
/// 市场行情数据提供者接口（原始数据源）。
///
/// # Invariants
/// - 每次调用都是一次完整的阻塞式获取，返回完全物化的序列。
/// - 网络或接口故障必须以 `MarketError` 返回，不得 panic。
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// # Summary
    /// 获取特定代码在指定时间范围内的价格序列。
    ///
    /// # Logic
    /// 1. 将 `HistoryRange` 映射为数据源请求参数。
    /// 2. 执行网络请求并解析响应数据。
    /// 3. 序列为空时返回 `MarketError::NoDataAvailable`。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `range`: 回溯周期或日期区间。
    ///
    /// # Returns
    /// 成功返回非空的价格序列。
    async fn fetch_prices(
        &self,
        symbol: &Symbol,
        range: &HistoryRange,
    ) -> Result<PriceSeries, MarketError>;

    /// # Summary
    /// 获取特定代码的全部历史派息事件。
    ///
    /// # Logic
    /// 1. 请求数据源的派息事件。
    /// 2. 按时间升序返回；从未派息的代码返回空列表。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    ///
    /// # Returns
    /// 成功返回派息事件列表（可能为空）。
    async fn fetch_dividends(&self, symbol: &Symbol) -> Result<Vec<DividendEvent>, MarketError>;
}
