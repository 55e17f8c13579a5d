use async_trait::async_trait;
use bourse_core::cache::port::{Cache, CacheExt};
use bourse_core::common::{HistoryRange, Symbol};
use bourse_core::market::entity::{DividendEvent, PriceSeries};
use bourse_core::market::error::MarketError;
use bourse_core::market::port::MarketDataProvider;
use std::sync::Arc;
use tracing::{debug, warn};

/// # Summary
/// 带记忆功能的行情源装饰器。
///
/// # Invariants
/// - 只缓存成功结果，错误每次都会重新请求。
/// - 缓存读写失败时降级为直接访问底层数据源。
pub struct CachedProvider {
    // 被装饰的原始数据源
    inner: Arc<dyn MarketDataProvider>,
    // 序列化缓存
    cache: Arc<dyn Cache>,
}

impl CachedProvider {
    pub fn new(inner: Arc<dyn MarketDataProvider>, cache: Arc<dyn Cache>) -> Self {
        Self { inner, cache }
    }

    fn price_key(symbol: &Symbol, range: &HistoryRange) -> String {
        format!("p:{}:{}", symbol, range)
    }

    fn dividend_key(symbol: &Symbol) -> String {
        format!("d:{}", symbol)
    }

    /// 清空缓存，返回被清除的条目数。
    pub async fn invalidate(&self) -> usize {
        match self.cache.clear().await {
            Ok(n) => n,
            Err(e) => {
                warn!("Failed to clear market cache: {}", e);
                0
            }
        }
    }
}

#[async_trait]
impl MarketDataProvider for CachedProvider {
    /// # Summary
    /// 优先读取缓存的价格序列。
    ///
    /// # Logic
    /// 1. 以 `p:{symbol}:{range}` 查询缓存，命中直接返回。
    /// 2. 未命中则请求底层数据源，成功后写回缓存。
    async fn fetch_prices(
        &self,
        symbol: &Symbol,
        range: &HistoryRange,
    ) -> Result<PriceSeries, MarketError> {
        let key = Self::price_key(symbol, range);
        match self.cache.get::<PriceSeries>(&key).await {
            Ok(Some(series)) => {
                debug!("Cache hit {}", key);
                return Ok(series);
            }
            Ok(None) => {}
            Err(e) => warn!("Cache read failed for {}: {}", key, e),
        }

        let series = self.inner.fetch_prices(symbol, range).await?;
        if let Err(e) = self.cache.set(&key, &series).await {
            warn!("Cache write failed for {}: {}", key, e);
        }
        Ok(series)
    }

    async fn fetch_dividends(&self, symbol: &Symbol) -> Result<Vec<DividendEvent>, MarketError> {
        let key = Self::dividend_key(symbol);
        match self.cache.get::<Vec<DividendEvent>>(&key).await {
            Ok(Some(events)) => return Ok(events),
            Ok(None) => {}
            Err(e) => warn!("Cache read failed for {}: {}", key, e),
        }

        let events = self.inner.fetch_dividends(symbol).await?;
        if let Err(e) = self.cache.set(&key, &events).await {
            warn!("Cache write failed for {}: {}", key, e);
        }
        Ok(events)
    }
}
