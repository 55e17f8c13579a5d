//! 测试替身：内存行情源与内存存储，仅在 `test-utils` 特性下编译。

use crate::common::{HistoryRange, ListKind, Symbol};
use crate::market::entity::{DividendEvent, PriceSeries};
use crate::market::error::MarketError;
use crate::market::port::MarketDataProvider;
use crate::store::error::StoreError;
use crate::store::port::{SymbolListStore, ThresholdMap, ThresholdStore};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// # Summary
/// 预置数据的行情源，未登记的代码返回 `NoDataAvailable`。
///
/// # Invariants
/// - 忽略请求的时间范围，总是返回登记的完整序列。
/// - 记录价格请求次数，便于断言缓存命中。
#[derive(Default)]
pub struct StaticProvider {
    prices: DashMap<Symbol, PriceSeries>,
    dividends: DashMap<Symbol, Vec<DividendEvent>>,
    price_calls: AtomicUsize,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prices(self, series: PriceSeries) -> Self {
        self.prices.insert(series.symbol().clone(), series);
        self
    }

    pub fn with_dividends(self, symbol: &str, events: Vec<DividendEvent>) -> Self {
        self.dividends.insert(Symbol::new(symbol), events);
        self
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataProvider for StaticProvider {
    async fn fetch_prices(
        &self,
        symbol: &Symbol,
        _range: &HistoryRange,
    ) -> Result<PriceSeries, MarketError> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        match self.prices.get(symbol) {
            Some(series) if !series.is_empty() => Ok(series.clone()),
            _ => Err(MarketError::NoDataAvailable(symbol.clone())),
        }
    }

    async fn fetch_dividends(&self, symbol: &Symbol) -> Result<Vec<DividendEvent>, MarketError> {
        Ok(self
            .dividends
            .get(symbol)
            .map(|v| v.clone())
            .unwrap_or_default())
    }
}

/// 内存代码列表存储。
#[derive(Default)]
pub struct MemListStore {
    lists: DashMap<ListKind, Vec<Symbol>>,
}

impl MemListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(self, kind: ListKind, symbols: &[&str]) -> Self {
        self.lists
            .insert(kind, symbols.iter().map(Symbol::new).collect());
        self
    }
}

#[async_trait]
impl SymbolListStore for MemListStore {
    async fn load(&self, kind: ListKind) -> Result<Vec<Symbol>, StoreError> {
        Ok(self.lists.get(&kind).map(|v| v.clone()).unwrap_or_default())
    }

    async fn save(&self, kind: ListKind, symbols: &[Symbol]) -> Result<(), StoreError> {
        self.lists.insert(kind, symbols.to_vec());
        Ok(())
    }
}

/// 内存阈值存储。
#[derive(Default)]
pub struct MemThresholdStore {
    thresholds: RwLock<ThresholdMap>,
}

impl MemThresholdStore {
    pub fn new(thresholds: ThresholdMap) -> Self {
        Self {
            thresholds: RwLock::new(thresholds),
        }
    }
}

#[async_trait]
impl ThresholdStore for MemThresholdStore {
    async fn load(&self) -> Result<ThresholdMap, StoreError> {
        Ok(self.thresholds.read().await.clone())
    }

    async fn save(&self, thresholds: &ThresholdMap) -> Result<(), StoreError> {
        *self.thresholds.write().await = thresholds.clone();
        Ok(())
    }
}
