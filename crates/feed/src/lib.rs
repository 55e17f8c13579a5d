//! # `bourse-feed` - 行情数据源
//!
//! `MarketDataProvider` 的网络实现。

pub mod yahoo;
