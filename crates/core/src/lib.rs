//! # `bourse-core` - 领域核心
//!
//! 定义实体、端口 (Port) 与各领域错误，不包含任何 IO 实现。
//! 具体的数据源、存储与缓存实现位于各自的 crate 中，通过 `Arc<dyn Trait>` 注入。

pub mod analysis;
pub mod cache;
pub mod common;
pub mod config;
pub mod market;
pub mod store;

#[cfg(feature = "test-utils")]
pub mod testing;
