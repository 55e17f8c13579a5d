//! # `bourse-cache` - 缓存实现
//!
//! 为 `bourse_core::cache::port::Cache` 提供进程内实现。

pub mod mem;
