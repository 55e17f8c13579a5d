//! # `bourse-market` - 时间序列聚合与比值计算
//!
//! 周线重采样、移动平均、比值曲线、股息汇总与股息率均为无状态纯函数；
//! `CachedProvider` 为行情源提供按 (代码, 时间范围) 的记忆。

pub mod cached;
pub mod differential;
pub mod dividend;
pub mod indicator;
pub mod resample;
