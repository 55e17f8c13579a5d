use crate::common::Symbol;
use thiserror::Error;

/// # Summary
/// 分析流水线错误枚举，覆盖比值、移动平均与股息率计算。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 流水线内部不会向上冒泡这些错误：各组件在边界处将其降级为"跳过该项"。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    // 比值分母为零或非有限数
    #[error("Division undefined: denominator is {0}")]
    DivisionUndefined(f64),
    // 该代码没有登记参考价
    #[error("No reference price on file for {0}")]
    MissingReferenceValue(Symbol),
    // 参考年份没有派息记录
    #[error("No dividend recorded for {symbol} in {year}")]
    MissingDividend { symbol: Symbol, year: i32 },
    // 参考价非正或非有限数，属于配置错误
    #[error("Invalid reference price {price} for {symbol}")]
    InvalidReferencePrice { symbol: Symbol, price: f64 },
    // 移动平均窗口非法
    #[error("Invalid moving average window: {0}")]
    InvalidWindow(usize),
}
