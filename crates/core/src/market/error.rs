use crate::common::Symbol;
use thiserror::Error;

/// # Summary
/// 市场数据域错误枚举，处理网络、解析及数据缺失等问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 任何变体都只代表"该代码本次无数据"，调用方跳过该代码继续处理其余代码。
#[derive(Error, Debug)]
pub enum MarketError {
    // 数据源返回空序列或请求的代码不存在
    #[error("No data available for {0}")]
    NoDataAvailable(Symbol),
    // 网络层错误，包含底层 HTTP 客户端错误信息
    #[error("Network error: {0}")]
    Network(String),
    // 数据解析错误，如 JSON 格式不匹配
    #[error("Parse error: {0}")]
    Parse(String),
    // 未知或未分类的错误
    #[error("Unknown error: {0}")]
    Unknown(String),
}
