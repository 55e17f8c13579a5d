use thiserror::Error;

/// # Summary
/// 缓存域错误枚举，处理序列化及底层存储故障。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 缓存错误永远不应阻断行情获取，调用方应降级为直接请求数据源。
#[derive(Error, Debug)]
pub enum CacheError {
    // 数据序列化失败
    #[error("Serialize error: {0}")]
    Serialize(String),
    // 数据反序列化失败
    #[error("Deserialize error: {0}")]
    Deserialize(String),
    // 底层存储引擎故障
    #[error("Storage error: {0}")]
    Storage(String),
    // 未知或未分类的错误
    #[error("Unknown error: {0}")]
    Unknown(String),
}
