use thiserror::Error;

/// # Summary
/// 存储层错误枚举，处理列表与阈值文件的读写失败。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 文件缺失不是错误：加载端降级为空结果。
#[derive(Error, Debug)]
pub enum StoreError {
    /// 文件读写失败
    #[error("IO error: {0}")]
    Io(String),
    /// 持久化文件中存在无法解析的行（加载时跳过该行）
    #[error("Malformed line {line}: {reason}")]
    MalformedPersistedList { line: usize, reason: String },
    /// 代码包含分隔符或空白，写入后无法按原样读回
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),
    /// 未知或未分类的错误
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}
