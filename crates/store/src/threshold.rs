use crate::{ensure_storable, read_optional, utf8_lines, write_all};
use async_trait::async_trait;
use bourse_core::common::Symbol;
use bourse_core::store::error::StoreError;
use bourse_core::store::port::{ThresholdMap, ThresholdStore};
use std::path::PathBuf;
use tracing::{debug, warn};

/// # Summary
/// 基于 `TICKER:VALUE` 文本文件的阈值存储。
///
/// # Invariants
/// - 无法解析的行跳过并记录 warn，不影响其他行。
/// - 同一代码出现多次时以最后一行为准。
pub struct FileThresholdStore {
    path: PathBuf,
}

impl FileThresholdStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

/// # Summary
/// 解析单行阈值。
///
/// # Logic
/// 1. 以第一个冒号切分代码与数值。
/// 2. 代码不能为空，数值必须是有限浮点数。
///
/// # Arguments
/// * `line_no`: 行号（从 1 开始，用于错误信息）。
/// * `line`: 原始行文本。
///
/// # Returns
/// 成功返回 (代码, 数值)，失败返回 `StoreError::MalformedPersistedList`。
pub fn parse_threshold_line(line_no: usize, line: &str) -> Result<(Symbol, f64), StoreError> {
    let malformed = |reason: &str| StoreError::MalformedPersistedList {
        line: line_no,
        reason: reason.to_string(),
    };

    let (ticker, value) = line
        .split_once(':')
        .ok_or_else(|| malformed("missing ':' separator"))?;
    let symbol = Symbol::new(ticker);
    if symbol.is_empty() {
        return Err(malformed("empty ticker"));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| malformed(&format!("invalid number {:?}", value.trim())))?;
    if !value.is_finite() {
        return Err(malformed("value is not finite"));
    }
    Ok((symbol, value))
}

/// 解析整个阈值文件，跳过空行、损坏行与无法解码的行。
pub fn parse_thresholds(bytes: &[u8]) -> ThresholdMap {
    let mut map = ThresholdMap::new();
    for (line_no, line) in utf8_lines(bytes) {
        if line.trim().is_empty() {
            continue;
        }
        match parse_threshold_line(line_no, line) {
            Ok((symbol, value)) => {
                map.insert(symbol, value);
            }
            Err(e) => warn!("Skipping threshold entry: {}", e),
        }
    }
    map
}

#[async_trait]
impl ThresholdStore for FileThresholdStore {
    async fn load(&self) -> Result<ThresholdMap, StoreError> {
        match read_optional(&self.path).await? {
            Some(bytes) => Ok(parse_thresholds(&bytes)),
            None => {
                debug!("Threshold file {} not found", self.path.display());
                Ok(ThresholdMap::new())
            }
        }
    }

    async fn save(&self, thresholds: &ThresholdMap) -> Result<(), StoreError> {
        ensure_storable(thresholds.keys())?;
        let contents: String = thresholds
            .iter()
            .map(|(symbol, value)| format!("{}:{}\n", symbol, value))
            .collect();
        write_all(&self.path, contents).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_threshold_line() {
        let (symbol, value) = parse_threshold_line(1, "TTE.PA:58.4").unwrap();
        assert_eq!(symbol, Symbol::new("TTE.PA"));
        assert_eq!(value, 58.4);

        assert!(matches!(
            parse_threshold_line(2, "TTE.PA 58.4"),
            Err(StoreError::MalformedPersistedList { line: 2, .. })
        ));
        assert!(parse_threshold_line(3, ":12").is_err());
        assert!(parse_threshold_line(4, "ORA.PA:abc").is_err());
        assert!(parse_threshold_line(5, "ORA.PA:inf").is_err());
    }

    #[test]
    fn test_parse_thresholds_skips_bad_lines() {
        let map = parse_thresholds(b"TTE.PA:58.4\ngarbage\n\nORA.PA: 10.9\nBNP.PA:x\n");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&Symbol::new("ORA.PA")), Some(&10.9));
    }

    #[test]
    fn test_parse_thresholds_skips_invalid_utf8_line() {
        let map = parse_thresholds(b"TTE.PA:58.4\nCAF\xE9.PA:12\r\nORA.PA:10.9\r\n");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&Symbol::new("TTE.PA")), Some(&58.4));
        assert_eq!(map.get(&Symbol::new("ORA.PA")), Some(&10.9));
    }
}
