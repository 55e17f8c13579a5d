pub mod time;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// # Summary
/// 证券代码值对象，既作为数据键也作为显示标签。
///
/// # Invariants
/// - 不携带任何行为，仅支持相等与排序比较。
/// - 内部字符串已去除首尾空白。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// 从任意字符串构造代码，自动去除首尾空白。
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// # Summary
    /// 校验代码能否写入一行一条记录的持久化文件。
    ///
    /// # Invariants
    /// - 非空，且不含冒号（阈值分隔符）与任何空白字符（含换行）。
    ///
    /// # Returns
    /// 不合法时返回原因描述。
    pub fn validate(&self) -> Result<(), String> {
        if self.0.is_empty() {
            return Err("symbol must not be empty".to_string());
        }
        if let Some(c) = self.0.chars().find(|c| *c == ':' || c.is_whitespace()) {
            return Err(format!("symbol {:?} contains forbidden character {:?}", self.0, c));
        }
        Ok(())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

/// # Summary
/// 解析界面输入的逗号分隔代码列表。
///
/// # Logic
/// 1. 按逗号切分。
/// 2. 去除每段首尾空白，丢弃空段。
///
/// # Arguments
/// * `input`: 形如 `"SP5.PA, UST.PA"` 的原始输入。
///
/// # Returns
/// 按输入顺序排列的代码列表。
pub fn parse_symbol_input(input: &str) -> Vec<Symbol> {
    input
        .split(',')
        .map(Symbol::new)
        .filter(|s| !s.is_empty())
        .collect()
}

/// # Summary
/// 历史数据回溯深度，对应数据源的 `range` 参数。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum Period {
    // 1 年
    #[serde(rename = "1y")]
    Year1,
    // 2 年
    #[serde(rename = "2y")]
    Year2,
    // 5 年
    #[default]
    #[serde(rename = "5y")]
    Year5,
    // 10 年
    #[serde(rename = "10y")]
    Year10,
    // 全部历史
    #[serde(rename = "max")]
    Max,
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1y" | "year1" => Ok(Period::Year1),
            "2y" | "year2" => Ok(Period::Year2),
            "5y" | "year5" => Ok(Period::Year5),
            "10y" | "year10" => Ok(Period::Year10),
            "max" => Ok(Period::Max),
            _ => Err(format!("Unknown Period: {}", s)),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Year1 => write!(f, "1y"),
            Period::Year2 => write!(f, "2y"),
            Period::Year5 => write!(f, "5y"),
            Period::Year10 => write!(f, "10y"),
            Period::Max => write!(f, "max"),
        }
    }
}

/// # Summary
/// 行情请求的时间范围：相对回溯周期或显式日期区间。
///
/// # Invariants
/// - `Between` 的 `start` 不晚于 `end`（由构造方保证）。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum HistoryRange {
    Period(Period),
    Between { start: NaiveDate, end: NaiveDate },
}

impl Default for HistoryRange {
    fn default() -> Self {
        HistoryRange::Period(Period::default())
    }
}

impl std::fmt::Display for HistoryRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryRange::Period(p) => write!(f, "{}", p),
            HistoryRange::Between { start, end } => write!(f, "{}..{}", start, end),
        }
    }
}

/// # Summary
/// 代码列表类别，每一类对应一个持久化列表文件（界面上的一个标签页）。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    // 指数 / ETF
    Etf,
    // 个股
    Stock,
    // 外汇
    Currency,
    // 临时研究
    Research,
}

impl ListKind {
    pub fn all() -> &'static [ListKind] {
        &[
            ListKind::Etf,
            ListKind::Stock,
            ListKind::Currency,
            ListKind::Research,
        ]
    }
}

impl FromStr for ListKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "etf" | "etfs" => Ok(ListKind::Etf),
            "stock" | "stocks" => Ok(ListKind::Stock),
            "currency" | "currencies" => Ok(ListKind::Currency),
            "research" => Ok(ListKind::Research),
            _ => Err(format!("Unknown ListKind: {}", s)),
        }
    }
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListKind::Etf => write!(f, "etf"),
            ListKind::Stock => write!(f, "stock"),
            ListKind::Currency => write!(f, "currency"),
            ListKind::Research => write!(f, "research"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbol_input_trims_and_drops_blanks() {
        let symbols = parse_symbol_input(" SP5.PA, ,UST.PA ,^FCHI,");
        assert_eq!(
            symbols,
            vec![Symbol::new("SP5.PA"), Symbol::new("UST.PA"), Symbol::new("^FCHI")]
        );
        assert!(parse_symbol_input("").is_empty());
    }

    #[test]
    fn test_period_round_trip_through_display() {
        for p in [Period::Year1, Period::Year2, Period::Year5, Period::Year10, Period::Max] {
            assert_eq!(p.to_string().parse::<Period>(), Ok(p));
        }
        assert!("3w".parse::<Period>().is_err());
    }

    #[test]
    fn test_list_kind_accepts_plural_names() {
        assert_eq!("ETFs".parse::<ListKind>(), Ok(ListKind::Etf));
        assert_eq!("stocks".parse::<ListKind>(), Ok(ListKind::Stock));
        assert!("bonds".parse::<ListKind>().is_err());
    }

    #[test]
    fn test_symbol_validate_rejects_separators() {
        assert!(Symbol::new("GC=F").validate().is_ok());
        assert!(Symbol::new(" ^FCHI ").validate().is_ok());
        for bad in ["", "A:B", "X\nY", "X\rY", "BRK B", "A\tB"] {
            assert!(Symbol::new(bad).validate().is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_symbol_deserialization_trims() {
        let symbols: Vec<Symbol> = serde_json::from_str(r#"[" TTE.PA ", "^FCHI"]"#).unwrap();
        assert_eq!(symbols, vec![Symbol::new("TTE.PA"), Symbol::new("^FCHI")]);
        assert_eq!(serde_json::to_string(&symbols[0]).unwrap(), r#""TTE.PA""#);
    }
}
