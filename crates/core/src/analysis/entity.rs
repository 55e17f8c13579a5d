use crate::analysis::error::AnalysisError;
use crate::common::Symbol;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// # Summary
/// 界面可选的移动平均窗口。
///
/// # Invariants
/// - 取值范围为 `[MIN, MAX]`，默认 30。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "usize", into = "usize")]
pub struct SmaWindow(usize);

impl SmaWindow {
    pub const MIN: usize = 5;
    pub const MAX: usize = 100;
    pub const DEFAULT: usize = 30;

    /// 校验并构造窗口，越界返回 `AnalysisError::InvalidWindow`。
    pub fn new(periods: usize) -> Result<Self, AnalysisError> {
        if (Self::MIN..=Self::MAX).contains(&periods) {
            Ok(Self(periods))
        } else {
            Err(AnalysisError::InvalidWindow(periods))
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for SmaWindow {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<usize> for SmaWindow {
    type Error = AnalysisError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SmaWindow> for usize {
    fn from(value: SmaWindow) -> Self {
        value.0
    }
}

/// # Summary
/// 单个代码的股息率结果。
///
/// # Invariants
/// - `percent` 已四舍五入到两位小数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DividendYield {
    pub symbol: Symbol,
    // 参考年份（当前年份减一）
    pub year: i32,
    // 股息 / 参考价 × 100
    #[schema(value_type = f64)]
    pub percent: Decimal,
}

/// 代码 → 股息率（百分比）映射，计算失败的代码不出现在表中。
pub type YieldTable = BTreeMap<Symbol, Decimal>;
