use bourse_core::analysis::entity::{DividendYield, YieldTable};
use bourse_core::analysis::error::AnalysisError;
use bourse_core::common::Symbol;
use bourse_core::market::entity::{AnnualDividend, DividendEvent};
use bourse_core::store::port::ThresholdMap;
use chrono::Datelike;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use tracing::warn;

/// # Summary
/// 按自然年汇总派息。
///
/// # Logic
/// 1. 以派息在交易所本地日期的年份分组并求和。
/// 2. 仅保留 `year >= start_year` 的年份，按年份升序输出。
/// 3. 没有派息的年份不补零。
///
/// # Arguments
/// * `events`: 单个代码的派息事件。
/// * `start_year`: 起始年份（包含）。
///
/// # Returns
/// 年度派息列表，输入为空时返回空列表。
pub fn annual_dividends(events: &[DividendEvent], start_year: i32) -> Vec<AnnualDividend> {
    let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
    for event in events {
        let year = event.local_date().year();
        if year >= start_year {
            *totals.entry(year).or_insert(0.0) += event.amount;
        }
    }

    totals
        .into_iter()
        .map(|(year, total)| AnnualDividend { year, total })
        .collect()
}

/// # Summary
/// 计算单个代码在参考年份的股息率。
///
/// # Logic
/// 1. 在年度派息中查找参考年份。
/// 2. 校验参考价存在且为正的有限数。
/// 3. `total / price × 100`，以银行家舍入保留两位小数。
///
/// # Arguments
/// * `symbol`: 证券代码（用于错误信息）。
/// * `annual`: 该代码的年度派息。
/// * `reference_year`: 参考年份，一般为当前年份减一。
/// * `reference_price`: 阈值文件中登记的参考价。
///
/// # Returns
/// 成功返回股息率；缺少派息、缺少参考价或参考价非法时返回对应的 `AnalysisError`。
pub fn dividend_yield(
    symbol: &Symbol,
    annual: &[AnnualDividend],
    reference_year: i32,
    reference_price: Option<f64>,
) -> Result<DividendYield, AnalysisError> {
    let entry = annual
        .iter()
        .find(|a| a.year == reference_year)
        .ok_or_else(|| AnalysisError::MissingDividend {
            symbol: symbol.clone(),
            year: reference_year,
        })?;

    let price =
        reference_price.ok_or_else(|| AnalysisError::MissingReferenceValue(symbol.clone()))?;
    if price <= 0.0 || !price.is_finite() {
        return Err(AnalysisError::InvalidReferencePrice {
            symbol: symbol.clone(),
            price,
        });
    }

    let raw = entry.total / price * 100.0;
    let percent = Decimal::from_f64(raw)
        .ok_or(AnalysisError::DivisionUndefined(price))?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);

    Ok(DividendYield {
        symbol: symbol.clone(),
        year: reference_year,
        percent,
    })
}

/// # Summary
/// 批量计算股息率表。
///
/// # Logic
/// 1. 对每个代码调用 [`dividend_yield`]，参考价取自阈值映射。
/// 2. 计算失败的代码记录 warn 日志后从结果中省略，不影响其余代码。
///
/// # Arguments
/// * `dividends`: 代码 → 年度派息。
/// * `thresholds`: 代码 → 参考价。
/// * `reference_year`: 参考年份。
///
/// # Returns
/// 代码 → 股息率（百分比）。
pub fn yield_table(
    dividends: &BTreeMap<Symbol, Vec<AnnualDividend>>,
    thresholds: &ThresholdMap,
    reference_year: i32,
) -> YieldTable {
    dividends
        .iter()
        .filter_map(|(symbol, annual)| {
            match dividend_yield(symbol, annual, reference_year, thresholds.get(symbol).copied()) {
                Ok(y) => Some((symbol.clone(), y.percent)),
                Err(AnalysisError::MissingDividend { .. }) => None,
                Err(e) => {
                    warn!("Skipping dividend yield for {}: {}", symbol, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn event(y: i32, m: u32, d: u32, amount: f64) -> DividendEvent {
        DividendEvent {
            time: Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(),
            amount,
            utc_offset: 0,
        }
    }

    #[test]
    fn test_annual_dividends_groups_by_year() {
        let events = vec![
            event(2022, 6, 1, 9.0),
            event(2023, 3, 1, 1.0),
            event(2023, 9, 1, 1.5),
            event(2024, 3, 1, 2.0),
        ];
        let annual = annual_dividends(&events, 2023);
        assert_eq!(
            annual,
            vec![
                AnnualDividend { year: 2023, total: 2.5 },
                AnnualDividend { year: 2024, total: 2.0 },
            ]
        );
    }

    #[test]
    fn test_annual_dividends_uses_exchange_year() {
        // UTC 2023-12-31 22:00 在 UTC+10 已是 2024-01-01
        let events = vec![DividendEvent {
            time: Utc.with_ymd_and_hms(2023, 12, 31, 22, 0, 0).unwrap(),
            amount: 0.8,
            utc_offset: 36_000,
        }];
        assert_eq!(
            annual_dividends(&events, 2023),
            vec![AnnualDividend { year: 2024, total: 0.8 }]
        );
    }

    #[test]
    fn test_annual_dividends_no_synthesized_years() {
        let events = vec![event(2023, 3, 1, 1.0), event(2025, 3, 1, 1.0)];
        let years: Vec<i32> = annual_dividends(&events, 2023).iter().map(|a| a.year).collect();
        assert_eq!(years, vec![2023, 2025]);
        assert!(annual_dividends(&[], 2023).is_empty());
    }

    #[test]
    fn test_dividend_yield_percent() {
        let symbol = Symbol::new("TTE.PA");
        let annual = vec![AnnualDividend { year: 2024, total: 2.5 }];
        let y = dividend_yield(&symbol, &annual, 2024, Some(50.0)).unwrap();
        assert_eq!(y.percent, dec!(5.00));
        assert_eq!(y.year, 2024);
    }

    #[test]
    fn test_dividend_yield_rounds_to_two_decimals() {
        let symbol = Symbol::new("ORA.PA");
        let annual = vec![AnnualDividend { year: 2024, total: 0.75 }];
        let y = dividend_yield(&symbol, &annual, 2024, Some(10.9)).unwrap();
        assert_eq!(y.percent, dec!(6.88));
    }

    #[test]
    fn test_dividend_yield_failures() {
        let symbol = Symbol::new("ENGI.PA");
        let annual = vec![AnnualDividend { year: 2023, total: 1.0 }];

        assert!(matches!(
            dividend_yield(&symbol, &annual, 2024, Some(10.0)),
            Err(AnalysisError::MissingDividend { year: 2024, .. })
        ));
        assert!(matches!(
            dividend_yield(&symbol, &annual, 2023, None),
            Err(AnalysisError::MissingReferenceValue(_))
        ));
        assert!(matches!(
            dividend_yield(&symbol, &annual, 2023, Some(0.0)),
            Err(AnalysisError::InvalidReferencePrice { .. })
        ));
        assert!(matches!(
            dividend_yield(&symbol, &annual, 2023, Some(-3.0)),
            Err(AnalysisError::InvalidReferencePrice { .. })
        ));
    }

    #[test]
    fn test_yield_table_omits_failures() {
        let mut dividends = BTreeMap::new();
        dividends.insert(
            Symbol::new("A"),
            vec![AnnualDividend { year: 2024, total: 2.5 }],
        );
        dividends.insert(
            Symbol::new("B"),
            vec![AnnualDividend { year: 2024, total: 1.0 }],
        );
        dividends.insert(Symbol::new("C"), Vec::new());

        let mut thresholds = ThresholdMap::new();
        thresholds.insert(Symbol::new("A"), 50.0);
        thresholds.insert(Symbol::new("C"), 10.0);

        let table = yield_table(&dividends, &thresholds, 2024);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&Symbol::new("A")), Some(&dec!(5.00)));
    }
}
