use bourse_core::analysis::error::AnalysisError;
use bourse_core::market::entity::{DifferentialPoint, WeeklyBar};
use std::cmp::Ordering;
use tracing::debug;

/// # Summary
/// 计算单点比值。
///
/// # Arguments
/// * `numerator`: 分子收盘价。
/// * `denominator`: 分母收盘价。
///
/// # Returns
/// 分母为零或非有限数时返回 `AnalysisError::DivisionUndefined`。
pub fn ratio(numerator: f64, denominator: f64) -> Result<f64, AnalysisError> {
    if denominator == 0.0 || !denominator.is_finite() {
        return Err(AnalysisError::DivisionUndefined(denominator));
    }
    Ok(numerator / denominator)
}

/// # Summary
/// 计算两个周线序列的收盘价比值曲线（内连接语义）。
///
/// # Logic
/// 1. 两个序列均按周结束日升序，按日期做归并连接。
/// 2. 只在双方都有周线的日期输出比值，不做前向填充。
/// 3. 分母收盘价为零的日期视为缺失，丢弃该点并记录 debug 日志。
///
/// # Arguments
/// * `numerator`: 分子序列 N。
/// * `denominator`: 分母序列 D（参考代码）。
///
/// # Returns
/// 按日期升序的比值点；任一输入为空时返回空列表。
pub fn differential(numerator: &[WeeklyBar], denominator: &[WeeklyBar]) -> Vec<DifferentialPoint> {
    let mut out = Vec::with_capacity(numerator.len().min(denominator.len()));
    let mut n_iter = numerator.iter().peekable();
    let mut d_iter = denominator.iter().peekable();

    while let (Some(n), Some(d)) = (n_iter.peek(), d_iter.peek()) {
        match n.week_ending.cmp(&d.week_ending) {
            Ordering::Less => {
                n_iter.next();
            }
            Ordering::Greater => {
                d_iter.next();
            }
            Ordering::Equal => {
                match ratio(n.close, d.close) {
                    Ok(value) => out.push(DifferentialPoint {
                        week_ending: n.week_ending,
                        ratio: value,
                    }),
                    Err(e) => debug!("Dropping differential point {}: {}", n.week_ending, e),
                }
                n_iter.next();
                d_iter.next();
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, close: f64) -> WeeklyBar {
        WeeklyBar {
            week_ending: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: None,
        }
    }

    #[test]
    fn test_ratio_rejects_zero_denominator() {
        assert_eq!(ratio(4.0, 2.0), Ok(2.0));
        assert_eq!(ratio(4.0, 0.0), Err(AnalysisError::DivisionUndefined(0.0)));
        assert!(ratio(4.0, f64::NAN).is_err());
    }

    #[test]
    fn test_differential_inner_join() {
        let n = vec![bar(3, 10.0), bar(10, 12.0), bar(17, 15.0)];
        let d = vec![bar(10, 4.0), bar(17, 5.0), bar(24, 6.0)];

        let diff = differential(&n, &d);
        assert_eq!(
            diff,
            vec![
                DifferentialPoint {
                    week_ending: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
                    ratio: 3.0
                },
                DifferentialPoint {
                    week_ending: NaiveDate::from_ymd_opt(2024, 3, 17).unwrap(),
                    ratio: 3.0
                },
            ]
        );
    }

    #[test]
    fn test_differential_drops_zero_denominator() {
        let n = vec![bar(3, 10.0), bar(10, 12.0)];
        let d = vec![bar(3, 0.0), bar(10, 6.0)];

        let diff = differential(&n, &d);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].ratio, 2.0);
    }

    #[test]
    fn test_differential_empty_side() {
        let n = vec![bar(3, 10.0)];
        assert!(differential(&n, &[]).is_empty());
        assert!(differential(&[], &n).is_empty());
    }
}
