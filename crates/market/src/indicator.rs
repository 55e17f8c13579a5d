use bourse_core::analysis::error::AnalysisError;
use bourse_core::market::entity::{DifferentialPoint, OverlayPoint, WeeklyBar};

/// # Summary
/// 简单移动平均 (SMA)，尾随窗口、不居中、不填充。
///
/// # Logic
/// 1. 前 `window - 1` 个位置窗口未满，输出 None。
/// 2. 之后第 i 个位置输出 `[i - window + 1, i]` 的算术平均。
///
/// # Arguments
/// * `values`: 按时间排列的收盘价。
/// * `window`: 窗口大小，必须为正。
///
/// # Returns
/// 与输入等长的序列；`window` 为 0 时返回 `AnalysisError::InvalidWindow`。
pub fn simple_moving_average(
    values: &[f64],
    window: usize,
) -> Result<Vec<Option<f64>>, AnalysisError> {
    if window == 0 {
        return Err(AnalysisError::InvalidWindow(window));
    }
    let divisor = u32::try_from(window)
        .map(f64::from)
        .map_err(|_| AnalysisError::InvalidWindow(window))?;

    let leading = values.len().min(window - 1);
    let mut out = vec![None; leading];
    out.extend(
        values
            .windows(window)
            .map(|w| Some(w.iter().sum::<f64>() / divisor)),
    );
    Ok(out)
}

/// 以周线收盘价计算移动平均，并对齐到每根周线的结束日。
pub fn bar_moving_average(
    bars: &[WeeklyBar],
    window: usize,
) -> Result<Vec<OverlayPoint>, AnalysisError> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let averages = simple_moving_average(&closes, window)?;
    Ok(bars
        .iter()
        .zip(averages)
        .map(|(bar, value)| OverlayPoint {
            week_ending: bar.week_ending,
            value,
        })
        .collect())
}

/// 以比值序列计算移动平均，并对齐到每个比值点。
pub fn differential_moving_average(
    points: &[DifferentialPoint],
    window: usize,
) -> Result<Vec<OverlayPoint>, AnalysisError> {
    let ratios: Vec<f64> = points.iter().map(|p| p.ratio).collect();
    let averages = simple_moving_average(&ratios, window)?;
    Ok(points
        .iter()
        .zip(averages)
        .map(|(point, value)| OverlayPoint {
            week_ending: point.week_ending,
            value,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_sma_leading_none_count() {
        let values: Vec<f64> = (1..=10).map(|i: i32| f64::from(i)).collect();
        for window in 1..=10 {
            let sma = simple_moving_average(&values, window).unwrap();
            assert_eq!(sma.len(), values.len());
            assert_eq!(sma.iter().take_while(|v| v.is_none()).count(), window - 1);
            assert!(sma[window - 1..].iter().all(Option::is_some));
        }
    }

    #[test]
    fn test_sma_values() {
        let sma = simple_moving_average(&[10.0, 10.0, 10.0, 10.0, 12.0, 14.0], 5).unwrap();
        assert_eq!(sma[..4], [None, None, None, None]);
        assert!(approx(sma[4].unwrap(), 10.4));
        assert!(approx(sma[5].unwrap(), 11.2));
    }

    #[test]
    fn test_sma_shorter_than_window() {
        let sma = simple_moving_average(&[1.0, 2.0], 5).unwrap();
        assert_eq!(sma, vec![None, None]);
        assert!(simple_moving_average(&[], 3).unwrap().is_empty());
    }

    #[test]
    fn test_sma_rejects_zero_window() {
        assert_eq!(
            simple_moving_average(&[1.0], 0),
            Err(AnalysisError::InvalidWindow(0))
        );
    }
}
