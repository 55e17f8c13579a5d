use chrono::{Datelike, Days, NaiveDate};
use bourse_core::market::entity::{PricePoint, PriceSeries, WeeklyBar, exchange_date};

/// # Summary
/// 计算日期所在自然周（周一至周日）的周日。
///
/// # Arguments
/// * `date`: 任意日期。
///
/// # Returns
/// 该周的周结束日；周日本身返回自身。
pub fn week_ending(date: NaiveDate) -> NaiveDate {
    let offset = 6 - date.weekday().num_days_from_monday();
    date.checked_add_days(Days::new(u64::from(offset)))
        .unwrap_or(date)
}

/// # Summary
/// 将价格序列重采样为周线 OHLC。
///
/// # Logic
/// 1. 以交易所本地日期所在周的周日作为桶标签。
/// 2. 同一桶内：开盘取首条、最高取最大、最低取最小、收盘取末条、成交量求和。
/// 3. 桶按周结束日升序输出；没有采样点的周不补齐。
///
/// # Arguments
/// * `series`: 时间严格递增的价格序列。
///
/// # Returns
/// 周线列表，输入为空时返回空列表。
pub fn resample_weekly(series: &PriceSeries) -> Vec<WeeklyBar> {
    resample_points(series.points(), series.utc_offset())
}

/// 对已排序的采样点做周线聚合，`utc_offset` 为交易所偏移（秒），见 [`resample_weekly`]。
pub fn resample_points(points: &[PricePoint], utc_offset: i32) -> Vec<WeeklyBar> {
    let mut bars: Vec<WeeklyBar> = Vec::new();

    for point in points {
        let label = week_ending(exchange_date(point.time, utc_offset));

        match bars.last_mut() {
            Some(bar) if bar.week_ending == label => {
                bar.high = bar.high.max(point.high);
                bar.low = bar.low.min(point.low);
                bar.close = point.close;
                bar.volume = match (bar.volume, point.volume) {
                    (Some(a), Some(b)) => Some(a + b),
                    (a, b) => a.or(b),
                };
            }
            _ => bars.push(WeeklyBar {
                week_ending: label,
                open: point.open,
                high: point.high,
                low: point.low,
                close: point.close,
                volume: point.volume,
            }),
        }
    }

    bars
}

/// # Summary
/// 将周线还原为采样点（时间取周结束日零点），供再次聚合或图表层复用。
pub fn bars_to_points(bars: &[WeeklyBar]) -> Vec<PricePoint> {
    bars.iter()
        .map(|bar| PricePoint {
            time: bar.week_ending.and_time(chrono::NaiveTime::MIN).and_utc(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        })
        .collect()
}
