use crate::common::Symbol;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// # Summary
/// 将 UTC 时间换算为交易所本地日期。
///
/// # Arguments
/// * `time`: UTC 时间。
/// * `utc_offset`: 交易所相对 UTC 的偏移（秒，东正西负）。
///
/// # Returns
/// 本地日历日期；偏移超出 ±24 小时时按 UTC 日期计算。
pub fn exchange_date(time: DateTime<Utc>, utc_offset: i32) -> NaiveDate {
    match FixedOffset::east_opt(utc_offset) {
        Some(offset) => time.with_timezone(&offset).date_naive(),
        None => time.date_naive(),
    }
}

/// # Summary
/// 单个价格采样点（日线或更细粒度），记录一个时段内的行情波动。
///
/// # Invariants
/// - `high` 应大于或等于 `low`, `open`, `close`（由数据源保证）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PricePoint {
    // 采样时间
    pub time: DateTime<Utc>,
    // 开盘价
    pub open: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
    // 成交量 (外汇、部分指数没有成交量)
    pub volume: Option<f64>,
}

/// # Summary
/// 单个代码在一次 (代码, 时间范围) 请求下的完整价格序列。
///
/// # Invariants
/// - `points` 按时间严格递增，不存在重复时间戳。
/// - 构造后不可变。
/// - 周线与年份按 `utc_offset` 换算出的交易所本地日期划分。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceSeries {
    symbol: Symbol,
    points: Vec<PricePoint>,
    // 交易所相对 UTC 的偏移（秒）
    #[serde(default)]
    utc_offset: i32,
}

impl PriceSeries {
    /// # Summary
    /// 构造价格序列并建立时间严格递增的不变量。
    ///
    /// # Logic
    /// 1. 按时间做稳定排序。
    /// 2. 相同时间戳只保留最先出现的一条。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `points`: 数据源返回的原始采样点（顺序不限）。
    ///
    /// # Returns
    /// 满足不变量的价格序列。
    pub fn new(symbol: Symbol, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.time);
        points.dedup_by_key(|p| p.time);
        Self {
            symbol,
            points,
            utc_offset: 0,
        }
    }

    /// 设置交易所相对 UTC 的偏移（秒）。
    pub fn with_utc_offset(mut self, utc_offset: i32) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    pub fn utc_offset(&self) -> i32 {
        self.utc_offset
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// # Summary
/// 周线 OHLC，以周日作为周结束日标记。
///
/// # Invariants
/// - `high >= max(open, close)` 且 `low <= min(open, close)`。
/// - 创建后不再修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeeklyBar {
    // 周结束日（周日）
    pub week_ending: NaiveDate,
    // 本周第一笔开盘价
    pub open: f64,
    // 本周最高价
    pub high: f64,
    // 本周最低价
    pub low: f64,
    // 本周最后一笔收盘价
    pub close: f64,
    // 本周成交量合计
    pub volume: Option<f64>,
}

/// 单次派息事件。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DividendEvent {
    pub time: DateTime<Utc>,
    pub amount: f64,
    // 交易所相对 UTC 的偏移（秒）
    #[serde(default)]
    pub utc_offset: i32,
}

impl DividendEvent {
    /// 派息在交易所本地的日期。
    pub fn local_date(&self) -> NaiveDate {
        exchange_date(self.time, self.utc_offset)
    }
}

/// # Summary
/// 某代码某自然年的派息合计。
///
/// # Invariants
/// - 每个 (代码, 年份) 至多一条。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnnualDividend {
    pub year: i32,
    pub total: f64,
}

/// 两个周线序列在同一周结束日的收盘价比值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DifferentialPoint {
    pub week_ending: NaiveDate,
    pub ratio: f64,
}

/// # Summary
/// 与 K 线或比值点对齐的叠加线数据点（如移动平均）。
///
/// # Invariants
/// - `value` 为 None 表示窗口尚未填满，而不是零值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OverlayPoint {
    pub week_ending: NaiveDate,
    pub value: Option<f64>,
}
