use async_trait::async_trait;
use bourse_core::common::{HistoryRange, Symbol};
use bourse_core::config::FeedConfig;
use bourse_core::market::entity::{DividendEvent, PricePoint, PriceSeries};
use bourse_core::market::error::MarketError;
use bourse_core::market::port::MarketDataProvider;
use chrono::{DateTime, NaiveTime, Utc};
use reqwest::{Client, Url};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const BROWSER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// # Summary
/// Yahoo Finance 行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯。
/// - 价格与派息共用 v8 chart 接口，派息通过 `events=div` 获取。
#[derive(Clone)]
pub struct YahooProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// 接口根地址，测试时可替换
    base_url: String,
}

impl YahooProvider {
    /// # Summary
    /// 创建一个新的 YahooProvider 实例。
    ///
    /// # Logic
    /// 1. 安装 rustls 的 ring 加密后端（已安装则忽略）。
    /// 2. 设置伪装浏览器 Header (User-Agent) 以减少被拦截风险。
    /// 3. 按配置的超时初始化 reqwest 客户端。
    ///
    /// # Arguments
    /// * `config`: 数据源配置。
    ///
    /// # Returns
    /// 成功返回 YahooProvider，客户端构建失败返回 `MarketError::Network`。
    pub fn new(config: &FeedConfig) -> Result<Self, MarketError> {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            debug!("rustls crypto provider already installed");
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_AGENT));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| MarketError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: CHART_URL.to_string(),
        })
    }

    /// 替换接口根地址。
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// # Summary
    /// 请求 chart 接口并解析为响应结构。
    ///
    /// # Logic
    /// 1. 将代码作为单个路径段追加到根地址并附加查询参数。
    /// 2. 非 2xx 状态码映射为网络错误。
    /// 3. JSON 解析失败映射为解析错误。
    async fn request_chart(
        &self,
        symbol: &Symbol,
        query: &[(&str, String)],
    ) -> Result<YahooResponse, MarketError> {
        let url = chart_url(&self.base_url, symbol)?;

        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MarketError::NoDataAvailable(symbol.clone()));
        }
        if !resp.status().is_success() {
            return Err(MarketError::Network(format!("HTTP {}", resp.status())));
        }

        resp.json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))
    }
}

/// 拼接 chart 地址，代码中的 `/`、`?`、`#` 等字符按路径段转义。
fn chart_url(base_url: &str, symbol: &Symbol) -> Result<Url, MarketError> {
    let mut url = Url::parse(base_url).map_err(|e| MarketError::Parse(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| MarketError::Parse(format!("cannot-be-a-base URL {}", base_url)))?
        .pop_if_empty()
        .push(symbol.as_str());
    Ok(url)
}

/// 将时间范围映射为 chart 接口的查询参数。
fn range_query(range: &HistoryRange) -> Vec<(&'static str, String)> {
    let mut query = vec![("interval", "1d".to_string())];
    match range {
        HistoryRange::Period(p) => query.push(("range", p.to_string())),
        HistoryRange::Between { start, end } => {
            let start_ts = start.and_time(NaiveTime::MIN).and_utc().timestamp();
            // 结束日包含在内
            let end_ts = end.and_time(NaiveTime::MIN).and_utc().timestamp() + 86_400;
            query.push(("period1", start_ts.to_string()));
            query.push(("period2", end_ts.to_string()));
        }
    }
    query
}

/// # Summary
/// Yahoo API 响应顶层结构。
///
/// # Invariants
/// - 映射自 Yahoo v8 chart 接口。
#[derive(Deserialize, Debug)]
struct YahooResponse {
    chart: YahooChart,
}

/// Yahoo API 图表数据部分。
#[derive(Deserialize, Debug)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

/// Yahoo API 错误详情。
#[derive(Deserialize, Debug)]
struct YahooError {
    code: Option<String>,
    description: String,
}

/// Yahoo API 单个时间序列结果。
#[derive(Deserialize, Debug)]
struct YahooResult {
    meta: Option<YahooMeta>,
    // 无成交的代码会省略该字段
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
    events: Option<YahooEvents>,
}

/// 交易所元信息，`gmtoffset` 为相对 UTC 的秒数。
#[derive(Deserialize, Debug)]
struct YahooMeta {
    gmtoffset: Option<i32>,
}

impl YahooResult {
    fn utc_offset(&self) -> i32 {
        self.meta.as_ref().and_then(|m| m.gmtoffset).unwrap_or(0)
    }
}

#[derive(Deserialize, Debug)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

/// Yahoo API 原始报价数据，停牌日各字段为 null。
#[derive(Deserialize, Debug)]
struct YahooQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Deserialize, Debug)]
struct YahooEvents {
    // 键为时间戳字符串
    dividends: Option<HashMap<String, YahooDividend>>,
}

#[derive(Deserialize, Debug)]
struct YahooDividend {
    amount: f64,
    date: i64,
}

/// 取出唯一的结果节点，接口层错误按代码区分"无数据"与其他错误。
fn single_result(symbol: &Symbol, resp: YahooResponse) -> Result<YahooResult, MarketError> {
    if let Some(err) = resp.chart.error {
        return match err.code.as_deref() {
            Some("Not Found") => Err(MarketError::NoDataAvailable(symbol.clone())),
            _ => Err(MarketError::Unknown(err.description)),
        };
    }

    resp.chart
        .result
        .and_then(|mut r| r.pop())
        .ok_or_else(|| MarketError::NoDataAvailable(symbol.clone()))
}

fn to_time(ts: i64) -> Result<DateTime<Utc>, MarketError> {
    DateTime::from_timestamp(ts, 0).ok_or_else(|| MarketError::Parse(format!("bad timestamp {}", ts)))
}

/// # Summary
/// 将 chart 响应解析为价格序列。
///
/// # Logic
/// 1. 按索引对齐 timestamp 与 OHLC 数组。
/// 2. 任一 OHLC 为 null 的行（停牌、未收盘）整体丢弃；成交量允许缺失。
/// 3. 解析后为空时返回 `NoDataAvailable`。
fn parse_prices(symbol: &Symbol, resp: YahooResponse) -> Result<PriceSeries, MarketError> {
    let result = single_result(symbol, resp)?;
    let utc_offset = result.utc_offset();
    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .first()
        .ok_or(MarketError::Parse("No quote data".into()))?;

    let mut points = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        if let (Some(o), Some(h), Some(l), Some(c)) = (
            quote.open.get(i).and_then(|x| *x),
            quote.high.get(i).and_then(|x| *x),
            quote.low.get(i).and_then(|x| *x),
            quote.close.get(i).and_then(|x| *x),
        ) {
            points.push(PricePoint {
                time: to_time(ts)?,
                open: o,
                high: h,
                low: l,
                close: c,
                volume: quote.volume.get(i).and_then(|x| *x),
            });
        }
    }

    if points.is_empty() {
        return Err(MarketError::NoDataAvailable(symbol.clone()));
    }
    Ok(PriceSeries::new(symbol.clone(), points).with_utc_offset(utc_offset))
}

/// 将 chart 响应中的派息事件解析为按时间升序的列表。
fn parse_dividends(symbol: &Symbol, resp: YahooResponse) -> Result<Vec<DividendEvent>, MarketError> {
    let result = match single_result(symbol, resp) {
        Ok(r) => r,
        Err(MarketError::NoDataAvailable(_)) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let utc_offset = result.utc_offset();
    let mut events = result
        .events
        .and_then(|e| e.dividends)
        .unwrap_or_default()
        .into_values()
        .map(|d| {
            Ok(DividendEvent {
                time: to_time(d.date)?,
                amount: d.amount,
                utc_offset,
            })
        })
        .collect::<Result<Vec<_>, MarketError>>()?;
    events.sort_by_key(|e| e.time);
    Ok(events)
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    /// # Summary
    /// 从 Yahoo Finance 抓取日线历史数据。
    ///
    /// # Logic
    /// 1. 映射 HistoryRange 为 `range` 或 `period1/period2`。
    /// 2. 发起异步请求并解析嵌套的 JSON 数据。
    async fn fetch_prices(
        &self,
        symbol: &Symbol,
        range: &HistoryRange,
    ) -> Result<PriceSeries, MarketError> {
        let resp = self.request_chart(symbol, &range_query(range)).await?;
        let series = parse_prices(symbol, resp)?;
        debug!("Fetched {} points for {} ({})", series.len(), symbol, range);
        Ok(series)
    }

    /// # Summary
    /// 抓取全部历史派息。
    ///
    /// # Logic
    /// 1. 以 `range=max&interval=1mo&events=div` 请求，只关心事件节点。
    /// 2. 代码不存在或无派息时返回空列表。
    async fn fetch_dividends(&self, symbol: &Symbol) -> Result<Vec<DividendEvent>, MarketError> {
        let query = [
            ("range", "max".to_string()),
            ("interval", "1mo".to_string()),
            ("events", "div".to_string()),
        ];
        let resp = match self.request_chart(symbol, &query).await {
            Ok(resp) => resp,
            Err(MarketError::NoDataAvailable(_)) => {
                warn!("No dividend data for {}", symbol);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        parse_dividends(symbol, resp)
    }
}
