//! # DTO (Data Transfer Object) 层
//!
//! 请求参数与面向前端 JSON 输出的轻量结构体。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use bourse_core::analysis::entity::SmaWindow;
use bourse_core::common::{HistoryRange, ListKind, Period, Symbol};
use bourse_manager::dashboard::{ChartRequest, DashboardManager};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;

// ============================================================
//  列表相关 DTO
// ============================================================

/// 保存列表请求体，格式与界面输入框一致
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SymbolListRequest {
    /// 逗号分隔的代码
    #[schema(example = "SP5.PA, UST.PA, GC=F")]
    pub symbols: String,
}

/// 解析路径中的列表类别 (etf / stock / currency / research)
pub fn parse_kind(raw: &str) -> Result<ListKind, ApiError> {
    raw.parse().map_err(ApiError::BadRequest)
}

// ============================================================
//  图表相关 DTO
// ============================================================

/// 图表查询参数
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ChartQuery {
    /// 回溯周期 (1y, 2y, 5y, 10y, max)
    pub period: Option<String>,
    /// 显式起始日期，需与 `end` 同时提供
    pub start: Option<String>,
    /// 显式结束日期（包含）
    pub end: Option<String>,
    /// 移动平均窗口，0 表示不计算
    pub sma: Option<usize>,
    /// 比值参考代码
    pub reference: Option<String>,
}

impl ChartQuery {
    /// # Summary
    /// 将查询参数转换为看板请求。
    ///
    /// # Logic
    /// 1. `start` 与 `end` 同时出现时使用显式区间，否则使用 `period`，缺省取配置值。
    /// 2. `sma` 缺省取配置窗口，为 0 时关闭移动平均，其余值必须落在合法区间。
    /// 3. 空白的 `reference` 视为未提供。
    ///
    /// # Returns
    /// 参数非法时返回 `ApiError::BadRequest`。
    pub fn into_request(self, manager: &DashboardManager) -> Result<ChartRequest, ApiError> {
        let range = match (self.start.as_deref(), self.end.as_deref()) {
            (Some(start), Some(end)) => {
                let start = parse_date(start)?;
                let end = parse_date(end)?;
                if start > end {
                    return Err(ApiError::BadRequest(format!(
                        "start {} is after end {}",
                        start, end
                    )));
                }
                HistoryRange::Between { start, end }
            }
            (None, None) => {
                let period = match self.period.as_deref() {
                    Some(raw) => raw.parse::<Period>().map_err(ApiError::BadRequest)?,
                    None => manager.config().default_period,
                };
                HistoryRange::Period(period)
            }
            _ => {
                return Err(ApiError::BadRequest(
                    "start and end must be provided together".to_string(),
                ));
            }
        };

        let sma = match self.sma {
            None => Some(manager.default_window()),
            Some(0) => None,
            Some(n) => Some(SmaWindow::new(n).map_err(|e| ApiError::BadRequest(e.to_string()))?),
        };

        let reference = self
            .reference
            .map(Symbol::new)
            .filter(|s| !s.is_empty());

        Ok(ChartRequest {
            range,
            sma,
            reference,
        })
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    raw.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid date {}: {}", raw, e)))
}

// ============================================================
//  股息相关 DTO
// ============================================================

/// 单个代码的股息率
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct YieldEntryResponse {
    /// 证券代码
    #[schema(example = "TTE.PA")]
    pub symbol: String,
    /// 股息率 (百分比，两位小数)
    #[schema(value_type = f64, example = 5.12)]
    pub percent: Decimal,
}

/// 股息率表
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct YieldTableResponse {
    /// 参考年份
    #[schema(example = 2025)]
    pub year: i32,
    /// 按代码排序的股息率
    pub yields: Vec<YieldEntryResponse>,
}

// ============================================================
//  缓存相关 DTO
// ============================================================

/// 清空缓存结果
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CacheClearResponse {
    /// 被清除的条目数
    #[schema(example = 12)]
    pub cleared: usize,
}

// ============================================================
//  通用响应 DTO
// ============================================================

/// 统一 API 响应包装器
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T: Serialize + ToSchema> {
    /// 是否成功
    pub success: bool,
    /// 数据载荷 (成功时)
    pub data: Option<T>,
    /// 错误信息 (失败时)
    pub error: Option<String>,
}

impl<T: Serialize + ToSchema> ApiResponse<T> {
    /// 构建成功响应
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// 构建失败响应 (不含泛型载荷)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 固定为 false
    pub success: bool,
    /// 错误描述信息
    pub error: String,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}
