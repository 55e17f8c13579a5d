//! # 图表路由控制器
//!
//! 实现 K 线面板批次与比值面板批次接口，对应看板各标签页的图表区域。

use axum::Json;
use axum::extract::{Path, Query, State};
use bourse_core::common::Symbol;
use bourse_manager::dashboard::{ChartPanel, DifferentialPanel, PanelBatch};

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiResponse, ChartQuery, parse_kind};

/// 获取可选的比值参考代码
///
/// 即配置中的参考指数，供界面的参考代码选择器使用。
#[utoipa::path(
    get,
    path = "/api/v1/references",
    tag = "图表 (Charts)",
    responses(
        (status = 200, description = "获取成功", body = ApiResponse<Vec<Symbol>>)
    )
)]
pub async fn get_references(State(state): State<AppState>) -> Json<ApiResponse<Vec<Symbol>>> {
    Json(ApiResponse::ok(state.manager.reference_options().to_vec()))
}

/// 获取列表的周 K 线面板
///
/// 每个代码一个面板：周线、可选移动平均、阈值线、相对参考代码的比值叠加、股息率与类别标记。
/// 没有数据的代码出现在 `warnings` 中，不影响其他面板。
#[utoipa::path(
    get,
    path = "/api/v1/charts/{kind}",
    tag = "图表 (Charts)",
    params(
        ("kind" = String, Path, description = "列表类别: etf, stock, currency, research"),
        ("period" = Option<String>, Query, description = "回溯周期: 1y, 2y, 5y, 10y, max"),
        ("start" = Option<String>, Query, description = "起始日期 YYYY-MM-DD，需与 end 同时提供"),
        ("end" = Option<String>, Query, description = "结束日期 YYYY-MM-DD（包含）"),
        ("sma" = Option<usize>, Query, description = "移动平均窗口 5..=100，0 表示关闭"),
        ("reference" = Option<String>, Query, description = "比值参考代码")
    ),
    responses(
        (status = 200, description = "获取成功", body = ApiResponse<PanelBatch<ChartPanel>>),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn get_charts(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ApiResponse<PanelBatch<ChartPanel>>>, ApiError> {
    let kind = parse_kind(&kind)?;
    let request = query.into_request(&state.manager)?;
    let batch = state.manager.candlestick_panels(kind, &request).await?;
    Ok(Json(ApiResponse::ok(batch)))
}

/// 获取列表相对参考代码的比值面板
///
/// 参考代码必填，列表中的参考代码本身不生成面板。
#[utoipa::path(
    get,
    path = "/api/v1/differentials/{kind}",
    tag = "图表 (Charts)",
    params(
        ("kind" = String, Path, description = "列表类别: etf, stock, currency, research"),
        ("period" = Option<String>, Query, description = "回溯周期: 1y, 2y, 5y, 10y, max"),
        ("start" = Option<String>, Query, description = "起始日期 YYYY-MM-DD，需与 end 同时提供"),
        ("end" = Option<String>, Query, description = "结束日期 YYYY-MM-DD（包含）"),
        ("sma" = Option<usize>, Query, description = "移动平均窗口 5..=100，0 表示关闭"),
        ("reference" = String, Query, description = "比值参考代码")
    ),
    responses(
        (status = 200, description = "获取成功", body = ApiResponse<PanelBatch<DifferentialPanel>>),
        (status = 400, description = "请求参数错误或缺少参考代码"),
        (status = 404, description = "参考代码没有数据")
    )
)]
pub async fn get_differentials(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ApiResponse<PanelBatch<DifferentialPanel>>>, ApiError> {
    let kind = parse_kind(&kind)?;
    let request = query.into_request(&state.manager)?;
    let batch = state.manager.differential_panels(kind, &request).await?;
    Ok(Json(ApiResponse::ok(batch)))
}
