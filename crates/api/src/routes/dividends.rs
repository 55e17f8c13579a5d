//! # 股息路由控制器

use axum::Json;
use axum::extract::{Path, State};
use bourse_core::common::Symbol;
use bourse_core::market::entity::AnnualDividend;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiResponse, YieldEntryResponse, YieldTableResponse};

/// 获取股票列表的股息率表
///
/// 参考年份为当前年份减一，参考价取自阈值文件。缺少派息或参考价的代码不出现在结果中。
#[utoipa::path(
    get,
    path = "/api/v1/dividends/yields",
    tag = "股息 (Dividends)",
    responses(
        (status = 200, description = "获取成功", body = ApiResponse<YieldTableResponse>)
    )
)]
pub async fn get_yields(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<YieldTableResponse>>, ApiError> {
    let table = state.manager.dividend_yields().await?;
    let yields = table
        .into_iter()
        .map(|(symbol, percent)| YieldEntryResponse {
            symbol: symbol.to_string(),
            percent,
        })
        .collect();
    Ok(Json(ApiResponse::ok(YieldTableResponse {
        year: state.manager.reference_year(),
        yields,
    })))
}

/// 获取单个代码的年度派息
#[utoipa::path(
    get,
    path = "/api/v1/dividends/{symbol}",
    tag = "股息 (Dividends)",
    params(
        ("symbol" = String, Path, description = "证券代码")
    ),
    responses(
        (status = 200, description = "获取成功", body = ApiResponse<Vec<AnnualDividend>>)
    )
)]
pub async fn get_annual_dividends(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<Vec<AnnualDividend>>>, ApiError> {
    let annual = state.manager.annual_dividends(&Symbol::new(symbol)).await?;
    Ok(Json(ApiResponse::ok(annual)))
}
