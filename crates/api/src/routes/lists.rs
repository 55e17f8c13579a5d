//! # 代码列表路由控制器
//!
//! 实现 `/api/v1/lists/{kind}` 路径下的读取与保存接口，对应看板每个标签页的输入框。

use axum::Json;
use axum::extract::{Path, State};
use bourse_core::common::{Symbol, parse_symbol_input};

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiResponse, SymbolListRequest, parse_kind};

/// 获取指定类别的代码列表
///
/// 列表文件不存在时返回空列表。
#[utoipa::path(
    get,
    path = "/api/v1/lists/{kind}",
    tag = "列表 (Lists)",
    params(
        ("kind" = String, Path, description = "列表类别: etf, stock, currency, research")
    ),
    responses(
        (status = 200, description = "获取成功", body = ApiResponse<Vec<Symbol>>),
        (status = 400, description = "未知的列表类别")
    )
)]
pub async fn get_list(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<ApiResponse<Vec<Symbol>>>, ApiError> {
    let kind = parse_kind(&kind)?;
    let symbols = state.manager.list(kind).await?;
    Ok(Json(ApiResponse::ok(symbols)))
}

/// 保存指定类别的代码列表
///
/// 请求体为逗号分隔的代码字符串，去除空白与空段后整体覆盖列表文件。
#[utoipa::path(
    put,
    path = "/api/v1/lists/{kind}",
    tag = "列表 (Lists)",
    params(
        ("kind" = String, Path, description = "列表类别: etf, stock, currency, research")
    ),
    request_body = SymbolListRequest,
    responses(
        (status = 200, description = "保存成功，返回实际保存的列表", body = ApiResponse<Vec<Symbol>>),
        (status = 400, description = "未知的列表类别，或代码含冒号、空白")
    )
)]
pub async fn put_list(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(req): Json<SymbolListRequest>,
) -> Result<Json<ApiResponse<Vec<Symbol>>>, ApiError> {
    let kind = parse_kind(&kind)?;
    let saved = state
        .manager
        .save_list(kind, parse_symbol_input(&req.symbols))
        .await?;
    Ok(Json(ApiResponse::ok(saved)))
}
