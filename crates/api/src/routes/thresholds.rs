//! # 阈值路由控制器

use axum::Json;
use axum::extract::State;
use bourse_core::store::port::ThresholdMap;
use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::ApiResponse;

/// 获取全部阈值
///
/// 阈值既是 K 线面板上的水平线，也是股息率计算的参考价。
#[utoipa::path(
    get,
    path = "/api/v1/thresholds",
    tag = "阈值 (Thresholds)",
    responses(
        (status = 200, description = "获取成功", body = ApiResponse<BTreeMap<String, f64>>)
    )
)]
pub async fn get_thresholds(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ThresholdMap>>, ApiError> {
    let thresholds = state.manager.load_thresholds().await?;
    Ok(Json(ApiResponse::ok(thresholds)))
}

/// 覆盖保存全部阈值
#[utoipa::path(
    put,
    path = "/api/v1/thresholds",
    tag = "阈值 (Thresholds)",
    request_body = BTreeMap<String, f64>,
    responses(
        (status = 200, description = "保存成功", body = ApiResponse<BTreeMap<String, f64>>),
        (status = 400, description = "代码为空、含冒号或空白，或数值非法")
    )
)]
pub async fn put_thresholds(
    State(state): State<AppState>,
    Json(thresholds): Json<ThresholdMap>,
) -> Result<Json<ApiResponse<ThresholdMap>>, ApiError> {
    for (symbol, value) in &thresholds {
        symbol.validate().map_err(ApiError::BadRequest)?;
        if !value.is_finite() {
            return Err(ApiError::BadRequest(format!(
                "Invalid threshold for {}: {}",
                symbol, value
            )));
        }
    }
    state.manager.save_thresholds(&thresholds).await?;
    Ok(Json(ApiResponse::ok(thresholds)))
}
