//! # 缓存路由控制器

use axum::Json;
use axum::extract::State;

use crate::server::AppState;
use crate::types::{ApiResponse, CacheClearResponse};

/// 清空行情缓存
///
/// 之后的请求将重新访问行情数据源。
#[utoipa::path(
    delete,
    path = "/api/v1/cache",
    tag = "缓存 (Cache)",
    responses(
        (status = 200, description = "清空成功", body = ApiResponse<CacheClearResponse>)
    )
)]
pub async fn clear_cache(State(state): State<AppState>) -> Json<ApiResponse<CacheClearResponse>> {
    let cleared = state.market_cache.invalidate().await;
    tracing::info!("Market cache cleared ({} entries)", cleared);
    Json(ApiResponse::ok(CacheClearResponse { cleared }))
}
