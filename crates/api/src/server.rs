//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置 CORS 并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 的 DI 容器持有并调用。

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use bourse_manager::dashboard::DashboardManager;
use bourse_market::cached::CachedProvider;

use crate::routes::{cache, charts, dividends, lists, thresholds};

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - `manager` 与 `market_cache` 在服务启动前由 DI 容器注入，生命周期与进程等同。
/// - `manager` 内部的行情源应为同一个 `market_cache`，清空缓存才会生效。
#[derive(Clone)]
pub struct AppState {
    /// 看板应用服务 (Facade)
    pub manager: Arc<DashboardManager>,
    /// 带缓存的行情源 (用于清空缓存)
    pub market_cache: Arc<CachedProvider>,
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bourse 看板 API",
        version = "0.1.0",
        description = "个人行情看板的 RESTful API。提供代码列表与阈值管理、周 K 线与比值面板、股息率查询。",
        license(name = "MIT")
    ),
    tags(
        (name = "列表 (Lists)", description = "各标签页的代码列表读取与保存"),
        (name = "阈值 (Thresholds)", description = "阈值线与股息参考价"),
        (name = "图表 (Charts)", description = "周 K 线、移动平均与比值曲线"),
        (name = "股息 (Dividends)", description = "年度派息与股息率"),
        (name = "缓存 (Cache)", description = "行情缓存管理")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// 构建完整的 axum 应用路由树（含 Swagger UI 与 CORS）。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
pub fn build_router(state: AppState) -> Router {
    // 1. 注册路由并自动收集 OpenAPI Doc
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(lists::get_list, lists::put_list))
        .routes(routes!(thresholds::get_thresholds, thresholds::put_thresholds))
        .routes(routes!(charts::get_references))
        .routes(routes!(charts::get_charts))
        .routes(routes!(charts::get_differentials))
        .routes(routes!(dividends::get_yields))
        .routes(routes!(dividends::get_annual_dividends))
        .routes(routes!(cache::clear_cache))
        .with_state(state)
        .split_for_parts();

    // 2. 配置 CORS (允许所有来源)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 3. 合并 Swagger UI 路由并应用中间件
    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(cors)
}

/// 绑定地址并启动 HTTP 服务。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"0.0.0.0:8080"`
///
/// # Returns
/// TCP 绑定失败或服务异常退出时返回错误。
pub async fn start_server(state: AppState, bind_addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Bourse API Server listening on {}", bind_addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", bind_addr);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
