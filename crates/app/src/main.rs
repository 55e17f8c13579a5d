mod logging;
mod settings;

use std::sync::Arc;

use bourse_api::server::{AppState, start_server};
use bourse_cache::mem::MemCache;
use bourse_core::common::time::RealTimeProvider;
use bourse_feed::yahoo::YahooProvider;
use bourse_manager::dashboard::DashboardManager;
use bourse_market::cached::CachedProvider;
use bourse_store::list::FileSymbolListStore;
use bourse_store::threshold::FileThresholdStore;
use tracing::info;

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到 DashboardManager。
///
/// # Logic
/// 1. 加载配置并初始化全局日志。
/// 2. 实例化基础设施层（Feed、Cache、Store）。
/// 3. 构造应用服务层（DashboardManager）。
/// 4. 启动 HTTP 服务，直到服务退出或收到退出信号。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 加载配置并初始化日志
    let config = settings::load()?;
    let _log_guard = logging::init(&config.storage)?;
    info!("Bourse starting, data dir: {}", config.storage.data_dir);

    // 2. 实例化基础设施层
    let feed = Arc::new(YahooProvider::new(&config.feed)?);
    let market_cache = Arc::new(CachedProvider::new(feed, Arc::new(MemCache::new())));
    let lists = Arc::new(FileSymbolListStore::new(config.storage.clone()));
    let thresholds = Arc::new(FileThresholdStore::new(config.storage.thresholds_path()));

    // 3. 构造应用服务层（注入 Core Trait 抽象）
    let manager = DashboardManager::new(
        market_cache.clone(),
        lists,
        thresholds,
        Arc::new(RealTimeProvider),
        config.dashboard.clone(),
    );
    info!("DashboardManager initialized.");

    // 4. 启动服务，等待外部退出信号
    let state = AppState {
        manager,
        market_cache,
    };
    let bind_addr = config.server.bind_addr();
    tokio::select! {
        result = start_server(state, &bind_addr) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutdown signal received. Exiting..."),
    }

    Ok(())
}
