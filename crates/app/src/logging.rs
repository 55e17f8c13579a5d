use bourse_core::config::StorageConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// # Summary
/// 初始化全局日志：标准输出 + 按天滚动的日志文件。
///
/// # Logic
/// 1. 过滤级别取自 `RUST_LOG`，缺省为 `info`。
/// 2. 日志文件写入 `<data_dir>/logs/bourse.YYYY-MM-DD.log`，不带 ANSI 颜色。
///
/// # Returns
/// 文件写入线程的守卫，需在 `main` 中持有至进程退出，否则尾部日志会丢失。
pub fn init(storage: &StorageConfig) -> Result<WorkerGuard, InitError> {
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("bourse")
        .filename_suffix("log")
        .build(storage.log_dir())?;
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    Ok(guard)
}
