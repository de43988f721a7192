use lazy_static::lazy_static;
use std::sync::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, time::SystemTime},
    prelude::*,
};

use crate::{
    config::logging::LogConfig,
    error::{LogError, LogResult},
};

lazy_static! {
    // 保存 WorkerGuard，防止文件 appender 在进程退出前被 drop
    static ref LOG_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);
}

/// 日志初始化
/// 只需初始化一次；重复调用直接返回 Ok(())。
/// 环境变量 RUST_LOG 优先于配置文件中的级别。
pub fn init_logging(config: &LogConfig) -> LogResult<()> {
    let mut guard_slot = LOG_GUARD
        .lock()
        .map_err(|e| LogError::Init(format!("mutex poisoned: {e}")))?;
    if guard_slot.is_some() {
        return Ok(());
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    // 控制台输出层
    let console_layer = fmt::layer()
        .with_timer(SystemTime)
        .with_target(true)
        .with_ansi(true);

    // 文件输出层 - 每日轮换，文件名前缀为 goaudit
    let file_appender = tracing_appender::rolling::daily(&config.path, "goaudit");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_timer(SystemTime)
        .with_target(true)
        .with_ansi(false);

    let subscriber = Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LogError::Init(format!("failed to set global subscriber: {e}")))?;

    *guard_slot = Some(guard);

    Ok(())
}

/// 使用默认参数初始化日志
pub fn init_default_logging() -> LogResult<()> {
    init_logging(&LogConfig::new())
}
