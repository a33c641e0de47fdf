//! 日志初始化

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化 tracing 日志系统
///
/// 通过 RUST_LOG 环境变量控制日志级别，未设置时使用 `default_directive`，
/// 例如 `ne_notifier=info`。日志写到 stderr；重复调用不会报错。
pub fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .try_init();
}
