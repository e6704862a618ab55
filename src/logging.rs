//! 日志初始化
//!
//! 库代码只通过`tracing`宏输出日志，订阅者由可执行程序（或测试）安装。

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// 按`-v`的个数映射日志级别：0 → info，1 → debug，≥2 → trace
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// 安装全局订阅者。设置了`RUST_LOG`时以其为准；重复调用不会报错
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init()
        .ok();
}
