//! 日志初始化
//!
//! 订阅器在读取配置之前安装，过滤器可在配置加载后热替换。

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

use crate::config::LoggingConfig;

/// 未指定级别时的启动过滤器
pub const DEFAULT_LEVEL: &str = "info";

/// 已安装订阅器的过滤器句柄
#[derive(Debug, Clone)]
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogHandle {
    /// 按配置替换过滤器，设置了 `RUST_LOG` 时保持不变
    pub fn apply(&self, config: &LoggingConfig) -> Result<()> {
        if self.from_env {
            return Ok(());
        }

        let filter = build_filter(&config.level)?;
        self.filter
            .reload(filter)
            .map_err(|e| anyhow!("Failed to reload log filter: {}", e))?;
        tracing::debug!("Log level set to {}", config.level);
        Ok(())
    }
}

/// 解析级别或 EnvFilter 指令
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level).with_context(|| format!("Invalid log level: {}", level))
}

/// 安装全局订阅器，`RUST_LOG` 优先于 `level`
pub fn init_logging(level: Option<&str>) -> Result<LogHandle> {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (build_filter(level.unwrap_or(DEFAULT_LEVEL))?, false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {}", e))?;

    Ok(LogHandle {
        filter: handle,
        from_env,
    })
}
