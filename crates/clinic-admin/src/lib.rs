//! # Clinic Admin
//!
//! 运维相关功能：配置加载与校验、日志初始化

pub mod config;
pub mod logging;

pub use crate::config::{
    ClinicConfig, ConfigManager, ConfigValidator, DisplayConfig, LatencyConfig, LoggingConfig,
    ServerConfig, StoreConfig,
};
pub use crate::logging::{build_filter, init_logging, LogHandle};
