//! 配置管理
//!
//! 配置来源依次为内置默认值、TOML 配置文件和 `CLINIC_` 前缀的环境变量，
//! 后者覆盖前者。例如 `CLINIC_SERVER__PORT=9090`。

use ::config::{Config, Environment, File};
use anyhow::{Context, Result};
use chrono::FixedOffset;
use clinic_core::utils::fixed_offset;
use clinic_store::{IdPolicy, LatencyProfile, StoreOptions};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{error, info};

/// 配置管理器
#[derive(Debug)]
pub struct ConfigManager {
    /// 配置数据
    config: Arc<RwLock<ClinicConfig>>,
    /// 配置文件路径，未指定时只使用默认值和环境变量
    config_path: Option<String>,
    /// 配置验证器
    validator: ConfigValidator,
}

/// 系统完整配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub latency: LatencyConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务名称
    pub name: String,
    /// 监听主机
    pub host: String,
    /// 监听端口
    pub port: u16,
}

/// 存储配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// 标识复用策略
    pub id_policy: IdPolicy,
    /// 种子数据目录，未设置时使用内置数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixtures_dir: Option<String>,
}

/// 模拟延迟配置（毫秒）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub enabled: bool,
    pub list_ms: u64,
    pub get_ms: u64,
    pub write_ms: u64,
    pub delete_ms: u64,
}

/// 展示配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// 按日期归档预约时使用的 UTC 偏移（分钟）
    pub utc_offset_minutes: i32,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别或 EnvFilter 指令
    pub level: String,
}

/// 验证规则
#[derive(Debug)]
struct ValidationRule {
    field_path: String,
    validator: fn(&ClinicConfig) -> Result<()>,
    error_message: String,
}

/// 配置验证器
#[derive(Debug)]
pub struct ConfigValidator {
    validation_rules: Vec<ValidationRule>,
}

/// 单项延迟上限
const MAX_LATENCY_MS: u64 = 60_000;

impl ClinicConfig {
    /// 监听地址
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.server.host, self.server.port))
    }

    /// 存储构造选项
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            id_policy: self.store.id_policy,
            latency: self.latency.profile(),
        }
    }

    /// 预约归档使用的时区偏移
    pub fn display_offset(&self) -> Result<FixedOffset> {
        fixed_offset(self.display.utc_offset_minutes).context("Invalid display.utc_offset_minutes")
    }

    /// 渲染为 TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

impl LatencyConfig {
    pub fn profile(&self) -> Option<LatencyProfile> {
        if !self.enabled {
            return None;
        }

        Some(LatencyProfile {
            list: Duration::from_millis(self.list_ms),
            get: Duration::from_millis(self.get_ms),
            write: Duration::from_millis(self.write_ms),
            delete: Duration::from_millis(self.delete_ms),
        })
    }
}

impl ConfigManager {
    /// 创建新的配置管理器
    pub fn new(config_path: Option<&str>) -> Result<Self> {
        let config = Self::load_config(config_path)?;
        let validator = ConfigValidator::new();
        validator.validate(&config)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path: config_path.map(str::to_string),
            validator,
        })
    }

    /// 从文件和环境变量加载配置
    fn load_config(config_path: Option<&str>) -> Result<ClinicConfig> {
        let mut builder = Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("CLINIC")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: ClinicConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        match config_path {
            Some(path) => info!("Configuration loaded successfully from: {}", path),
            None => info!("Configuration loaded from defaults and environment"),
        }
        Ok(config)
    }

    /// 获取配置
    pub async fn get_config(&self) -> ClinicConfig {
        let config = self.config.read().await;
        config.clone()
    }

    /// 更新配置
    pub async fn update_config(&self, new_config: ClinicConfig) -> Result<()> {
        self.validator.validate(&new_config)?;

        let mut config = self.config.write().await;
        *config = new_config;

        info!("Configuration updated successfully");
        Ok(())
    }

    /// 重新加载配置
    pub async fn reload_config(&self) -> Result<()> {
        let new_config = Self::load_config(self.config_path.as_deref())?;
        self.update_config(new_config).await
    }

    /// 验证配置
    pub async fn validate_config(&self) -> Result<()> {
        let config = self.config.read().await;
        self.validator.validate(&config)
    }
}

impl ConfigValidator {
    /// 创建新的配置验证器
    pub fn new() -> Self {
        let validation_rules = vec![
            ValidationRule {
                field_path: "server.port".to_string(),
                validator: |config| {
                    if config.server.port == 0 {
                        Err(anyhow::anyhow!("Server port cannot be 0"))
                    } else {
                        Ok(())
                    }
                },
                error_message: "Invalid server port".to_string(),
            },
            ValidationRule {
                field_path: "server.host".to_string(),
                validator: |config| config.socket_addr().map(|_| ()),
                error_message: "Invalid server host".to_string(),
            },
            ValidationRule {
                field_path: "latency".to_string(),
                validator: |config| {
                    let latency = &config.latency;
                    let slowest = [latency.list_ms, latency.get_ms, latency.write_ms, latency.delete_ms]
                        .into_iter()
                        .max()
                        .unwrap_or(0);
                    if slowest > MAX_LATENCY_MS {
                        Err(anyhow::anyhow!("Latency {}ms exceeds {}ms", slowest, MAX_LATENCY_MS))
                    } else {
                        Ok(())
                    }
                },
                error_message: "Invalid latency settings".to_string(),
            },
            ValidationRule {
                field_path: "display.utc_offset_minutes".to_string(),
                validator: |config| config.display_offset().map(|_| ()),
                error_message: "Invalid display offset".to_string(),
            },
            ValidationRule {
                field_path: "logging.level".to_string(),
                validator: |config| {
                    if config.logging.level.trim().is_empty() {
                        Err(anyhow::anyhow!("Log level cannot be empty"))
                    } else {
                        Ok(())
                    }
                },
                error_message: "Invalid log level".to_string(),
            },
        ];

        Self { validation_rules }
    }

    /// 验证配置
    pub fn validate(&self, config: &ClinicConfig) -> Result<()> {
        for rule in &self.validation_rules {
            if let Err(e) = (rule.validator)(config) {
                error!("Configuration validation failed for {}: {}", rule.field_path, e);
                return Err(anyhow::anyhow!("{}: {}", rule.error_message, e));
            }
        }

        info!("Configuration validation passed");
        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "clinic-server".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        let profile = LatencyProfile::api_like();
        Self {
            enabled: true,
            list_ms: profile.list.as_millis() as u64,
            get_ms: profile.get.as_millis() as u64,
            write_ms: profile.write.as_millis() as u64,
            delete_ms: profile.delete.as_millis() as u64,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
