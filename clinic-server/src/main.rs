//! 诊所记录服务主程序

use anyhow::{Context, Result};
use clap::Parser;
use clinic_admin::{init_logging, ClinicConfig, ConfigManager};
use clinic_store::{Practice, Seed};
use clinic_web::{AppState, WebServer};
use tracing::{error, info};

/// 诊所记录服务命令行参数
#[derive(Parser, Debug)]
#[command(name = "clinic-server")]
#[command(about = "诊所记录服务：患者、预约、助理、药品、处方与处方模板")]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 监听主机
    #[arg(long)]
    host: Option<String>,

    /// 服务器端口
    #[arg(short, long)]
    port: Option<u16>,

    /// 日志级别
    #[arg(short, long)]
    log_level: Option<String>,

    /// 种子数据目录
    #[arg(short, long)]
    fixtures: Option<String>,

    /// 关闭模拟延迟
    #[arg(long)]
    no_latency: bool,

    /// 打印生效配置后退出
    #[arg(long)]
    print_config: bool,
}

impl Args {
    /// 命令行参数覆盖配置文件和环境变量
    fn apply(&self, config: &mut ClinicConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(dir) = &self.fixtures {
            config.store.fixtures_dir = Some(dir.clone());
        }
        if self.no_latency {
            config.latency.enabled = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 日志先于配置加载初始化，配置就绪后再替换级别
    let log = if args.print_config {
        None
    } else {
        Some(init_logging(args.log_level.as_deref())?)
    };

    let manager = ConfigManager::new(args.config.as_deref())?;
    let mut config = manager.get_config().await;
    args.apply(&mut config);
    manager.update_config(config.clone()).await?;

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    if let Some(log) = &log {
        log.apply(&config.logging)?;
    }

    info!("Starting {}", config.server.name);
    info!("  Listen address: {}:{}", config.server.host, config.server.port);
    info!("  Id policy: {:?}", config.store.id_policy);
    info!(
        "  Simulated latency: {}",
        if config.latency.enabled { "on" } else { "off" }
    );

    let seed = match &config.store.fixtures_dir {
        Some(dir) => Seed::load_dir(dir)
            .await
            .with_context(|| format!("Failed to load fixtures from {}", dir))?,
        None => Seed::builtin().context("Failed to load builtin fixtures")?,
    };

    let practice = Practice::new(seed, &config.store_options()).context("Invalid seed data")?;
    let mut state = AppState::new(practice, config.display_offset()?);
    state.service_name = config.server.name.clone();

    let server = WebServer::new(config.socket_addr()?, state);
    if let Err(e) = server.run().await {
        error!("Server failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
