//! Service Probe 主程序入口
//!
//! 周期性HTTP端点探测工具

use anyhow::{Context, Result};
use clap::Parser;
use service_probe::checks::resolve_checks;
use service_probe::cli::Args;
use service_probe::config::{ConfigLoader, ProbeConfig, ProbeSettings, TomlConfigLoader};
use service_probe::logging::{LogConfig, LoggingSystem};
use service_probe::signal_handler::setup_signal_handlers;
use service_probe::ProbeService;
use tokio::sync::broadcast;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 初始化日志系统
    let log_config = LogConfig {
        level: args.log_level.clone().into(),
        json_format: args.json_logs,
        ..Default::default()
    };
    let _logging_system = LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    info!("Service Probe v{} 启动", service_probe::VERSION);

    // 加载配置并应用命令行覆盖
    let config = load_config(&args).await?;
    let mut settings = ProbeSettings::from(&config.global);
    args.apply_overrides(&mut settings);
    let checks = resolve_checks(&config);

    info!(
        "检测数量: {}，检测间隔: {:?}，请求超时: {:?}",
        checks.len(),
        settings.check_interval,
        settings.request_timeout
    );

    let service = ProbeService::new(settings, checks).context("运行设置无效")?;

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let _signals = setup_signal_handlers(shutdown_tx.clone()).context("设置信号处理器失败")?;

    let reported = if args.once {
        service.run_once(&shutdown_tx).await
    } else {
        service.run(&shutdown_tx, shutdown_rx).await
    }
    .context("探测服务运行失败")?;

    info!("退出，共上报 {} 个错误", reported);
    Ok(())
}

/// 加载配置文件
///
/// 显式指定的配置文件必须存在；默认路径下没有配置文件时使用默认配置和内置检测集合。
async fn load_config(args: &Args) -> Result<ProbeConfig> {
    let (config_path, explicit) = args.get_config_path();

    if !explicit && !config_path.exists() {
        info!(
            "未找到配置文件 {}，使用默认配置和内置检测集合",
            config_path.display()
        );
        return Ok(ProbeConfig::default());
    }

    TomlConfigLoader::new(true)
        .load_from_file(&config_path)
        .await
        .with_context(|| format!("加载配置文件失败: {}", config_path.display()))
}
