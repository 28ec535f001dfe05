//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use crate::config::{get_default_config_path, ProbeSettings};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Service Probe - 周期性HTTP端点探测工具
#[derive(Parser, Debug, Clone)]
#[command(
    name = "service-probe",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径",
        env = "SERVICE_PROBE_CONFIG"
    )]
    pub config: Option<PathBuf>,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        help = "日志级别",
        env = "SERVICE_PROBE_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// 使用JSON格式输出日志
    #[arg(long, help = "使用JSON格式输出日志", env = "SERVICE_PROBE_JSON_LOGS")]
    pub json_logs: bool,

    /// 检测间隔（秒），覆盖配置文件
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        help = "检测间隔（秒）",
        env = "SERVICE_PROBE_INTERVAL",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: Option<u64>,

    /// 请求超时（秒），覆盖配置文件
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        help = "请求超时（秒）",
        env = "SERVICE_PROBE_TIMEOUT",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: Option<u64>,

    /// 只执行一轮检测后退出
    #[arg(long, help = "只执行一轮检测后退出")]
    pub once: bool,
}

impl Args {
    /// 获取配置文件路径
    ///
    /// # 返回
    /// * `(PathBuf, bool)` - 路径以及是否由用户显式指定
    pub fn get_config_path(&self) -> (PathBuf, bool) {
        match &self.config {
            Some(path) => (path.clone(), true),
            None => (get_default_config_path(), false),
        }
    }

    /// 把命令行覆盖项应用到运行时设置
    pub fn apply_overrides(&self, settings: &mut ProbeSettings) {
        if let Some(interval) = self.interval {
            settings.check_interval = Duration::from_secs(interval);
        }
        if let Some(timeout) = self.timeout {
            settings.request_timeout = Duration::from_secs(timeout);
        }
    }
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}
