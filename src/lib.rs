//! Service Probe - 周期性HTTP端点探测工具
//!
//! 按固定间隔向一组配置好的端点发起HTTP请求，校验响应是否符合预期
//! （成功、失败或特定状态码），并把不符合预期的结果作为错误上报：
//! - 函数式选项构建的不可变检测定义
//! - 可插拔的响应校验函数
//! - 基于通道的调度器 / 检测循环 / 错误上报任务
//! - 结构化日志记录

pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod service;
pub mod signal_handler;

// 重新导出主要类型
pub use config::{ProbeConfig, ProbeSettings};
pub use error::{CheckError, ProbeError, RequestError};
pub use health::{Check, CheckLoop, Scheduler};
pub use service::ProbeService;

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
