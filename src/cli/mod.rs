//! 命令行接口模块
//!
//! 定义命令行参数

pub mod args;

pub use args::{Args, LogLevel};
