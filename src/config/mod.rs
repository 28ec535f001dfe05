//! 配置管理模块
//!
//! 提供配置文件解析、验证以及运行时设置的合并

pub mod loader;
pub mod types;

// 重新导出主要类型
pub use loader::{get_default_config_path, ConfigLoader, TomlConfigLoader};
pub use types::{validate_config, CheckConfig, Expectation, GlobalConfig, ProbeConfig, ProbeSettings};
