//! 日志系统模块
//!
//! 提供结构化日志配置和管理功能。日志行带有 RFC 3339 时间戳前缀，
//! `log` crate 的记录（如 reqwest 内部日志）会桥接到 tracing。

use log::LevelFilter;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing_log::AsTrace;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter, Layer};

/// 全局日志初始化状态
#[derive(Debug, Default)]
struct GlobalLoggingState {
    /// 是否已初始化
    initialized: bool,
    /// 当前配置
    current_config: Option<LogConfig>,
}

/// 全局日志状态管理器
static GLOBAL_LOGGING_STATE: OnceLock<Mutex<GlobalLoggingState>> = OnceLock::new();

fn global_state() -> &'static Mutex<GlobalLoggingState> {
    GLOBAL_LOGGING_STATE.get_or_init(|| Mutex::new(GlobalLoggingState::default()))
}

/// 日志配置结构
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// 日志级别
    pub level: LevelFilter,
    /// 是否使用JSON格式
    pub json_format: bool,
    /// 是否输出源码位置
    pub with_location: bool,
    /// 模块级别日志控制
    pub module_levels: HashMap<String, LevelFilter>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            json_format: false,
            with_location: false,
            module_levels: HashMap::from([("hyper_util".to_string(), LevelFilter::Warn)]),
        }
    }
}

/// 日志系统
#[derive(Debug)]
pub struct LoggingSystem {
    config: LogConfig,
}

impl LoggingSystem {
    /// 初始化日志系统
    ///
    /// 重复调用不会重新初始化，直接返回当前配置对应的实例。
    pub fn setup_logging(config: LogConfig) -> anyhow::Result<Self> {
        Self::setup_logging_with_options(config, false)
    }

    /// 初始化日志系统
    ///
    /// # 参数
    /// * `config` - 日志配置
    /// * `force` - 已初始化时是否仍尝试安装订阅器
    pub fn setup_logging_with_options(config: LogConfig, force: bool) -> anyhow::Result<Self> {
        let mut state = global_state()
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if state.initialized && !force {
            let current = state.current_config.clone().unwrap_or(config);
            return Ok(Self { config: current });
        }

        Self::init_tracing_subscriber(&config)?;

        state.initialized = true;
        state.current_config = Some(config.clone());
        Ok(Self { config })
    }

    /// 当前实例使用的配置
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// 构建环境过滤器
    ///
    /// `RUST_LOG` 中的指令优先，其后追加全局级别和模块级别。
    fn build_env_filter(config: &LogConfig) -> EnvFilter {
        let mut env_filter = EnvFilter::from_default_env()
            .add_directive(Directive::from(config.level.as_trace()));

        for (module, level) in &config.module_levels {
            match format!("{module}={}", level.as_trace()).parse::<Directive>() {
                Ok(directive) => env_filter = env_filter.add_directive(directive),
                Err(e) => eprintln!("忽略无效的模块日志级别 {module}: {e}"),
            }
        }

        env_filter
    }

    /// 初始化 tracing subscriber
    ///
    /// 订阅器同时安装 `log` 到 tracing 的桥接。
    fn init_tracing_subscriber(config: &LogConfig) -> anyhow::Result<()> {
        let env_filter = Self::build_env_filter(config);

        let fmt_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_timer(fmt::time::ChronoUtc::rfc_3339())
                .with_file(config.with_location)
                .with_line_number(config.with_location)
                .boxed()
        } else {
            fmt::layer()
                .with_timer(fmt::time::ChronoUtc::rfc_3339())
                .with_ansi(true)
                .with_file(config.with_location)
                .with_line_number(config.with_location)
                .with_target(false)
                .boxed()
        };

        match registry().with(env_filter).with(fmt_layer).try_init() {
            Ok(()) => {
                tracing::debug!("日志系统初始化完成: {:?}", config);
                Ok(())
            }
            Err(e) => {
                let error_msg = e.to_string();
                if error_msg.contains("already") {
                    tracing::debug!("日志系统已经初始化过了");
                    Ok(())
                } else {
                    Err(anyhow::anyhow!("tracing subscriber初始化失败: {error_msg}"))
                }
            }
        }
    }

    /// 检查日志系统是否已初始化
    pub fn is_initialized() -> bool {
        global_state()
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .initialized
    }

    /// 获取当前日志配置（如果已初始化）
    pub fn current_config() -> Option<LogConfig> {
        global_state()
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current_config
            .clone()
    }

    /// 重置日志系统状态（主要用于测试）
    #[cfg(test)]
    pub fn reset_for_testing() {
        let mut state = global_state()
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        state.initialized = false;
        state.current_config = None;
    }
}
