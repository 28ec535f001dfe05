//! 配置数据结构定义
//!
//! 定义探测器的配置结构体、验证逻辑，以及到运行时设置和检测定义的转换

use crate::error::ConfigError;
use crate::health::check::{
    opt_expect_code, opt_failure, opt_forbidden, opt_headers, opt_method, opt_success, opt_url,
    Check, CheckOption, Headers,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 主配置结构，包含全局配置和检测列表
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProbeConfig {
    /// 全局配置项
    #[serde(default)]
    pub global: GlobalConfig,
    /// 检测配置列表，为空时使用内置检测集
    #[serde(default)]
    pub checks: Vec<CheckConfig>,
}

/// 全局配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalConfig {
    /// 检测间隔（秒）
    #[serde(default = "default_check_interval")]
    pub check_interval_seconds: u64,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    /// 请求使用的User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            check_interval_seconds: default_check_interval(),
            request_timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// 期望的检测结果
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    /// 2xx/3xx
    #[default]
    Success,
    /// 非 2xx/3xx
    Failure,
    /// 403
    Forbidden,
}

/// 单个检测的配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckConfig {
    /// 目标URL
    pub url: String,
    /// HTTP方法
    #[serde(default = "default_method")]
    pub method: String,
    /// 请求头，每个键可对应多个值
    #[serde(default)]
    pub headers: Headers,
    /// 期望结果
    pub expect: Option<Expectation>,
    /// 期望的状态码列表，与 `expect` 互斥
    pub expect_codes: Option<Vec<u16>>,
}

impl CheckConfig {
    /// 转换为检测定义
    ///
    /// 选项依次为：方法、URL、请求头、校验函数。方法按配置原样使用，
    /// HTTP方法区分大小写。
    pub fn to_check(&self) -> Check {
        let validate: Option<CheckOption> = match (&self.expect_codes, self.expect) {
            (Some(codes), _) => Some(opt_expect_code(codes.clone())),
            (None, Some(Expectation::Success)) => Some(opt_success()),
            (None, Some(Expectation::Failure)) => Some(opt_failure()),
            (None, Some(Expectation::Forbidden)) => Some(opt_forbidden()),
            (None, None) => None,
        };

        Check::new([
            Some(opt_method(self.method.clone())),
            Some(opt_url(self.url.clone())),
            (!self.headers.is_empty()).then(|| opt_headers(self.headers.clone())),
            validate,
        ])
    }
}

/// 运行时设置，由配置文件和命令行参数合并得到
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSettings {
    /// 检测间隔
    pub check_interval: Duration,
    /// 单次请求超时
    pub request_timeout: Duration,
    /// 请求使用的User-Agent
    pub user_agent: String,
}

impl ProbeSettings {
    /// 校验运行时设置
    ///
    /// 检测间隔和请求超时都必须大于0。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.check_interval.is_zero() {
            return Err(ConfigError::ValidationError("检测间隔不能为0".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "请求超时时间不能为0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self::from(&GlobalConfig::default())
    }
}

impl From<&GlobalConfig> for ProbeSettings {
    fn from(global: &GlobalConfig) -> Self {
        Self {
            check_interval: Duration::from_secs(global.check_interval_seconds),
            request_timeout: Duration::from_secs(global.request_timeout_seconds),
            user_agent: global.user_agent.clone(),
        }
    }
}

// 默认值函数
fn default_check_interval() -> u64 {
    30
}
fn default_timeout() -> u64 {
    15
}
fn default_user_agent() -> String {
    format!("{}/{}", crate::APP_NAME, crate::VERSION)
}
fn default_method() -> String {
    "GET".to_string()
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &ProbeConfig) -> Result<(), String> {
    if config.global.check_interval_seconds == 0 {
        return Err("检测间隔不能为0".to_string());
    }

    if config.global.request_timeout_seconds == 0 {
        return Err("请求超时时间不能为0".to_string());
    }

    for (index, check) in config.checks.iter().enumerate() {
        if check.url.trim().is_empty() {
            return Err(format!("第{}个检测的URL不能为空", index + 1));
        }

        if check.method.trim().is_empty() {
            return Err(format!("检测 '{}' 的HTTP方法不能为空", check.url));
        }

        if let Some(codes) = &check.expect_codes {
            if check.expect.is_some() {
                return Err(format!(
                    "检测 '{}' 不能同时配置 expect 和 expect_codes",
                    check.url
                ));
            }
            if codes.is_empty() {
                return Err(format!("检测 '{}' 的期望状态码列表不能为空", check.url));
            }
            if let Some(code) = codes.iter().find(|c| !(100..=599).contains(*c)) {
                return Err(format!("检测 '{}' 的状态码无效: {}", check.url, code));
            }
        }
    }

    Ok(())
}
