//! 错误处理模块
//!
//! 定义应用程序的统一错误类型，以及检测循环上报的 [`CheckError`]

use crate::health::check::Check;
use std::fmt;
use thiserror::Error;

/// Service Probe 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum ProbeError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// HTTP客户端初始化错误
    #[error("HTTP客户端初始化失败: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },
}

/// 请求错误类型
///
/// 前三种为请求构建阶段的错误，`Execute` 为请求执行阶段的错误
/// （网络故障、超时、连接被拒绝等）。
#[derive(Error, Debug)]
pub enum RequestError {
    /// HTTP方法非法
    #[error("invalid method {0:?}")]
    InvalidMethod(String),

    /// URL无法解析
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// 请求头名称或值非法
    #[error("invalid header {name:?}")]
    InvalidHeader { name: String },

    /// 请求执行失败
    #[error(transparent)]
    Execute(#[from] reqwest::Error),
}

impl RequestError {
    /// 是否为请求构建阶段的错误
    pub fn is_construction(&self) -> bool {
        !matches!(self, RequestError::Execute(_))
    }

    /// 是否为超时错误
    pub fn is_timeout(&self) -> bool {
        matches!(self, RequestError::Execute(e) if e.is_timeout())
    }
}

/// 单次检测失败的结构化错误
///
/// 携带原始的 [`Check`]，以便日志中能定位到具体的方法和URL。
#[derive(Debug)]
pub struct CheckError {
    cause: Option<RequestError>,
    message: String,
    check: Check,
}

impl CheckError {
    /// 创建带底层原因的错误（请求构建或执行失败）
    pub fn with_cause(cause: RequestError, message: impl Into<String>, check: Check) -> Self {
        Self {
            cause: Some(cause),
            message: message.into(),
            check,
        }
    }

    /// 创建校验失败的错误（没有底层原因）
    pub fn validation(message: impl Into<String>, check: Check) -> Self {
        Self {
            cause: None,
            message: message.into(),
            check,
        }
    }

    /// 错误描述
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 底层原因
    pub fn cause(&self) -> Option<&RequestError> {
        self.cause.as_ref()
    }

    /// 导致该错误的检测定义
    pub fn check(&self) -> &Check {
        &self.check
    }

    /// 导致该错误的URL
    pub fn url(&self) -> &str {
        self.check.url()
    }

    /// 导致该错误的HTTP方法
    pub fn method(&self) -> &str {
        self.check.method()
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            None => write!(
                f,
                "{} [{} {}]",
                self.message,
                self.check.method(),
                self.check.url()
            ),
            Some(cause) => write!(f, "{} because {}", self.message, cause),
        }
    }
}

impl std::error::Error for CheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::check::{opt_post, opt_url};
    use std::error::Error as _;

    #[test]
    fn test_validation_error_rendering() {
        let check = Check::new([opt_post(), opt_url("http://example.test/health")]);
        let err = CheckError::validation("unexpected response code 500 (expected success)", check);

        assert_eq!(
            err.to_string(),
            "unexpected response code 500 (expected success) [POST http://example.test/health]"
        );
        assert!(err.source().is_none());
        assert_eq!(err.method(), "POST");
        assert_eq!(err.url(), "http://example.test/health");
    }

    #[test]
    fn test_caused_error_rendering() {
        let check = Check::new([opt_url("::not a url::")]);
        let cause = RequestError::InvalidUrl {
            url: "::not a url::".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        let err = CheckError::with_cause(cause, "cannot make request", check);

        assert_eq!(
            err.to_string(),
            "cannot make request because invalid URL \"::not a url::\": relative URL without a base"
        );
        assert!(err.source().is_some());
        assert!(err.cause().is_some_and(RequestError::is_construction));
    }

    #[test]
    fn test_config_error_wraps_into_probe_error() {
        let err: ProbeError = ConfigError::FileNotFound {
            path: "/nope/probe.toml".to_string(),
        }
        .into();
        assert!(err.to_string().contains("/nope/probe.toml"));
    }
}
