//! 健康检测模块
//!
//! 提供检测定义、响应校验、检测循环、周期调度和错误上报功能

pub mod check;
pub mod check_loop;
pub mod reporter;
pub mod request;
pub mod scheduler;
pub mod validator;

// 重新导出主要类型
pub use check::{Check, CheckOption, Headers};
pub use check_loop::{CheckLoop, CheckLoopHandle};
pub use reporter::{spawn_reporter, ErrorReporter, LogReporter};
pub use scheduler::Scheduler;
pub use validator::{expect_response_code, generally_fails, generally_succeeds, Validator, Verdict};
