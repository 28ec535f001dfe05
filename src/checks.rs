//! 内置检测集合
//!
//! 未提供配置文件（或配置文件中没有 `[[checks]]`）时使用的检测集合

use crate::config::ProbeConfig;
use crate::health::check::{
    opt_expect_code, opt_failure, opt_forbidden, opt_options, opt_post, opt_set_header,
    opt_success, opt_url, Check,
};

/// 内置检测的目标地址
pub const BUILTIN_BASE_URL: &str = "http://localhost:8080";

/// 内置检测集合
pub fn builtin_checks() -> Vec<Check> {
    let url = |path: &str| opt_url(format!("{BUILTIN_BASE_URL}{path}"));

    vec![
        Check::new([url("/healthz")]),
        Check::new([url("/readyz"), opt_expect_code([200])]),
        Check::new([url("/admin"), opt_forbidden()]),
        Check::new([url("/does-not-exist"), opt_failure()]),
        Check::new([
            opt_post(),
            url("/api/v1/echo"),
            opt_set_header("Content-Type", ["application/json"]),
            opt_success(),
        ]),
        Check::new([opt_options(), url("/api/v1/echo"), opt_expect_code([200, 204])]),
    ]
}

/// 根据配置选择检测集合
///
/// 配置中声明了检测时按声明顺序使用，否则使用 [`builtin_checks`]。
pub fn resolve_checks(config: &ProbeConfig) -> Vec<Check> {
    if config.checks.is_empty() {
        builtin_checks()
    } else {
        config.checks.iter().map(|c| c.to_check()).collect()
    }
}
