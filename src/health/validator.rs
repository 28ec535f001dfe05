//! 响应校验函数
//!
//! 校验函数接收一个可能缺失的HTTP响应，返回校验结论：
//! `Ok(())` 表示通过，`Err(msg)` 表示失败并附带诊断信息。

use reqwest::{Response, StatusCode};
use std::sync::Arc;

/// 校验结论
pub type Verdict = Result<(), String>;

/// 响应校验函数
pub type Validator = Arc<dyn Fn(Option<&Response>) -> Verdict + Send + Sync>;

/// 响应缺失时的诊断信息
pub const MISSING_RESPONSE: &str = "missing response";

/// 状态码是否属于 [200, 400)
fn is_success(status: StatusCode) -> bool {
    StatusCode::OK <= status && status < StatusCode::BAD_REQUEST
}

/// 2xx/3xx 视为通过
pub fn generally_succeeds(response: Option<&Response>) -> Verdict {
    let response = response.ok_or_else(|| MISSING_RESPONSE.to_string())?;
    let status = response.status();
    if is_success(status) {
        Ok(())
    } else {
        Err(format!(
            "unexpected response code {} (expected success)",
            status.as_u16()
        ))
    }
}

/// 非 2xx/3xx 视为通过
pub fn generally_fails(response: Option<&Response>) -> Verdict {
    let response = response.ok_or_else(|| MISSING_RESPONSE.to_string())?;
    let status = response.status();
    if is_success(status) {
        Err(format!(
            "unexpected response code {} (expected non-success)",
            status.as_u16()
        ))
    } else {
        Ok(())
    }
}

/// 状态码必须与给定列表之一完全一致
pub fn expect_response_code(codes: impl Into<Vec<u16>>) -> Validator {
    let codes: Vec<u16> = codes.into();
    Arc::new(move |response: Option<&Response>| -> Verdict {
        let response = response.ok_or_else(|| MISSING_RESPONSE.to_string())?;
        let actual = response.status().as_u16();
        if codes.contains(&actual) {
            return Ok(());
        }

        let expected = codes
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        Err(format!(
            "unexpected response code {actual} (expected [{expected}])"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(code: u16) -> Response {
        Response::from(
            http::Response::builder()
                .status(code)
                .body("")
                .unwrap(),
        )
    }

    #[test]
    fn test_generally_succeeds_range() {
        for code in 100..600 {
            let verdict = generally_succeeds(Some(&response(code)));
            if (200..400).contains(&code) {
                assert!(verdict.is_ok(), "code {code} should pass");
            } else {
                let msg = verdict.unwrap_err();
                assert!(msg.contains(&code.to_string()));
                assert!(msg.contains("expected success"));
            }
        }
    }

    #[test]
    fn test_generally_fails_is_complement() {
        for code in 100..600 {
            let resp = response(code);
            assert_ne!(
                generally_succeeds(Some(&resp)).is_ok(),
                generally_fails(Some(&resp)).is_ok(),
                "code {code}"
            );
        }
        let msg = generally_fails(Some(&response(204))).unwrap_err();
        assert_eq!(msg, "unexpected response code 204 (expected non-success)");
    }

    #[test]
    fn test_expect_response_code() {
        let validate = expect_response_code([200, 201]);
        assert!(validate(Some(&response(200))).is_ok());
        assert!(validate(Some(&response(201))).is_ok());
        assert!(validate(Some(&response(204))).is_err());

        let msg = validate(Some(&response(404))).unwrap_err();
        assert_eq!(msg, "unexpected response code 404 (expected [200 201])");
    }

    #[test]
    fn test_missing_response() {
        assert_eq!(generally_succeeds(None).unwrap_err(), MISSING_RESPONSE);
        assert_eq!(generally_fails(None).unwrap_err(), MISSING_RESPONSE);
        assert_eq!(expect_response_code([403])(None).unwrap_err(), "missing response");
    }
}
