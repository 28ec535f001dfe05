//! 检测定义
//!
//! [`Check`] 描述一次HTTP探测：方法、URL、请求头以及响应校验函数。
//! 检测通过一组按顺序应用的 [`CheckOption`] 构建，构建完成后不可变。

use crate::health::validator::{
    expect_response_code, generally_fails, generally_succeeds, Validator,
};
use reqwest::Method;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// 请求头多值映射，键为规范化后的头名称，值按插入顺序保存
pub type Headers = BTreeMap<String, Vec<String>>;

/// 检测构建选项
///
/// 每个选项修改构建中的 [`Check`]，按给定顺序依次应用；构建完成后不再暴露可变引用。
pub type CheckOption = Box<dyn FnOnce(&mut Check) + Send>;

/// HTTP探测定义
#[derive(Clone)]
pub struct Check {
    url: String,
    method: String,
    headers: Headers,
    validate: Validator,
}

impl Check {
    /// 按顺序应用选项构建检测
    ///
    /// `None` 选项会被跳过；标量字段以最后一次写入为准。
    pub fn new<I, O>(options: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<Option<CheckOption>>,
    {
        let mut check = Self::default();
        for option in options {
            let option: Option<CheckOption> = option.into();
            if let Some(apply) = option {
                apply(&mut check);
            }
        }
        check
    }

    /// 目标URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// HTTP方法
    pub fn method(&self) -> &str {
        &self.method
    }

    /// 请求头
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// 获取某个请求头的全部值
    pub fn header(&self, key: &str) -> Option<&[String]> {
        self.headers
            .get(&canonical_header_key(key))
            .map(Vec::as_slice)
    }

    /// 响应校验函数
    pub fn validator(&self) -> &Validator {
        &self.validate
    }
}

impl Default for Check {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: Method::GET.to_string(),
            headers: Headers::new(),
            validate: Arc::new(generally_succeeds),
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// 规范化请求头名称，例如 `content-type` 转为 `Content-Type`
///
/// 含有非token字符的名称原样返回，留给请求构建阶段报错。
pub fn canonical_header_key(key: &str) -> String {
    let is_token = |c: char| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c);
    if key.is_empty() || !key.chars().all(is_token) {
        return key.to_string();
    }

    let mut upper = true;
    key.chars()
        .map(|c| {
            let mapped = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            mapped
        })
        .collect()
}

/// 设置HTTP方法
pub fn opt_method(method: impl Into<String>) -> CheckOption {
    let method = method.into();
    Box::new(move |c: &mut Check| c.method = method)
}

/// 设置URL
pub fn opt_url(url: impl Into<String>) -> CheckOption {
    let url = url.into();
    Box::new(move |c: &mut Check| c.url = url)
}

/// 整体替换请求头
pub fn opt_headers(headers: Headers) -> CheckOption {
    Box::new(move |c: &mut Check| {
        let mut replaced = Headers::new();
        for (key, values) in headers {
            replaced
                .entry(canonical_header_key(&key))
                .or_default()
                .extend(values);
        }
        c.headers = replaced;
    })
}

/// 设置某个请求头的全部值（覆盖已有值）
pub fn opt_set_header<K, V>(key: K, values: V) -> CheckOption
where
    K: AsRef<str>,
    V: IntoIterator,
    V::Item: Into<String>,
{
    let key = canonical_header_key(key.as_ref());
    let values: Vec<String> = values.into_iter().map(Into::into).collect();
    Box::new(move |c: &mut Check| {
        c.headers.insert(key, values);
    })
}

/// 追加一个请求头值（保留多值语义）
pub fn opt_add_header(key: impl AsRef<str>, value: impl Into<String>) -> CheckOption {
    let key = canonical_header_key(key.as_ref());
    let value = value.into();
    Box::new(move |c: &mut Check| {
        c.headers.entry(key).or_default().push(value);
    })
}

/// 直接设置校验函数
pub fn opt_validate(validate: Validator) -> CheckOption {
    Box::new(move |c: &mut Check| c.validate = validate)
}

/// 使用 GET 方法
pub fn opt_get() -> CheckOption {
    opt_method(Method::GET.as_str())
}

/// 使用 PUT 方法
pub fn opt_put() -> CheckOption {
    opt_method(Method::PUT.as_str())
}

/// 使用 POST 方法
pub fn opt_post() -> CheckOption {
    opt_method(Method::POST.as_str())
}

/// 使用 DELETE 方法
pub fn opt_delete() -> CheckOption {
    opt_method(Method::DELETE.as_str())
}

/// 使用 PATCH 方法
pub fn opt_patch() -> CheckOption {
    opt_method(Method::PATCH.as_str())
}

/// 使用 OPTIONS 方法
pub fn opt_options() -> CheckOption {
    opt_method(Method::OPTIONS.as_str())
}

/// 期望响应码为给定列表之一
pub fn opt_expect_code(codes: impl Into<Vec<u16>>) -> CheckOption {
    opt_validate(expect_response_code(codes))
}

/// 期望请求成功（2xx/3xx）
pub fn opt_success() -> CheckOption {
    opt_validate(Arc::new(generally_succeeds))
}

/// 期望请求失败（非2xx/3xx）
pub fn opt_failure() -> CheckOption {
    opt_validate(Arc::new(generally_fails))
}

/// 期望 403 Forbidden
pub fn opt_forbidden() -> CheckOption {
    opt_expect_code([403])
}
