//! 请求构建
//!
//! 把 [`Check`] 转换为可执行的 `reqwest::Request`

use crate::error::RequestError;
use crate::health::check::Check;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Method, Request, Url};

impl Check {
    /// 构建HTTP请求
    ///
    /// 请求头以追加方式写入，同名多值保持原有顺序；客户端默认请求头
    /// （如 User-Agent）只会填充未设置的键，不会被覆盖。
    ///
    /// # 返回
    /// * `Result<Request, RequestError>` - 方法、URL或请求头非法时返回构建错误
    pub fn make_request(&self) -> Result<Request, RequestError> {
        let method = Method::from_bytes(self.method().as_bytes())
            .map_err(|_| RequestError::InvalidMethod(self.method().to_string()))?;

        let url = Url::parse(self.url()).map_err(|e| RequestError::InvalidUrl {
            url: self.url().to_string(),
            reason: e.to_string(),
        })?;

        let mut request = Request::new(method, url);
        let headers = request.headers_mut();
        for (key, values) in self.headers() {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| RequestError::InvalidHeader { name: key.clone() })?;
            for value in values {
                let value = HeaderValue::from_str(value)
                    .map_err(|_| RequestError::InvalidHeader { name: key.clone() })?;
                headers.append(name.clone(), value);
            }
        }

        Ok(request)
    }
}
