//! 检测循环
//!
//! 长期运行的工作任务：从输入通道接收 [`Check`]，使用共享的HTTP客户端
//! 逐个执行并校验响应，把失败以 [`CheckError`] 的形式发送到错误通道。
//! 收到关闭信号后关闭两个通道并退出；正在执行的检测不会被打断。

use crate::config::ProbeSettings;
use crate::error::{CheckError, Result};
use crate::health::check::Check;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 输入通道和错误通道的容量
pub const CHANNEL_CAPACITY: usize = 1;

/// 请求构建失败时的错误描述
pub const MSG_CANNOT_MAKE_REQUEST: &str = "cannot make request";

/// 请求执行失败时的错误描述
pub const MSG_CANNOT_EXECUTE_REQUEST: &str = "cannot execute request";

/// 检测循环
pub struct CheckLoop {
    /// HTTP客户端
    client: Client,
    /// 单次请求超时时间
    timeout: Duration,
}

/// 已启动的检测循环句柄
pub struct CheckLoopHandle {
    /// 输入通道发送端
    pub checks: mpsc::Sender<Check>,
    /// 错误通道接收端
    pub errors: mpsc::Receiver<CheckError>,
    /// 循环任务句柄
    pub task: JoinHandle<()>,
}

impl CheckLoop {
    /// 创建新的检测循环
    ///
    /// # 参数
    /// * `settings` - 运行时设置，提供超时时间和User-Agent
    ///
    /// # 返回
    /// * `Result<Self>` - 检测循环实例
    pub fn new(settings: &ProbeSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            timeout: settings.request_timeout,
        })
    }

    /// 单次请求超时时间
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 执行单个检测
    ///
    /// 请求构建失败、执行失败或校验不通过时返回 [`CheckError`]。
    pub async fn execute(&self, check: Check) -> std::result::Result<(), CheckError> {
        let request = match check.make_request() {
            Ok(request) => request,
            Err(e) => return Err(CheckError::with_cause(e, MSG_CANNOT_MAKE_REQUEST, check)),
        };

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                return Err(CheckError::with_cause(
                    e.into(),
                    MSG_CANNOT_EXECUTE_REQUEST,
                    check,
                ))
            }
        };

        let verdict = (check.validator())(Some(&response));
        verdict.map_err(|message| CheckError::validation(message, check))
    }

    /// 启动检测循环任务
    ///
    /// # 参数
    /// * `shutdown` - 关闭信号接收器，需在发送关闭信号前订阅
    ///
    /// # 返回
    /// * `CheckLoopHandle` - 输入通道、错误通道和任务句柄
    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> CheckLoopHandle {
        let (check_tx, check_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (error_tx, error_rx) = mpsc::channel(CHANNEL_CAPACITY);

        let task = tokio::spawn(self.run(check_rx, error_tx, shutdown));

        CheckLoopHandle {
            checks: check_tx,
            errors: error_rx,
            task,
        }
    }

    async fn run(
        self,
        mut checks: mpsc::Receiver<Check>,
        errors: mpsc::Sender<CheckError>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        info!("检测循环已启动，请求超时: {:?}", self.timeout);

        loop {
            tokio::select! {
                biased;

                _ = shutdown.recv() => {
                    info!("检测循环收到关闭信号，正在退出");
                    checks.close();
                    break;
                }
                received = checks.recv() => {
                    let Some(check) = received else {
                        debug!("输入通道已关闭，检测循环退出");
                        break;
                    };

                    debug!("开始执行检测: {}", check);
                    if let Err(err) = self.execute(check).await {
                        if errors.send(err).await.is_err() {
                            warn!("错误通道已关闭，丢弃检测错误");
                        }
                    }
                }
            }
        }

        info!("检测循环已停止");
    }
}
