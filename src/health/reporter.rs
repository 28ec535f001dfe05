//! 错误上报
//!
//! 消费错误通道直到其关闭，把每个 [`CheckError`] 交给 [`ErrorReporter`]

use crate::error::CheckError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 检测错误上报接口
#[async_trait]
pub trait ErrorReporter: Send + Sync {
    /// 上报一个检测错误，不得失败
    async fn report(&self, error: &CheckError);
}

/// 把检测错误写入日志的上报器
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

#[async_trait]
impl ErrorReporter for LogReporter {
    async fn report(&self, err: &CheckError) {
        error!(method = %err.method(), url = %err.url(), "{err}");
    }
}

/// 启动错误上报任务
///
/// # 返回
/// * `JoinHandle<usize>` - 错误通道关闭后结束，返回上报的错误数量
pub fn spawn_reporter(
    reporter: Arc<dyn ErrorReporter>,
    mut errors: mpsc::Receiver<CheckError>,
) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut reported = 0;
        while let Some(err) = errors.recv().await {
            reporter.report(&err).await;
            reported += 1;
        }
        info!("错误通道已关闭，共上报 {} 个错误", reported);
        reported
    })
}
