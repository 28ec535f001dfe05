//! 信号处理模块
//!
//! 把 SIGINT/SIGTERM（非Unix平台为 Ctrl+C）转换为广播关闭信号

use crate::error::Result;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[cfg(unix)]
use signal_hook::consts::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook_tokio::Signals;

/// 设置信号处理器
///
/// 收到第一个终止信号后向 `shutdown_tx` 发送关闭信号，随后监听任务结束。
pub fn setup_signal_handlers(shutdown_tx: broadcast::Sender<()>) -> Result<JoinHandle<()>> {
    #[cfg(unix)]
    {
        setup_unix_signals(shutdown_tx)
    }
    #[cfg(not(unix))]
    {
        Ok(setup_ctrl_c(shutdown_tx))
    }
}

/// Unix/Linux系统信号处理
#[cfg(unix)]
fn setup_unix_signals(shutdown_tx: broadcast::Sender<()>) -> Result<JoinHandle<()>> {
    use futures::stream::StreamExt;

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    let handle = signals.handle();

    Ok(tokio::spawn(async move {
        if let Some(signal) = signals.next().await {
            let name = match signal {
                SIGINT => "SIGINT",
                SIGTERM => "SIGTERM",
                _ => "未知信号",
            };
            info!("接收到 {name} 信号，开始优雅关闭...");
            notify_shutdown(&shutdown_tx);
        }
        handle.close();
    }))
}

/// 非Unix系统仅监听 Ctrl+C
#[cfg(not(unix))]
fn setup_ctrl_c(shutdown_tx: broadcast::Sender<()>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("接收到 Ctrl+C，开始优雅关闭...");
                notify_shutdown(&shutdown_tx);
            }
            Err(e) => error!("监听中断信号失败: {e}"),
        }
    })
}

fn notify_shutdown(shutdown_tx: &broadcast::Sender<()>) {
    if let Err(e) = shutdown_tx.send(()) {
        error!("发送关闭信号失败: {e}");
    }
}

/// 等待关闭信号
pub async fn wait_for_shutdown(mut shutdown_rx: broadcast::Receiver<()>) {
    match shutdown_rx.recv().await {
        Ok(()) => info!("接收到关闭信号，开始清理资源..."),
        Err(e) => error!("等待关闭信号时发生错误: {e}"),
    }
}
