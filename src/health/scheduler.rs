//! 任务调度器模块
//!
//! 按固定间隔把完整的检测集合依次推送到检测循环的输入通道。
//! 发送在检测循环忙碌时会等待，从而自然地按检测循环的吞吐量限速。

use crate::error::ConfigError;
use crate::health::check::Check;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// 周期调度器
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// 检测间隔
    interval: Duration,
    /// 检测集合
    checks: Arc<[Check]>,
}

impl Scheduler {
    /// 创建新的调度器
    ///
    /// # 参数
    /// * `interval` - 检测间隔，第一次触发发生在启动后一个间隔
    /// * `checks` - 每次触发推送的检测集合
    ///
    /// # 返回
    /// * `Result<Self, ConfigError>` - 间隔为0时返回验证错误
    pub fn new(interval: Duration, checks: Vec<Check>) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::ValidationError("检测间隔不能为0".to_string()));
        }
        Ok(Self {
            interval,
            checks: checks.into(),
        })
    }

    /// 检测间隔
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 检测数量
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// 检测集合是否为空
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// 推送一轮完整的检测集合
    ///
    /// # 返回
    /// * `bool` - 输入通道已关闭时返回 `false`
    pub async fn fire(&self, sink: &mpsc::Sender<Check>) -> bool {
        debug!("调度器触发，推送 {} 个检测", self.checks.len());
        for check in self.checks.iter() {
            if sink.send(check.clone()).await.is_err() {
                return false;
            }
        }
        true
    }

    /// 启动调度任务
    ///
    /// 收到关闭信号或输入通道关闭后停止，不会补发未完成的检测。
    pub fn spawn(
        self,
        sink: mpsc::Sender<Check>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(
                "启动任务调度器，检测数量: {}，间隔: {:?}",
                self.checks.len(),
                self.interval
            );

            loop {
                tokio::select! {
                    biased;

                    _ = shutdown.recv() => {
                        info!("调度器收到关闭信号");
                        break;
                    }
                    _ = ticker.tick() => {
                        if !self.fire(&sink).await {
                            info!("检测循环输入通道已关闭");
                            break;
                        }
                    }
                }
            }

            info!("任务调度器已停止");
        })
    }
}
