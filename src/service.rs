//! 服务管理模块
//!
//! 负责组装调度器、检测循环和错误上报三个任务，并管理它们的生命周期

use crate::config::ProbeSettings;
use crate::error::Result;
use crate::health::{
    spawn_reporter, Check, CheckLoop, CheckLoopHandle, ErrorReporter, LogReporter, Scheduler,
};
use crate::signal_handler::wait_for_shutdown;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// 探测服务
pub struct ProbeService {
    /// 运行时设置
    settings: ProbeSettings,
    /// 检测集合
    checks: Vec<Check>,
    /// 错误上报器
    reporter: Arc<dyn ErrorReporter>,
}

impl ProbeService {
    /// 创建新的探测服务，默认把错误写入日志
    ///
    /// 检测间隔或请求超时为0时返回配置错误。
    pub fn new(settings: ProbeSettings, checks: Vec<Check>) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            checks,
            reporter: Arc::new(LogReporter),
        })
    }

    /// 替换错误上报器
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// 运行设置
    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    /// 周期运行直到收到关闭信号
    ///
    /// # 参数
    /// * `shutdown_tx` - 关闭信号发送端，各任务在启动前各自订阅
    /// * `shutdown_rx` - 主任务等待关闭信号的接收端，应在安装信号处理器之前创建
    ///
    /// # 返回
    /// * `Result<usize>` - 运行期间上报的错误数量
    pub async fn run(
        self,
        shutdown_tx: &broadcast::Sender<()>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<usize> {
        let CheckLoopHandle {
            checks,
            errors,
            task: loop_task,
        } = CheckLoop::new(&self.settings)?.spawn(shutdown_tx.subscribe());
        let reporter_task = spawn_reporter(self.reporter, errors);
        let scheduler_task = Scheduler::new(self.settings.check_interval, self.checks)?
            .spawn(checks, shutdown_tx.subscribe());

        info!("探测服务已启动");
        wait_for_shutdown(shutdown_rx).await;
        // 关闭信号可能早于各任务订阅，这里再广播一次
        let _ = shutdown_tx.send(());

        join_task("调度器", scheduler_task).await;
        join_task("检测循环", loop_task).await;
        let reported = reporter_task
            .await
            .map_err(|e| anyhow::anyhow!("错误上报任务异常退出: {e}"))?;

        info!("探测服务已停止");
        Ok(reported)
    }

    /// 只执行一轮检测
    ///
    /// 全部检测处理完毕（或收到关闭信号）后返回。
    pub async fn run_once(self, shutdown_tx: &broadcast::Sender<()>) -> Result<usize> {
        let CheckLoopHandle {
            checks,
            errors,
            task: loop_task,
        } = CheckLoop::new(&self.settings)?.spawn(shutdown_tx.subscribe());
        let reporter_task = spawn_reporter(self.reporter, errors);

        info!("执行单轮检测，检测数量: {}", self.checks.len());
        let scheduler = Scheduler::new(self.settings.check_interval, self.checks)?;
        if !scheduler.fire(&checks).await {
            warn!("检测循环提前关闭，部分检测未执行");
        }
        drop(checks);

        join_task("检测循环", loop_task).await;
        let reported = reporter_task
            .await
            .map_err(|e| anyhow::anyhow!("错误上报任务异常退出: {e}"))?;

        info!("单轮检测完成，失败数量: {}", reported);
        Ok(reported)
    }
}

async fn join_task(name: &str, task: JoinHandle<()>) {
    if let Err(e) = task.await {
        warn!("{name}任务异常退出: {e}");
    }
}
