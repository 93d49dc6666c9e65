//! 会话编排器：主控循环
//!
//! 负责：按配置规划路线、创建 DeliverySession，建立 cmd/state 两条通道，
//! 并在后台任务中串行消费用户命令、计时 tick 与总结结果，每次变化后投影新的 UiState。
//! 总结请求在单独的任务里执行，不阻塞派送与计时操作。

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};

use crate::config::{AppConfig, SummarySection};
use crate::core::{Command, DeliverySession, SessionEffect, SummaryError, TimerTicker, UiState};
use crate::llm::LlmClient;
use crate::route::CheapestArcSolver;
use crate::summary::{create_collaborator, SummaryComposer};

/// 按配置解析文本生成客户端（每次「庆祝」时调用）
pub type CollaboratorResolver =
    Arc<dyn Fn(&SummarySection) -> Result<Arc<dyn LlmClient>, SummaryError> + Send + Sync>;

/// 创建会话运行时：返回命令发送端与状态接收端
pub async fn create_session(
    cfg: &AppConfig,
) -> anyhow::Result<(mpsc::UnboundedSender<Command>, watch::Receiver<UiState>)> {
    let session = DeliverySession::new(cfg, &CheapestArcSolver)?;
    let tick = Duration::from_millis(cfg.timer.tick_millis);
    Ok(spawn_session(session, tick, Arc::new(create_collaborator)))
}

/// 在后台任务中运行会话；命令发送端全部关闭或收到 Quit 时退出
pub fn spawn_session(
    mut session: DeliverySession,
    tick: Duration,
    resolve: CollaboratorResolver,
) -> (mpsc::UnboundedSender<Command>, watch::Receiver<UiState>) {
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<Command>();
    let (state_tx, state_rx) = watch::channel(session.snapshot(Utc::now()));
    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel::<()>();
    let (summary_tx, mut summary_rx) =
        mpsc::unbounded_channel::<(u64, Result<String, SummaryError>)>();

    tokio::spawn(async move {
        let mut ticker = TimerTicker::new(tick, tick_tx);

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else { break };
                    match session.apply(cmd, Utc::now()) {
                        SessionEffect::None => continue,
                        SessionEffect::Render => {}
                        SessionEffect::SyncTicker => ticker.sync(session.timer().is_running()),
                        SessionEffect::RequestSummary { generation, summary } => {
                            let cfg = session.summary_config().clone();
                            let resolve = resolve.clone();
                            let tx = summary_tx.clone();
                            tokio::spawn(async move {
                                let result = match resolve(&cfg) {
                                    Ok(client) => SummaryComposer::new(client).compose(&summary).await,
                                    Err(e) => Err(e),
                                };
                                let _ = tx.send((generation, result));
                            });
                        }
                        SessionEffect::Quit => break,
                    }
                }
                Some(()) = tick_rx.recv() => {
                    if !session.timer().is_running() {
                        continue;
                    }
                }
                Some((generation, result)) = summary_rx.recv() => {
                    if !session.finish_summary(generation, result) {
                        continue;
                    }
                }
            }

            let _ = state_tx.send(session.snapshot(Utc::now()));
        }

        ticker.stop();
        tracing::info!("Delivery session closed");
    });

    (cmd_tx, state_rx)
}
