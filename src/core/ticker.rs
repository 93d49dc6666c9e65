//! 计时器 tick 订阅：仅在 Running 时按固定间隔发送 tick
//!
//! 进入 Running 时启动一个后台任务，离开 Running（暂停 / 结束 / 重置）或 TimerTicker 被丢弃时
//! 立即通过 CancellationToken 取消，不会有后台任务活过会话。

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub struct TimerTicker {
    period: Duration,
    tick_tx: mpsc::UnboundedSender<()>,
    token: Option<CancellationToken>,
}

impl TimerTicker {
    pub fn new(period: Duration, tick_tx: mpsc::UnboundedSender<()>) -> Self {
        Self {
            period: period.max(Duration::from_millis(10)),
            tick_tx,
            token: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }

    /// 按计时器是否在运行启动或取消订阅（幂等）
    pub fn sync(&mut self, running: bool) {
        match (running, self.is_active()) {
            (true, false) => self.start(),
            (false, true) => self.stop(),
            _ => {}
        }
    }

    fn start(&mut self) {
        let token = CancellationToken::new();
        let child = token.clone();
        let tx = self.tick_tx.clone();
        let period = self.period;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // 第一次 tick 立即完成，跳过
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = interval.tick() => {
                        if tx.send(()).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("Timer ticker stopped");
        });

        tracing::debug!(period_ms = period.as_millis() as u64, "Timer ticker started");
        self.token = Some(token);
    }

    pub fn stop(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }
}

impl Drop for TimerTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ticks_only_while_running() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = TimerTicker::new(Duration::from_millis(20), tx);

        ticker.sync(true);
        assert!(ticker.is_active());
        let tick = tokio::time::timeout(Duration::from_millis(500), rx.recv()).await;
        assert!(matches!(tick, Ok(Some(()))));

        ticker.sync(false);
        assert!(!ticker.is_active());
        // 取消后清空已排队的 tick，之后不应再有新的
        tokio::time::sleep(Duration::from_millis(30)).await;
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_sync_is_idempotent() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut ticker = TimerTicker::new(Duration::from_millis(20), tx);
        ticker.sync(false);
        assert!(!ticker.is_active());
        ticker.sync(true);
        ticker.sync(true);
        assert!(ticker.is_active());
    }

    #[tokio::test]
    async fn test_drop_cancels_task() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        {
            let mut ticker = TimerTicker::new(Duration::from_millis(20), tx);
            ticker.sync(true);
        }
        // 任务退出后发送端全部释放，通道关闭
        let closed = tokio::time::timeout(Duration::from_millis(500), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(closed.is_ok());
    }
}
