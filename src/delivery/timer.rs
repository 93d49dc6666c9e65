//! 派送计时器：Idle / Running / Paused / Finished 状态机
//!
//! 只累计 Running 期间的时间，暂停期间不计。非法转换（如 Idle 时 Pause）直接忽略，
//! 转换方法返回是否真正发生了变化。时间由调用方显式传入，便于测试与回放；
//! 传入的时间按已见过的最大值截平，墙钟回拨时用时不会倒退。

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 计时器阶段（界面投影用）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Finished,
}

/// 会话计时器
#[derive(Debug, Clone)]
pub struct SessionTimer {
    phase: TimerPhase,
    accumulated_seconds: f64,
    current_run_started_at: Option<DateTime<Utc>>,
    latest_now: Option<DateTime<Utc>>,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let millis = (to - from).num_milliseconds().max(0);
    millis as f64 / 1000.0
}

impl SessionTimer {
    pub fn new() -> Self {
        Self {
            phase: TimerPhase::Idle,
            accumulated_seconds: 0.0,
            current_run_started_at: None,
            latest_now: None,
        }
    }

    // 时钟回拨时沿用已见过的最晚时间
    fn clamp(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let now = match self.latest_now {
            Some(latest) if latest > now => latest,
            _ => now,
        };
        self.latest_now = Some(now);
        now
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// 已结算的秒数（不含当前运行段）
    pub fn accumulated_seconds(&self) -> f64 {
        self.accumulated_seconds
    }

    /// Start：Idle / Paused / Finished -> Running；已在运行时为空操作
    ///
    /// 从 Finished 重新开始时保留已累计时间。
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        if self.phase == TimerPhase::Running {
            tracing::debug!("Timer already running, start ignored");
            return false;
        }
        let now = self.clamp(now);
        self.current_run_started_at = Some(now);
        self.phase = TimerPhase::Running;
        tracing::debug!(accumulated = self.accumulated_seconds, "Timer running");
        true
    }

    /// Pause：仅 Running -> Paused，结算当前运行段
    pub fn pause(&mut self, now: DateTime<Utc>) -> bool {
        if self.phase != TimerPhase::Running {
            tracing::debug!(phase = ?self.phase, "Pause ignored");
            return false;
        }
        self.flush(now);
        self.phase = TimerPhase::Paused;
        true
    }

    /// Resume：Paused 时等同于 Start，其他状态忽略
    pub fn resume(&mut self, now: DateTime<Utc>) -> bool {
        if self.phase != TimerPhase::Paused {
            tracing::debug!(phase = ?self.phase, "Resume ignored");
            return false;
        }
        self.start(now)
    }

    /// Finish：Running 时先结算；Paused / Idle 直接结束
    pub fn finish(&mut self, now: DateTime<Utc>) -> bool {
        match self.phase {
            TimerPhase::Finished => {
                tracing::debug!("Timer already finished");
                false
            }
            TimerPhase::Running => {
                self.flush(now);
                self.phase = TimerPhase::Finished;
                true
            }
            TimerPhase::Paused | TimerPhase::Idle => {
                self.phase = TimerPhase::Finished;
                true
            }
        }
    }

    /// 整体重置：回到 Idle，清零
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// 总用时：Running 时包含当前运行段且单调不减，其余状态冻结
    pub fn elapsed_seconds(&mut self, now: DateTime<Utc>) -> f64 {
        let now = self.clamp(now);
        match (self.phase, self.current_run_started_at) {
            (TimerPhase::Running, Some(started)) => {
                self.accumulated_seconds + seconds_between(started, now)
            }
            _ => self.accumulated_seconds,
        }
    }

    fn flush(&mut self, now: DateTime<Utc>) {
        let now = self.clamp(now);
        if let Some(started) = self.current_run_started_at.take() {
            self.accumulated_seconds += seconds_between(started, now);
        }
    }
}

/// 用时显示："45 seconds" / "1 minute 5 seconds" / "2 minutes 5 seconds"
///
/// 只有分钟数大于 1 时才用复数；秒数部分始终为 "seconds"。
pub fn format_elapsed(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    if seconds < 60 {
        format!("{} seconds", seconds)
    } else {
        let minutes = seconds / 60;
        let rest = seconds % 60;
        let unit = if minutes > 1 { "minutes" } else { "minute" };
        format!("{} {} {} seconds", minutes, unit, rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 5, 0, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn test_initial_state_is_idle() {
        let mut timer = SessionTimer::new();
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.elapsed_seconds(t(100)), 0.0);
    }

    #[test]
    fn test_pause_time_is_not_counted() {
        let mut timer = SessionTimer::new();
        assert!(timer.start(t(0)));
        assert!(timer.pause(t(2)));
        assert_eq!(timer.phase(), TimerPhase::Paused);
        assert!(timer.resume(t(5)));
        assert!(timer.finish(t(7)));
        assert_eq!(timer.phase(), TimerPhase::Finished);
        assert!((timer.elapsed_seconds(t(20)) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_elapsed_grows_while_running_and_freezes_when_paused() {
        let mut timer = SessionTimer::new();
        timer.start(t(0));
        assert_eq!(timer.elapsed_seconds(t(3)), 3.0);
        timer.pause(t(4));
        assert_eq!(timer.elapsed_seconds(t(4)), 4.0);
        assert_eq!(timer.elapsed_seconds(t(400)), 4.0);
    }

    #[test]
    fn test_illegal_transitions_are_ignored() {
        let mut timer = SessionTimer::new();
        assert!(!timer.pause(t(0)));
        assert!(!timer.resume(t(0)));
        timer.start(t(0));
        assert!(!timer.start(t(1)));
        assert!(!timer.resume(t(1)));
        timer.finish(t(2));
        assert!(!timer.finish(t(3)));
        assert!(!timer.pause(t(3)));
        assert_eq!(timer.elapsed_seconds(t(9)), 2.0);
    }

    #[test]
    fn test_start_from_paused_behaves_like_resume() {
        let mut timer = SessionTimer::new();
        timer.start(t(0));
        timer.pause(t(10));
        assert!(timer.start(t(20)));
        assert_eq!(timer.elapsed_seconds(t(25)), 15.0);
    }

    #[test]
    fn test_finish_from_paused_keeps_flushed_time() {
        let mut timer = SessionTimer::new();
        timer.start(t(0));
        timer.pause(t(30));
        assert!(timer.finish(t(90)));
        assert_eq!(timer.accumulated_seconds(), 30.0);
    }

    #[test]
    fn test_finish_from_idle_is_zero() {
        let mut timer = SessionTimer::new();
        assert!(timer.finish(t(5)));
        assert_eq!(timer.phase(), TimerPhase::Finished);
        assert_eq!(timer.elapsed_seconds(t(10)), 0.0);
    }

    #[test]
    fn test_restart_after_finish_keeps_accumulated() {
        let mut timer = SessionTimer::new();
        timer.start(t(0));
        timer.finish(t(10));
        assert!(timer.start(t(20)));
        assert_eq!(timer.phase(), TimerPhase::Running);
        assert_eq!(timer.elapsed_seconds(t(25)), 15.0);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut timer = SessionTimer::new();
        timer.start(t(0));
        timer.pause(t(8));
        timer.reset();
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.accumulated_seconds(), 0.0);
    }

    #[test]
    fn test_clock_going_backwards_does_not_decrease() {
        let mut timer = SessionTimer::new();
        timer.start(t(10));
        assert_eq!(timer.elapsed_seconds(t(5)), 0.0);
    }

    #[test]
    fn test_elapsed_never_decreases_when_clock_steps_back() {
        let mut timer = SessionTimer::new();
        timer.start(t(0));
        assert_eq!(timer.elapsed_seconds(t(100)), 100.0);
        assert_eq!(timer.elapsed_seconds(t(40)), 100.0);
        assert_eq!(timer.elapsed_seconds(t(130)), 130.0);
        // 回拨后暂停，结算值也不倒退
        timer.pause(t(50));
        assert_eq!(timer.accumulated_seconds(), 130.0);
        timer.resume(t(60));
        assert_eq!(timer.elapsed_seconds(t(140)), 140.0);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(45.0), "45 seconds");
        assert_eq!(format_elapsed(65.0), "1 minute 5 seconds");
        assert_eq!(format_elapsed(125.0), "2 minutes 5 seconds");
        assert_eq!(format_elapsed(59.9), "59 seconds");
        assert_eq!(format_elapsed(60.0), "1 minute 0 seconds");
        assert_eq!(format_elapsed(0.0), "0 seconds");
    }
}
