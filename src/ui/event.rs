//! 事件处理
//!
//! 轮询 crossterm 键盘事件：全局快捷键（s 开始、f 结束、t 总份数、g 庆祝、R 重置、q 退出）直接转为 Command，
//! 其余按键（方向键、空格、a/c、p、+/-）交给 run_app 根据焦点与当前状态解释。

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use crate::core::Command;

/// 应用事件：已发送的 Command、需要上下文解释的 KeyEvent、退出
#[derive(Debug, Clone)]
pub enum AppEvent {
    Command(Command),
    Key(KeyEvent),
    Quit,
}

/// 事件处理器：持有 cmd_tx，poll 时读键盘并返回 AppEvent
pub struct EventHandler {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl EventHandler {
    pub fn new(cmd_tx: mpsc::UnboundedSender<Command>) -> Self {
        Self { cmd_tx }
    }

    pub fn poll(&self) -> anyhow::Result<Option<AppEvent>> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(self.handle_key(key)));
                }
            }
        }
        Ok(None)
    }

    fn handle_key(&self, key: KeyEvent) -> AppEvent {
        let global = match key.code {
            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return AppEvent::Quit
            }
            KeyCode::Char('q') | KeyCode::Esc => return AppEvent::Quit,
            KeyCode::Char('s') => Some(Command::TimerStart),
            KeyCode::Char('f') => Some(Command::TimerFinish),
            KeyCode::Char('t') => Some(Command::ShowTotalPapers),
            KeyCode::Char('g') => Some(Command::Celebrate),
            KeyCode::Char('R') => Some(Command::Reset),
            _ => None,
        };
        match global {
            Some(cmd) => {
                self.send(cmd.clone());
                AppEvent::Command(cmd)
            }
            None => AppEvent::Key(key),
        }
    }

    pub fn send(&self, cmd: Command) {
        let _ = self.cmd_tx.send(cmd);
    }
}
