//! TUI 应用主循环
//!
//! 进入全屏/原始模式，轮询 state_rx 与键盘事件，把按键按当前焦点与计时状态转为 Command 发给会话，
//! 每帧用 draw 渲染 UiState。

use std::io::{self, Stdout};

use crossterm::event::KeyCode;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::{mpsc, watch};

use crate::core::{Command, UiState};
use crate::delivery::TimerPhase;
use crate::ui::event::{AppEvent, EventHandler};
use crate::ui::render::{draw, Pane, ViewState};

/// 按键 -> Command（需要焦点与当前状态的那部分）；只移动光标时返回 None
pub fn key_to_command(code: KeyCode, state: &UiState, view: &mut ViewState) -> Option<Command> {
    match code {
        KeyCode::Tab | KeyCode::BackTab => {
            view.focus = match view.focus {
                Pane::Papers => Pane::Houses,
                Pane::Houses => Pane::Papers,
            };
            None
        }
        KeyCode::Up => {
            let cursor = cursor_mut(view);
            *cursor = cursor.saturating_sub(1);
            None
        }
        KeyCode::Down => {
            let len = pane_len(state, view.focus);
            let cursor = cursor_mut(view);
            *cursor = (*cursor + 1).min(len.saturating_sub(1));
            None
        }
        KeyCode::PageUp => {
            let cursor = cursor_mut(view);
            *cursor = cursor.saturating_sub(10);
            None
        }
        KeyCode::PageDown => {
            let len = pane_len(state, view.focus);
            let cursor = cursor_mut(view);
            *cursor = (*cursor + 10).min(len.saturating_sub(1));
            None
        }
        KeyCode::Char(' ') | KeyCode::Enter => match view.focus {
            Pane::Houses => state
                .stops
                .get(view.house_cursor)
                .map(|s| Command::ToggleDelivered(s.stop_id)),
            Pane::Papers => state
                .papers
                .get(view.paper_cursor)
                .map(|p| Command::TogglePaper(p.name.clone())),
        },
        KeyCode::Char('a') => Some(match view.focus {
            Pane::Houses => Command::MarkAllDelivered,
            Pane::Papers => Command::CollectAllPapers,
        }),
        KeyCode::Char('c') => Some(match view.focus {
            Pane::Houses => Command::ClearAllDelivered,
            Pane::Papers => Command::ClearAllPapers,
        }),
        KeyCode::Char('+') | KeyCode::Char('-') if view.focus == Pane::Papers => {
            let paper = state.papers.get(view.paper_cursor)?;
            let quantity = if code == KeyCode::Char('+') {
                paper.quantity.saturating_add(1)
            } else {
                paper.quantity.saturating_sub(1)
            };
            Some(Command::SetPaperQuantity(paper.name.clone(), quantity))
        }
        KeyCode::Char('p') => match state.timer.phase {
            TimerPhase::Running => Some(Command::TimerPause),
            TimerPhase::Paused => Some(Command::TimerResume),
            _ => None,
        },
        _ => None,
    }
}

fn cursor_mut(view: &mut ViewState) -> &mut usize {
    match view.focus {
        Pane::Papers => &mut view.paper_cursor,
        Pane::Houses => &mut view.house_cursor,
    }
}

fn pane_len(state: &UiState, pane: Pane) -> usize {
    match pane {
        Pane::Papers => state.papers.len(),
        Pane::Houses => state.stops.len(),
    }
}

/// 运行 TUI：启用原始模式与全屏，循环 poll 事件 + 渲染，退出时恢复终端
pub async fn run_app(
    state_rx: watch::Receiver<UiState>,
    cmd_tx: mpsc::UnboundedSender<Command>,
) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let event_handler = EventHandler::new(cmd_tx);
    let mut view = ViewState::default();

    let result = loop {
        let state = state_rx.borrow().clone();

        match event_handler.poll() {
            Ok(Some(AppEvent::Quit)) => {
                event_handler.send(Command::Quit);
                break Ok(());
            }
            Ok(Some(AppEvent::Key(key))) => {
                if let Some(cmd) = key_to_command(key.code, &state, &mut view) {
                    event_handler.send(cmd);
                }
            }
            Ok(Some(AppEvent::Command(_))) | Ok(None) => {}
            Err(e) => break Err(e),
        }

        // 列表长度变化（如重置）后收紧光标
        view.paper_cursor = view.paper_cursor.min(state.papers.len().saturating_sub(1));
        view.house_cursor = view.house_cursor.min(state.stops.len().saturating_sub(1));

        if let Err(e) = terminal.draw(|f| draw(f, &state, &view)) {
            break Err(e.into());
        }

        tokio::task::yield_now().await;
    };

    restore_terminal(&mut terminal)?;
    result
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PaperView, StopView};

    fn state() -> UiState {
        UiState {
            stops: vec![
                StopView {
                    stop_id: 1,
                    label: "House 1: Hindu".into(),
                    delivered: false,
                },
                StopView {
                    stop_id: 2,
                    label: "House 2: TOI, ET".into(),
                    delivered: true,
                },
            ],
            papers: vec![PaperView {
                name: "TOI".into(),
                quantity: 39,
                collected: false,
            }],
            ..UiState::default()
        }
    }

    #[test]
    fn test_space_toggles_selected_house() {
        let state = state();
        let mut view = ViewState::default();
        assert_eq!(key_to_command(KeyCode::Down, &state, &mut view), None);
        assert_eq!(
            key_to_command(KeyCode::Char(' '), &state, &mut view),
            Some(Command::ToggleDelivered(2))
        );
        // 光标不越界
        key_to_command(KeyCode::Down, &state, &mut view);
        assert_eq!(view.house_cursor, 1);
    }

    #[test]
    fn test_paper_pane_commands() {
        let state = state();
        let mut view = ViewState::default();
        key_to_command(KeyCode::Tab, &state, &mut view);
        assert_eq!(view.focus, Pane::Papers);
        assert_eq!(
            key_to_command(KeyCode::Char('+'), &state, &mut view),
            Some(Command::SetPaperQuantity("TOI".into(), 40))
        );
        assert_eq!(
            key_to_command(KeyCode::Char('a'), &state, &mut view),
            Some(Command::CollectAllPapers)
        );
        assert_eq!(
            key_to_command(KeyCode::Enter, &state, &mut view),
            Some(Command::TogglePaper("TOI".into()))
        );
    }

    #[test]
    fn test_pause_key_depends_on_timer_phase() {
        let mut state = state();
        let mut view = ViewState::default();
        assert_eq!(key_to_command(KeyCode::Char('p'), &state, &mut view), None);
        state.timer.phase = TimerPhase::Running;
        assert_eq!(
            key_to_command(KeyCode::Char('p'), &state, &mut view),
            Some(Command::TimerPause)
        );
        state.timer.phase = TimerPhase::Paused;
        assert_eq!(
            key_to_command(KeyCode::Char('p'), &state, &mut view),
            Some(Command::TimerResume)
        );
    }
}
