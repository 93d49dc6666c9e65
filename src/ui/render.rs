//! 界面渲染
//!
//! 根据 UiState 绘制：标题栏显示计时器与路线信息，左侧为今日报纸清单，右侧为按路线顺序的各户，
//! 底部为派送统计、总结（或错误）与快捷键提示。

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::core::{SummaryView, UiState};
use crate::delivery::TimerPhase;

/// 当前焦点所在的列表
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Pane {
    Papers,
    #[default]
    Houses,
}

/// 界面本地状态：焦点与两个列表的光标
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    pub focus: Pane,
    pub paper_cursor: usize,
    pub house_cursor: usize,
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x] "
    } else {
        "[ ] "
    }
}

fn timer_line(state: &UiState) -> Span<'static> {
    let display = state.timer.display.clone();
    match state.timer.phase {
        TimerPhase::Idle => Span::styled("Timer idle".to_string(), Style::default().fg(Color::Gray)),
        TimerPhase::Running => Span::styled(
            format!("Delivery time running: {}", display),
            Style::default().fg(Color::Cyan),
        ),
        TimerPhase::Paused => Span::styled(
            format!("Delivery paused at: {}", display),
            Style::default().fg(Color::Yellow),
        ),
        TimerPhase::Finished => Span::styled(
            format!("Delivery completed! Total time: {}", display),
            Style::default().fg(Color::Green),
        ),
    }
}

fn focused_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_header(f: &mut Frame, state: &UiState, area: Rect) {
    let route = match state.route_cost {
        Some(cost) if !state.route_fell_back => format!("route cost {}", cost),
        Some(cost) => format!("route cost {} (input order)", cost),
        None => "route in input order".to_string(),
    };
    let header = Paragraph::new(Line::from(vec![
        timer_line(state),
        Span::styled(format!("  │  {}", route), Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .title(format!(" {} ", state.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(header, area);
}

fn draw_papers(f: &mut Frame, state: &UiState, view: &ViewState, area: Rect) {
    let items: Vec<ListItem> = state
        .papers
        .iter()
        .map(|p| {
            ListItem::new(Line::from(vec![
                Span::raw(checkbox(p.collected)),
                Span::styled(
                    format!("{}× ", p.quantity),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(p.name.clone()),
            ]))
        })
        .collect();

    let status = match state.papers_collected_at {
        Some(at) => format!(" All collected {} ", at.format("%H:%M:%S")),
        None => " Collect all papers before starting ".to_string(),
    };
    let total = state
        .total_paper_count
        .map(|n| format!(" Total to carry: {} ", n))
        .unwrap_or_default();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Today's Paper Stack ")
                .title_bottom(Line::from(format!("{}{}", status, total)))
                .borders(Borders::ALL)
                .border_style(focused_border(view.focus == Pane::Papers)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut list_state = ListState::default().with_selected(
        (view.focus == Pane::Papers && !state.papers.is_empty()).then_some(view.paper_cursor),
    );
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_houses(f: &mut Frame, state: &UiState, view: &ViewState, area: Rect) {
    let items: Vec<ListItem> = state
        .stops
        .iter()
        .map(|s| {
            let style = if s.delivered {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::raw(checkbox(s.delivered)),
                Span::styled(s.label.clone(), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(
                    " Houses to Deliver │ done {} │ remaining {} ",
                    state.delivered, state.remaining
                ))
                .borders(Borders::ALL)
                .border_style(focused_border(view.focus == Pane::Houses)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut list_state = ListState::default().with_selected(
        (view.focus == Pane::Houses && !state.stops.is_empty()).then_some(view.house_cursor),
    );
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_footer(f: &mut Frame, state: &UiState, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    if state.complete {
        lines.push(Line::from(Span::styled(
            "All deliveries completed!",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        if let Some(total) = &state.total_time_display {
            lines.push(Line::from(format!("Total time for all deliveries: {}", total)));
        }
    }

    let mut border = Color::Blue;
    match &state.summary {
        SummaryView::None => {}
        SummaryView::Pending => lines.push(Line::from("Writing your summary…")),
        SummaryView::Ready(text) => {
            lines.extend(text.lines().map(|l| Line::from(l.to_string())));
        }
        SummaryView::Failed(err) => {
            border = Color::Red;
            lines.push(Line::from(Span::styled(err.clone(), Style::default().fg(Color::Red))));
        }
    }
    if let Some(err) = &state.error_message {
        border = Color::Red;
        lines.push(Line::from(Span::styled(err.clone(), Style::default().fg(Color::Red))));
    }

    let hint = " Tab pane │ ↑↓ move │ Space toggle │ a/c all │ +/- qty │ s start │ p pause │ f finish │ t total │ g celebrate │ R reset │ q quit ";
    let footer = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Status ")
                .title_bottom(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
    f.render_widget(footer, area);
}

/// 绘制一帧
pub fn draw(f: &mut Frame, state: &UiState, view: &ViewState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(8),
        ])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    draw_header(f, state, rows[0]);
    draw_papers(f, state, view, columns[0]);
    draw_houses(f, state, view, columns[1]);
    draw_footer(f, state, rows[2]);
}
