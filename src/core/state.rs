//! 状态定义：UiState 投影
//!
//! 界面只持有轻量的 UiState（每户标签与是否已派送、计时显示、报纸清单、总结）；
//! 完整状态由 DeliverySession 维护并投影到 UiState。

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::delivery::TimerPhase;

/// 单户在界面上的样子（按路线顺序排列）
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StopView {
    pub stop_id: usize,
    pub label: String,
    pub delivered: bool,
}

/// 单种报纸在界面上的样子
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaperView {
    pub name: String,
    pub quantity: u32,
    pub collected: bool,
}

/// 计时器显示
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimerView {
    pub phase: TimerPhase,
    pub display: String,
}

/// 总结状态
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum SummaryView {
    None,
    Pending,
    Ready(String),
    Failed(String),
}

/// UI 看到的「投影」状态，轻量且易于渲染
#[derive(Clone, Debug, Serialize)]
pub struct UiState {
    pub title: String,
    pub stops: Vec<StopView>,
    pub papers: Vec<PaperView>,
    /// 报纸全部领取的时间；未全部领取时为 None
    pub papers_collected_at: Option<DateTime<Utc>>,
    /// 「显示总份数」后的快照
    pub total_paper_count: Option<u32>,
    pub timer: TimerView,
    pub delivered: usize,
    pub remaining: usize,
    pub complete: bool,
    /// 全部派送完成后显示的总用时
    pub total_time_display: Option<String>,
    pub route_cost: Option<u64>,
    pub route_fell_back: bool,
    pub summary: SummaryView,
    pub error_message: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            title: String::new(),
            stops: Vec::new(),
            papers: Vec::new(),
            papers_collected_at: None,
            total_paper_count: None,
            timer: TimerView {
                phase: TimerPhase::Idle,
                display: "0 seconds".to_string(),
            },
            delivered: 0,
            remaining: 0,
            complete: false,
            total_time_display: None,
            route_cost: None,
            route_fell_back: false,
            summary: SummaryView::None,
            error_message: None,
        }
    }
}
