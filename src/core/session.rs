//! 派送会话：显式的会话上下文
//!
//! 持有站点、规划好的路线、派送进度、计时器与报纸清单，由编排层独占；
//! 所有用户动作都通过 `apply` 串行进入，返回需要编排层执行的副作用（刷新、同步 tick、请求总结）。

use chrono::{DateTime, Utc};

use crate::config::{AppConfig, SummarySection};
use crate::core::state::{PaperView, StopView, SummaryView, TimerView, UiState};
use crate::core::{RouteError, SummaryError};
use crate::delivery::{format_elapsed, DeliveryTracker, PaperStack, SessionTimer};
use crate::route::{build_cost_matrix, plan_route, synthetic_stops, RoutePlan, RouteSolver, Stop};
use crate::summary::{summary_distance_km, DeliverySummary};

/// 从界面发往会话的用户动作
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    MarkDelivered(usize),
    MarkUndelivered(usize),
    ToggleDelivered(usize),
    MarkAllDelivered,
    ClearAllDelivered,
    TogglePaper(String),
    SetPaperQuantity(String, u32),
    CollectAllPapers,
    ClearAllPapers,
    ShowTotalPapers,
    TimerStart,
    TimerPause,
    TimerResume,
    TimerFinish,
    /// 生成派送总结（需全部派送完成）
    Celebrate,
    /// 整体重置
    Reset,
    Quit,
}

/// apply 之后编排层要做的事
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    /// 无变化
    None,
    /// 状态变化，重新投影
    Render,
    /// 计时器阶段变化：同步 tick 订阅后重新投影
    SyncTicker,
    /// 在关键路径之外请求总结；结果通过 finish_summary 带着 generation 回来
    RequestSummary {
        generation: u64,
        summary: DeliverySummary,
    },
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
enum SummaryStatus {
    Idle,
    Pending,
    Ready(String),
    Failed(String),
}

pub struct DeliverySession {
    title: String,
    stops: Vec<Stop>,
    plan: RoutePlan,
    tracker: DeliveryTracker,
    timer: SessionTimer,
    papers: PaperStack,
    papers_collected_at: Option<DateTime<Utc>>,
    total_paper_count: Option<u32>,
    summary_cfg: SummarySection,
    summary: SummaryStatus,
    error_message: Option<String>,
    /// 每次重置加一，用来丢弃过期的总结结果
    generation: u64,
}

impl DeliverySession {
    /// 按配置建站、算矩阵、求解路线；求解失败时已回退为输入顺序
    pub fn new(cfg: &AppConfig, solver: &dyn RouteSolver) -> Result<Self, RouteError> {
        let stops = synthetic_stops(&cfg.route.depot_label, &cfg.route.houses);
        let positions: Vec<_> = stops.iter().map(Stop::position).collect();
        let matrix = build_cost_matrix(&positions)?;
        let plan = plan_route(solver, &matrix);
        Ok(Self::from_parts(
            cfg.app.name.clone(),
            stops,
            plan,
            PaperStack::new(cfg.papers.stack.clone()),
            cfg.summary.clone(),
        ))
    }

    pub fn from_parts(
        title: String,
        stops: Vec<Stop>,
        plan: RoutePlan,
        papers: PaperStack,
        summary_cfg: SummarySection,
    ) -> Self {
        let total = stops.iter().filter(|s| !s.is_depot()).count();
        tracing::info!(stops = total, fell_back = plan.fell_back, "Delivery session created");
        Self {
            title,
            stops,
            plan,
            tracker: DeliveryTracker::new(total),
            timer: SessionTimer::new(),
            papers,
            papers_collected_at: None,
            total_paper_count: None,
            summary_cfg,
            summary: SummaryStatus::Idle,
            error_message: None,
            generation: 0,
        }
    }

    pub fn plan(&self) -> &RoutePlan {
        &self.plan
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn tracker(&self) -> &DeliveryTracker {
        &self.tracker
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn papers(&self) -> &PaperStack {
        &self.papers
    }

    pub fn summary_config(&self) -> &SummarySection {
        &self.summary_cfg
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 串行处理一个用户动作
    pub fn apply(&mut self, cmd: Command, now: DateTime<Utc>) -> SessionEffect {
        match cmd {
            Command::MarkDelivered(id) => render_if(self.tracker.mark_delivered(id, now)),
            Command::MarkUndelivered(id) => render_if(self.tracker.mark_undelivered(id)),
            Command::ToggleDelivered(id) => {
                self.tracker.toggle(id, now);
                SessionEffect::Render
            }
            Command::MarkAllDelivered => render_if(self.tracker.mark_all(now) > 0),
            Command::ClearAllDelivered => render_if(self.tracker.clear_all() > 0),
            Command::TogglePaper(name) => {
                let changed = self.papers.toggle(&name);
                self.refresh_papers_collected(now);
                render_if(changed)
            }
            Command::SetPaperQuantity(name, quantity) => {
                render_if(self.papers.set_quantity(&name, quantity))
            }
            Command::CollectAllPapers => {
                self.papers.collect_all();
                self.refresh_papers_collected(now);
                SessionEffect::Render
            }
            Command::ClearAllPapers => {
                self.papers.clear_all();
                self.refresh_papers_collected(now);
                SessionEffect::Render
            }
            Command::ShowTotalPapers => {
                self.total_paper_count = Some(self.papers.total_to_carry());
                SessionEffect::Render
            }
            Command::TimerStart => ticker_if(self.timer.start(now)),
            Command::TimerPause => ticker_if(self.timer.pause(now)),
            Command::TimerResume => ticker_if(self.timer.resume(now)),
            Command::TimerFinish => ticker_if(self.timer.finish(now)),
            Command::Celebrate => self.request_summary(now),
            Command::Reset => {
                self.reset();
                SessionEffect::SyncTicker
            }
            Command::Quit => SessionEffect::Quit,
        }
    }

    /// 汇总当前事实；用时与完成界面的总用时取自同一来源
    pub fn summary_facts(&mut self, now: DateTime<Utc>) -> DeliverySummary {
        DeliverySummary::new(
            self.tracker.delivered_count(),
            summary_distance_km(&self.summary_cfg, self.plan.total_cost),
            self.timer.elapsed_seconds(now),
            self.papers.collected_labels(),
        )
    }

    fn request_summary(&mut self, now: DateTime<Utc>) -> SessionEffect {
        if self.summary == SummaryStatus::Pending {
            tracing::debug!("Summary already in flight, ignoring");
            return SessionEffect::None;
        }
        if !self.tracker.is_complete() {
            let err = SummaryError::NotComplete {
                remaining: self.tracker.remaining_count(),
            };
            self.error_message = Some(err.to_string());
            return SessionEffect::Render;
        }
        self.error_message = None;
        self.summary = SummaryStatus::Pending;
        SessionEffect::RequestSummary {
            generation: self.generation,
            summary: self.summary_facts(now),
        }
    }

    /// 写回总结结果；generation 过期（中途重置过）时丢弃并返回 false
    pub fn finish_summary(&mut self, generation: u64, result: Result<String, SummaryError>) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "Dropping stale summary");
            return false;
        }
        self.summary = match result {
            Ok(text) => {
                tracing::info!("Delivery summary ready");
                SummaryStatus::Ready(text)
            }
            Err(e) => {
                tracing::warn!("Delivery summary failed: {}", e);
                SummaryStatus::Failed(e.to_string())
            }
        };
        true
    }

    /// 整体重置：清空派送记录，计时器回到 Idle，报纸清单恢复默认；路线保持不变
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.timer.reset();
        self.papers.reset();
        self.papers_collected_at = None;
        self.total_paper_count = None;
        self.summary = SummaryStatus::Idle;
        self.error_message = None;
        self.generation += 1;
        tracing::info!(generation = self.generation, "Session reset");
    }

    fn refresh_papers_collected(&mut self, now: DateTime<Utc>) {
        if self.papers.all_collected() {
            self.papers_collected_at.get_or_insert(now);
        } else {
            self.papers_collected_at = None;
        }
    }

    /// 投影为界面状态；按路线顺序「看到」每一户（首次看到时创建派送记录）
    pub fn snapshot(&mut self, now: DateTime<Utc>) -> UiState {
        let order: Vec<usize> = self.plan.tour.stops().to_vec();
        let mut stops = Vec::with_capacity(order.len());
        for id in order {
            let Some(stop) = self.stops.get(id) else {
                continue;
            };
            self.tracker.observe(id, now);
            stops.push(StopView {
                stop_id: id,
                label: stop.display_label(),
                delivered: self.tracker.is_delivered(id),
            });
        }

        let papers = self
            .papers
            .entries()
            .iter()
            .map(|(name, entry)| PaperView {
                name: name.clone(),
                quantity: entry.quantity,
                collected: entry.collected,
            })
            .collect();

        let complete = self.tracker.is_complete();
        let elapsed = format_elapsed(self.timer.elapsed_seconds(now));
        let summary = match &self.summary {
            SummaryStatus::Idle => SummaryView::None,
            SummaryStatus::Pending => SummaryView::Pending,
            SummaryStatus::Ready(text) => SummaryView::Ready(text.clone()),
            SummaryStatus::Failed(err) => SummaryView::Failed(err.clone()),
        };

        UiState {
            title: self.title.clone(),
            stops,
            papers,
            papers_collected_at: self.papers_collected_at,
            total_paper_count: self.total_paper_count,
            timer: TimerView {
                phase: self.timer.phase(),
                display: elapsed.clone(),
            },
            delivered: self.tracker.delivered_count(),
            remaining: self.tracker.remaining_count(),
            complete,
            total_time_display: complete.then_some(elapsed),
            route_cost: self.plan.total_cost,
            route_fell_back: self.plan.fell_back,
            summary,
            error_message: self.error_message.clone(),
        }
    }

}

fn render_if(changed: bool) -> SessionEffect {
    if changed {
        SessionEffect::Render
    } else {
        SessionEffect::None
    }
}

fn ticker_if(changed: bool) -> SessionEffect {
    if changed {
        SessionEffect::SyncTicker
    } else {
        SessionEffect::None
    }
}
