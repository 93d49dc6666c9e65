//! 派送会话端到端测试：默认 88 户路线、派送进度、计时与总结生成

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use paperpilot::config::AppConfig;
use paperpilot::core::{Command, DeliverySession, SessionEffect, SummaryError, SummaryView};
use paperpilot::delivery::TimerPhase;
use paperpilot::llm::MockLlmClient;
use paperpilot::route::{CheapestArcSolver, CostMatrix, RouteSolver, Tour};
use paperpilot::summary::SummaryComposer;

fn t(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 5, 0, 0).unwrap() + Duration::seconds(secs)
}

struct FailingSolver;

impl RouteSolver for FailingSolver {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn solve(&self, _matrix: &CostMatrix, _depot: usize) -> Result<Tour, paperpilot::core::RouteError> {
        Err(paperpilot::core::RouteError::SolverFailure("no route".into()))
    }
}

#[tokio::test]
async fn test_full_morning_round() {
    let cfg = AppConfig::default();
    let mut session = DeliverySession::new(&cfg, &CheapestArcSolver).unwrap();

    // 坐标在一条直线上，贪心顺序即门牌顺序
    let plan = session.plan();
    assert!(!plan.fell_back);
    assert_eq!(plan.tour.stops(), (1..=88).collect::<Vec<_>>().as_slice());
    assert_eq!(plan.total_cost, Some(2 * 88 * 3));

    let state = session.snapshot(t(0));
    assert_eq!(state.stops.len(), 88);
    assert_eq!(state.remaining, 88);
    assert_eq!(state.stops[0].label, "House 1: Hindu");

    session.apply(Command::CollectAllPapers, t(10));
    session.apply(Command::ShowTotalPapers, t(10));
    let state = session.snapshot(t(10));
    assert!(state.papers_collected_at.is_some());
    assert_eq!(state.total_paper_count, Some(131));

    assert_eq!(session.apply(Command::TimerStart, t(60)), SessionEffect::SyncTicker);
    for id in 1..=44 {
        session.apply(Command::MarkDelivered(id), t(60 + id as i64 * 10));
    }
    session.apply(Command::TimerPause, t(600));
    session.apply(Command::TimerResume, t(900));
    session.apply(Command::MarkAllDelivered, t(1500));
    session.apply(Command::TimerFinish, t(1860));

    let state = session.snapshot(t(2000));
    assert!(state.complete);
    assert_eq!(state.delivered, 88);
    assert_eq!(state.timer.phase, TimerPhase::Finished);
    // 540s 运行 + 960s 运行 = 1500s
    assert_eq!(state.timer.display, "25 minutes 0 seconds");
    assert_eq!(state.total_time_display.as_deref(), Some("25 minutes 0 seconds"));

    let (generation, facts) = match session.apply(Command::Celebrate, t(2000)) {
        SessionEffect::RequestSummary { generation, summary } => (generation, summary),
        other => panic!("unexpected effect {:?}", other),
    };
    assert_eq!(facts.delivery_count, 88);
    assert_eq!(facts.minutes, 25);
    assert_eq!(facts.distance_km, 12.0);
    assert!(facts.papers.contains(&"TOI".to_string()));

    let mock = Arc::new(MockLlmClient::replying("  88 homes before sunrise!  "));
    let text = SummaryComposer::new(mock.clone()).compose(&facts).await;
    assert!(session.finish_summary(generation, text));
    assert_eq!(
        session.snapshot(t(2001)).summary,
        SummaryView::Ready("88 homes before sunrise!".into())
    );
    let prompt = mock.last_prompt().unwrap();
    assert!(prompt.contains("88 deliveries"));
    assert!(prompt.contains("25 minutes"));
}

#[tokio::test]
async fn test_reset_discards_in_flight_summary() {
    let mut cfg = AppConfig::default();
    cfg.route.houses = vec!["TOI".into(), "Hindu".into()];
    let mut session = DeliverySession::new(&cfg, &CheapestArcSolver).unwrap();

    session.snapshot(t(0));
    session.apply(Command::MarkAllDelivered, t(1));
    let (generation, facts) = match session.apply(Command::Celebrate, t(2)) {
        SessionEffect::RequestSummary { generation, summary } => (generation, summary),
        other => panic!("unexpected effect {:?}", other),
    };

    session.apply(Command::Reset, t(3));
    let text = SummaryComposer::new(Arc::new(MockLlmClient::default()))
        .compose(&facts)
        .await;
    assert!(!session.finish_summary(generation, text));

    let state = session.snapshot(t(4));
    assert_eq!(state.summary, SummaryView::None);
    assert_eq!(state.remaining, 2);
    assert_eq!(state.timer.phase, TimerPhase::Idle);
    // 路线保留
    assert_eq!(state.stops.len(), 2);
}

#[tokio::test]
async fn test_collaborator_failure_is_reported() {
    let mut cfg = AppConfig::default();
    cfg.route.houses = vec!["TOI".into()];
    let mut session = DeliverySession::new(&cfg, &CheapestArcSolver).unwrap();

    session.apply(Command::MarkDelivered(1), t(0));
    let (generation, facts) = match session.apply(Command::Celebrate, t(1)) {
        SessionEffect::RequestSummary { generation, summary } => (generation, summary),
        other => panic!("unexpected effect {:?}", other),
    };
    let result = SummaryComposer::new(Arc::new(MockLlmClient::failing("503")))
        .compose(&facts)
        .await;
    assert!(matches!(result, Err(SummaryError::Service(_))));
    session.finish_summary(generation, result);

    let state = session.snapshot(t(2));
    assert!(matches!(state.summary, SummaryView::Failed(_)));
    assert!(state.complete);
}

#[test]
fn test_solver_failure_falls_back_to_input_order() {
    let mut cfg = AppConfig::default();
    cfg.route.houses = vec!["TOI".into(), "Hindu".into(), "ET".into()];
    let mut session = DeliverySession::new(&cfg, &FailingSolver).unwrap();

    assert!(session.plan().fell_back);
    assert_eq!(session.plan().tour.sequence(), &[0, 1, 2, 3, 0]);
    let state = session.snapshot(t(0));
    assert!(state.route_fell_back);
    let ids: Vec<usize> = state.stops.iter().map(|s| s.stop_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}
