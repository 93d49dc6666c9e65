//! 派送总结：汇总完成情况，交给外部文本生成服务写一段鼓励的话
//!
//! 只请求一次，不自动重试；凭据缺失或服务失败时返回配置类错误，由用户手动重新触发。
//! 任何失败都不影响派送进度与计时器状态。

use std::sync::Arc;

use serde::Serialize;

use crate::config::{DistanceSource, SummarySection};
use crate::core::SummaryError;
use crate::llm::{CompletionParams, LlmClient, LlmError, Message, OpenAiClient};

/// 传给文本生成服务的事实
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliverySummary {
    pub delivery_count: usize,
    pub distance_km: f64,
    /// 总用时（分钟，向下取整）
    pub minutes: u64,
    /// 已领取的报纸（排序去重）
    pub papers: Vec<String>,
}

impl DeliverySummary {
    pub fn new(delivery_count: usize, distance_km: f64, elapsed_seconds: f64, papers: Vec<String>) -> Self {
        let mut papers = papers;
        papers.sort();
        papers.dedup();
        let minutes = if elapsed_seconds.is_finite() && elapsed_seconds > 0.0 {
            (elapsed_seconds as u64) / 60
        } else {
            0
        };
        Self {
            delivery_count,
            distance_km,
            minutes,
            papers,
        }
    }

    /// 生成 User 消息：本次派送的事实
    pub fn prompt(&self) -> String {
        let paper_list = if self.papers.is_empty() {
            "various newspapers".to_string()
        } else {
            self.papers.join(", ")
        };
        let distance = if self.distance_km.fract() == 0.0 {
            format!("{:.0}", self.distance_km)
        } else {
            format!("{:.1}", self.distance_km)
        };

        format!(
            "- They were up at 5 AM to start the round.\n\
             - They completed {} deliveries.\n\
             - They carried: {}.\n\
             - They walked, climbed stairs and covered about {} km.\n\
             - They finished every delivery in {} minutes.",
            self.delivery_count, paper_list, distance, self.minutes
        )
    }
}

/// 根据配置决定总结里的距离（公里）
///
/// 默认使用固定值；`distance_source = "route"` 时用路线总代价换算，路线代价未知时退回固定值。
pub fn summary_distance_km(cfg: &SummarySection, route_cost: Option<u64>) -> f64 {
    match (cfg.distance_source, route_cost) {
        (DistanceSource::Route, Some(cost)) => cost as f64 * cfg.km_per_cost_unit,
        (DistanceSource::Route, None) => {
            tracing::warn!("Route cost unknown, using fixed distance for summary");
            cfg.fixed_distance_km
        }
        (DistanceSource::Fixed, _) => cfg.fixed_distance_km,
    }
}

/// 按配置创建文本生成客户端；凭据环境变量缺失时报配置错误
pub fn create_collaborator(cfg: &SummarySection) -> Result<Arc<dyn LlmClient>, SummaryError> {
    let api_key = std::env::var(&cfg.api_key_env)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| SummaryError::MissingCredential(cfg.api_key_env.clone()))?;

    let params = CompletionParams {
        temperature: cfg.temperature,
        max_tokens: cfg.max_tokens,
        top_p: cfg.top_p,
        timeout_secs: cfg.request_timeout_secs,
    };
    tracing::info!("Using summary model {}", cfg.model);
    Ok(Arc::new(OpenAiClient::new(
        cfg.base_url.as_deref(),
        &cfg.model,
        &api_key,
        params,
    )))
}

/// System 消息：语气与格式要求
pub const COACH_INSTRUCTIONS: &str = "You are a motivational coach writing a short, upbeat note to a newspaper delivery agent. \
Celebrate their hard work, consistency, discipline and early-morning dedication, and make them proud of the effort. \
Close with one inspiring quote about hustle, consistency or success. \
Keep it energetic, friendly and brief, like a quick text to a friend. No email tone.";

/// 组合总结：单次调用文本生成服务
pub struct SummaryComposer {
    client: Arc<dyn LlmClient>,
}

impl SummaryComposer {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    pub async fn compose(&self, summary: &DeliverySummary) -> Result<String, SummaryError> {
        let messages = [
            Message::system(COACH_INSTRUCTIONS),
            Message::user(summary.prompt()),
        ];
        let text = self
            .client
            .complete(&messages)
            .await
            .map_err(|e: LlmError| SummaryError::Service(e.to_string()))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(SummaryError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}
