//! 文本生成客户端抽象
//!
//! 所有后端（OpenAI 兼容 / Mock）实现 LlmClient：单次请求、单次响应，不做流式与重试。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 消息角色
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    System,
    User,
}

/// 单条消息
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// 文本生成失败原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("failed to build request: {0}")]
    Request(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),
}

/// 文本生成客户端：非流式完成
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError>;
}
