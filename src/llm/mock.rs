//! Mock 客户端（用于测试，无需 API）
//!
//! 返回固定文本或固定错误，并记录调用次数与最后一次收到的消息。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError, Message, Role};

#[derive(Debug)]
pub struct MockLlmClient {
    reply: Result<String, LlmError>,
    calls: AtomicUsize,
    last_messages: Mutex<Vec<Message>>,
}

impl MockLlmClient {
    /// 总是返回 text
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    /// 总是返回 API 错误
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            reply: Err(LlmError::Api(reason.into())),
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_with_role(&self, role: Role) -> Option<String> {
        let messages = self.last_messages.lock().ok()?;
        let content = messages
            .iter()
            .rev()
            .find(|m| m.role == role)
            .map(|m| m.content.clone());
        content
    }

    /// 最后一次请求里的 User 消息
    pub fn last_prompt(&self) -> Option<String> {
        self.last_with_role(Role::User)
    }

    /// 最后一次请求里的 System 消息
    pub fn last_system(&self) -> Option<String> {
        self.last_with_role(Role::System)
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::replying("Great job out there this morning!")
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut slot) = self.last_messages.lock() {
            *slot = messages.to_vec();
        }
        self.reply.clone()
    }
}
