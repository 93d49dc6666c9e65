//! 文本生成层：客户端抽象与实现（OpenAI 兼容 / Mock）

pub mod mock;
pub mod openai;
pub mod traits;

pub use mock::MockLlmClient;
pub use openai::{CompletionParams, OpenAiClient};
pub use traits::{LlmClient, LlmError, Message, Role};
