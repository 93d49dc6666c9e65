//! 核心编排层：错误、会话上下文、状态投影、计时 tick、主控循环

pub mod error;
pub mod orchestrator;
pub mod session;
pub mod state;
pub mod ticker;

pub use error::{RouteError, SummaryError};
pub use orchestrator::{create_session, spawn_session, CollaboratorResolver};
pub use session::{Command, DeliverySession, SessionEffect};
pub use state::{PaperView, StopView, SummaryView, TimerView, UiState};
pub use ticker::TimerTicker;
