//! 派送层：每户派送进度、计时器、今日报纸清单

pub mod papers;
pub mod timer;
pub mod tracker;

pub use papers::{default_paper_stack, PaperEntry, PaperSpec, PaperStack};
pub use timer::{format_elapsed, SessionTimer, TimerPhase};
pub use tracker::{DeliveryRecord, DeliveryTracker};
