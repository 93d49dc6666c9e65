//! PaperPilot - 报纸派送路线规划与派送会话
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 会话状态机、编排循环、计时 tick、错误类型
//! - **delivery**: 派送进度、会话计时、今日报纸清单
//! - **llm**: 文本生成客户端抽象与实现（OpenAI 兼容 / Mock）
//! - **observability**: tracing 日志初始化
//! - **route**: 站点、代价矩阵、最便宜弧贪心求解
//! - **summary**: 派送总结事实与文案生成
//! - **ui**: Ratatui TUI 界面

pub mod config;
pub mod core;
pub mod delivery;
pub mod llm;
pub mod observability;
pub mod route;
pub mod summary;
pub mod ui;
