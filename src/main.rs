//! PaperPilot - 报纸派送助手
//!
//! 入口：加载配置、初始化文件日志、规划路线并创建派送会话，然后运行 TUI 主循环。

use std::path::PathBuf;

use anyhow::Context;
use paperpilot::{
    config::{load_config, AppConfig},
    core::create_session,
    observability,
    ui::run_app,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 可选：第一个参数为额外的配置文件
    let config_path = std::env::args().nth(1).map(PathBuf::from);

    // 日志目录来自配置，加载失败的原因等日志就绪后再记录
    let (cfg, load_error) = match load_config(config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // 全屏界面下日志写文件
    observability::init_file(&cfg.app.log_dir).context("Failed to init logging")?;
    if let Some(e) = load_error {
        tracing::warn!("Config load failed ({}), using defaults", e);
    }

    let (cmd_tx, state_rx) = create_session(&cfg)
        .await
        .context("Failed to create delivery session")?;

    run_app(state_rx, cmd_tx).await.context("App run failed")?;

    Ok(())
}
