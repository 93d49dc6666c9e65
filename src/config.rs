//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `PAPERPILOT__*` 覆盖（双下划线表示嵌套，如 `PAPERPILOT__TIMER__TICK_MILLIS=500`）。
//! 凭据本身不进配置，只配置保存凭据的环境变量名。

use std::path::PathBuf;

use serde::Deserialize;

use crate::delivery::{default_paper_stack, PaperSpec};
use crate::route::DEFAULT_HOUSES;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub route: RouteSection,
    pub timer: TimerSection,
    pub papers: PapersSection,
    pub summary: SummarySection,
}

/// [app] 段：应用名、日志目录
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: String,
    /// TUI 模式下日志写入该目录，避免破坏全屏界面
    pub log_dir: PathBuf,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: "PaperPilot".to_string(),
            log_dir: PathBuf::from("logs"),
        }
    }
}

/// [route] 段：仓库名与各户报纸（按门牌顺序）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RouteSection {
    pub depot_label: String,
    pub houses: Vec<String>,
}

impl Default for RouteSection {
    fn default() -> Self {
        Self {
            depot_label: "Depot".to_string(),
            houses: DEFAULT_HOUSES.iter().map(|h| h.to_string()).collect(),
        }
    }
}

/// [timer] 段：运行时界面刷新间隔
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimerSection {
    pub tick_millis: u64,
}

impl Default for TimerSection {
    fn default() -> Self {
        Self { tick_millis: 1000 }
    }
}

/// [papers] 段：今日报纸清单
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PapersSection {
    pub stack: Vec<PaperSpec>,
}

impl Default for PapersSection {
    fn default() -> Self {
        Self {
            stack: default_paper_stack(),
        }
    }
}

/// 总结里使用的距离来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistanceSource {
    /// 固定值 fixed_distance_km
    #[default]
    Fixed,
    /// 路线总代价 × km_per_cost_unit
    Route,
}

/// [summary] 段：文本生成服务与总结参数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarySection {
    pub base_url: Option<String>,
    pub model: String,
    /// 保存 API Key 的环境变量名
    pub api_key_env: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub request_timeout_secs: u64,
    pub distance_source: DistanceSource,
    pub fixed_distance_km: f64,
    pub km_per_cost_unit: f64,
}

impl Default for SummarySection {
    fn default() -> Self {
        Self {
            base_url: Some("https://models.inference.ai.azure.com".to_string()),
            model: "Phi-3-small-8k-instruct".to_string(),
            api_key_env: "AZURE_INFERENCE_KEY".to_string(),
            temperature: 0.7,
            max_tokens: 300,
            top_p: 0.95,
            request_timeout_secs: 60,
            distance_source: DistanceSource::Fixed,
            fixed_distance_km: 12.0,
            km_per_cost_unit: 0.01,
        }
    }
}

/// 从 config 目录加载配置，环境变量 PAPERPILOT__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 PAPERPILOT__*
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("PAPERPILOT")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

/// 加载配置，失败时记录警告并使用默认值
pub fn load_config_or_default(config_path: Option<PathBuf>) -> AppConfig {
    load_config(config_path).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.route.houses.len(), 88);
        assert_eq!(cfg.timer.tick_millis, 1000);
        assert_eq!(cfg.papers.stack.len(), 15);
        assert_eq!(cfg.summary.api_key_env, "AZURE_INFERENCE_KEY");
        assert_eq!(cfg.summary.distance_source, DistanceSource::Fixed);
        assert_eq!(cfg.summary.fixed_distance_km, 12.0);
    }

    #[test]
    fn test_load_explicit_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[route]
depot_label = "Agency"
houses = ["TOI", "Hindu, ET"]

[timer]
tick_millis = 250

[[papers.stack]]
name = "TOI"
quantity = 3

[summary]
distance_source = "route"
"#
        )
        .unwrap();

        let cfg = load_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.route.depot_label, "Agency");
        assert_eq!(cfg.route.houses, vec!["TOI", "Hindu, ET"]);
        assert_eq!(cfg.timer.tick_millis, 250);
        assert_eq!(cfg.papers.stack, vec![PaperSpec::new("TOI", 3)]);
        assert_eq!(cfg.summary.distance_source, DistanceSource::Route);
        assert_eq!(cfg.summary.model, "Phi-3-small-8k-instruct");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let cfg = load_config_or_default(Some(PathBuf::from("/nonexistent/paperpilot.toml")));
        assert_eq!(cfg.app.name, "PaperPilot");
    }
}
