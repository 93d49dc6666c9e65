//! 站点定义：派送站点、仓库（depot）与合成坐标
//!
//! 站点 0 为仓库，是每条路线的起点与终点，本身不需要派送；1..=N 为各户。
//! 本部署使用合成二维坐标 (i, 2i)，真实部署可替换为经纬度而不影响路线契约。

use serde::{Deserialize, Serialize};

/// 仓库在站点列表中的下标
pub const DEPOT_INDEX: usize = 0;

/// 二维位置（合成坐标）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// L1（曼哈顿）距离
    pub fn manhattan(&self, other: &Position) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// 派送站点：创建后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    id: usize,
    label: String,
    position: Position,
}

impl Stop {
    pub fn new(id: usize, label: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            label: label.into(),
            position,
        }
    }

    /// 站点编号（仓库为 0，住户从 1 开始）
    pub fn id(&self) -> usize {
        self.id
    }

    /// 原始标签，可能包含多份报纸名与门牌备注，如 "TOI, VK (Sat - Bodhi)"
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_depot(&self) -> bool {
        self.id == DEPOT_INDEX
    }

    /// 界面显示用标签："House 12: TOI, ET"
    pub fn display_label(&self) -> String {
        if self.is_depot() {
            self.label.clone()
        } else {
            format!("House {}: {}", self.id, self.label)
        }
    }
}

/// 按住户标签生成完整站点列表：下标 0 为仓库，住户 i 位于 (i, 2i)
pub fn synthetic_stops(depot_label: &str, house_labels: &[String]) -> Vec<Stop> {
    std::iter::once(Stop::new(DEPOT_INDEX, depot_label, Position::new(0.0, 0.0)))
        .chain(house_labels.iter().enumerate().map(|(i, label)| {
            let id = i + 1;
            Stop::new(id, label.clone(), Position::new(id as f64, (id * 2) as f64))
        }))
        .collect()
}

/// 固定派送线路上各户的报纸（按门牌顺序）
pub const DEFAULT_HOUSES: &[&str] = &[
    "Hindu",
    "TOI, ET",
    "TOI",
    "TOI",
    "Prajavani",
    "TOI (2nd floor)",
    "Vijayavani, Indian Express",
    "TOI",
    "Prajavani (Taranga)",
    "VK, TOI (Book)",
    "VK",
    "Vijayavani, Deccan",
    "TOI, Prajavani",
    "ET, Hindu",
    "Hindu, ET",
    "VK",
    "VK, Hindu",
    "Patrika",
    "TOI",
    "TOI, VK, Hindu",
    "South India times (new sri ram)",
    "VK",
    "ET, Mirror",
    "TOI",
    "Salar",
    "TOI, Vijayavani",
    "TOI, Vijayavani",
    "Deccan, Salar",
    "TOI (Church)",
    "TOI, TOI, Patrika, Patrika, Deccan, Patrika",
    "TOI",
    "Prajavani",
    "VK (Sun-Praja)",
    "VK",
    "Hindu, TOI",
    "Mirror, TOI",
    "TOI",
    "VK",
    "Deccan, Hindu, TOI",
    "TOI, VK (Sat - Bodhi)",
    "Patrika",
    "TOI",
    "TOI",
    "Hindu",
    "Vijayavani",
    "Deccan",
    "Hindu",
    "TOI",
    "TOI",
    "TOI, Prajavani, Mirror",
    "Prajavani",
    "VK",
    "Deccan, VK",
    "Vijayavani",
    "VK",
    "Mirror, TOI",
    "Salar, Deccan, Hindu",
    "Mirror, TOI (Sun - Deccan)",
    "Malayalam (Malabar)",
    "Deccan",
    "TOI, Mirror",
    "Prajavani",
    "Hindu, VK",
    "Prajavani, Kannada Prabha",
    "Hindu, ET (2nd floor)",
    "TOI",
    "TOI, ET, Vijayavani",
    "TOI",
    "TOI, Patrika",
    "TOI",
    "Vijayavani, Vijayavani",
    "Tamil (Thanti), Deccan",
    "TOI",
    "Vijayavani",
    "VK",
    "TOI (New Red Gate)",
    "TOI (New Masjid)",
    "TOI and ET (beside masjid)",
    "Deccan",
    "TOI, VK",
    "Vijayavani",
    "Prajavani, Hindu",
    "Prajavani, Prajavani",
    "Vijayavani",
    "Prajavani",
    "VK",
    "Tamil (Thanti), Kannada Prabha",
    "Hindu",
];
