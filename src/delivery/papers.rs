//! 今日报纸清单：每种报纸的份数与是否已领取
//!
//! 按配置顺序保存；名称是稳定的键。重置时恢复为配置中的份数且全部未领取。

use serde::{Deserialize, Serialize};

/// 配置中的一种报纸
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperSpec {
    pub name: String,
    pub quantity: u32,
}

impl PaperSpec {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// 单种报纸的当前状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaperEntry {
    pub quantity: u32,
    pub collected: bool,
}

#[derive(Debug, Clone)]
pub struct PaperStack {
    defaults: Vec<PaperSpec>,
    entries: Vec<(String, PaperEntry)>,
}

impl PaperStack {
    /// 由配置构建；重名只保留第一条
    pub fn new(specs: Vec<PaperSpec>) -> Self {
        let mut defaults: Vec<PaperSpec> = Vec::with_capacity(specs.len());
        for spec in specs {
            if defaults.iter().any(|d| d.name == spec.name) {
                tracing::warn!(paper = %spec.name, "Duplicate paper in stack config, ignoring");
                continue;
            }
            defaults.push(spec);
        }
        let mut stack = Self {
            defaults,
            entries: Vec::new(),
        };
        stack.reset();
        stack
    }

    pub fn entries(&self) -> &[(String, PaperEntry)] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&PaperEntry> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut PaperEntry> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, e)| e)
    }

    /// 设置是否领取；返回是否发生变化
    pub fn set_collected(&mut self, name: &str, collected: bool) -> bool {
        match self.get_mut(name) {
            Some(entry) if entry.collected != collected => {
                entry.collected = collected;
                true
            }
            Some(_) => false,
            None => {
                tracing::warn!(paper = name, "Unknown paper");
                false
            }
        }
    }

    pub fn toggle(&mut self, name: &str) -> bool {
        let collected = self.get(name).is_some_and(|e| e.collected);
        self.set_collected(name, !collected)
    }

    pub fn set_quantity(&mut self, name: &str, quantity: u32) -> bool {
        match self.get_mut(name) {
            Some(entry) if entry.quantity != quantity => {
                entry.quantity = quantity;
                true
            }
            Some(_) => false,
            None => {
                tracing::warn!(paper = name, "Unknown paper");
                false
            }
        }
    }

    pub fn collect_all(&mut self) {
        for (_, entry) in &mut self.entries {
            entry.collected = true;
        }
    }

    pub fn clear_all(&mut self) {
        for (_, entry) in &mut self.entries {
            entry.collected = false;
        }
    }

    /// 是否全部领取（空清单视为已全部领取）
    pub fn all_collected(&self) -> bool {
        self.entries.iter().all(|(_, e)| e.collected)
    }

    /// 已领取报纸的总份数
    pub fn total_to_carry(&self) -> u32 {
        self.entries
            .iter()
            .filter(|(_, e)| e.collected)
            .map(|(_, e)| e.quantity)
            .sum()
    }

    /// 已领取的报纸名（排序去重）
    pub fn collected_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| e.collected)
            .map(|(n, _)| n.clone())
            .collect();
        labels.sort();
        labels.dedup();
        labels
    }

    pub fn reset(&mut self) {
        self.entries = self
            .defaults
            .iter()
            .map(|spec| {
                (
                    spec.name.clone(),
                    PaperEntry {
                        quantity: spec.quantity,
                        collected: false,
                    },
                )
            })
            .collect();
    }
}

/// 默认报纸清单（名称, 份数）
pub fn default_paper_stack() -> Vec<PaperSpec> {
    [
        ("Malayalam (Malabar)", 1),
        ("The New Indian Express", 1),
        ("The South India Times", 1),
        ("Kannada Prabha", 2),
        ("Tamil (Daily Thanthi)", 2),
        ("Salar (Urdu)", 3),
        ("The Economic Times (ET)", 6),
        ("Bangalore Mirror", 6),
        ("Rajasthan Patrika (Hindi)", 6),
        ("Deccan Herald", 9),
        ("The Hindu", 14),
        ("Prajavani (ಪ್ರಜಾವಾಣಿ)", 12),
        ("Vijayavani (ವಿಜಯವಾಣಿ)", 12),
        ("Vijaya Karnataka (VK)", 17),
        ("Times of India (TOI)", 39),
    ]
    .into_iter()
    .map(|(name, quantity)| PaperSpec::new(name, quantity))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> PaperStack {
        PaperStack::new(vec![
            PaperSpec::new("TOI", 39),
            PaperSpec::new("Hindu", 14),
            PaperSpec::new("Deccan", 9),
        ])
    }

    #[test]
    fn test_nothing_collected_initially() {
        let stack = small();
        assert!(!stack.all_collected());
        assert_eq!(stack.total_to_carry(), 0);
        assert!(stack.collected_labels().is_empty());
    }

    #[test]
    fn test_total_counts_only_collected() {
        let mut stack = small();
        stack.toggle("TOI");
        stack.toggle("Deccan");
        assert_eq!(stack.total_to_carry(), 48);
        assert_eq!(stack.collected_labels(), vec!["Deccan", "TOI"]);
    }

    #[test]
    fn test_collect_all_then_clear_all() {
        let mut stack = small();
        stack.collect_all();
        assert!(stack.all_collected());
        assert_eq!(stack.total_to_carry(), 62);
        stack.clear_all();
        assert!(!stack.all_collected());
    }

    #[test]
    fn test_quantity_edit_and_reset() {
        let mut stack = small();
        assert!(stack.set_quantity("Hindu", 20));
        assert!(!stack.set_quantity("Hindu", 20));
        stack.set_collected("Hindu", true);
        assert_eq!(stack.total_to_carry(), 20);
        stack.reset();
        assert_eq!(stack.get("Hindu").unwrap().quantity, 14);
        assert!(!stack.get("Hindu").unwrap().collected);
    }

    #[test]
    fn test_unknown_paper_ignored() {
        let mut stack = small();
        assert!(!stack.toggle("Daily Planet"));
        assert!(!stack.set_quantity("Daily Planet", 3));
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let stack = PaperStack::new(vec![PaperSpec::new("TOI", 1), PaperSpec::new("TOI", 5)]);
        assert_eq!(stack.entries().len(), 1);
        assert_eq!(stack.get("TOI").unwrap().quantity, 1);
    }

    #[test]
    fn test_default_stack() {
        let stack = PaperStack::new(default_paper_stack());
        assert_eq!(stack.entries().len(), 15);
        let mut all = stack.clone();
        all.collect_all();
        assert_eq!(all.total_to_carry(), 131);
    }
}
