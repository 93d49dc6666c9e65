//! 派送进度：每户的派送状态与时间戳
//!
//! 记录在第一次被「看到」（observe）时惰性创建，只由显式的标记/取消标记修改，
//! 会话内不会删除（仅在整体重置时清空）。
//!
//! 不变量：`completed_at` 非空当且仅当 `delivered`；`start_observed_at` 按观察顺序单调不减，设置后不再改变。

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 单户派送记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryRecord {
    delivered: bool,
    start_observed_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl DeliveryRecord {
    fn new(observed_at: DateTime<Utc>) -> Self {
        Self {
            delivered: false,
            start_observed_at: observed_at,
            completed_at: None,
        }
    }

    pub fn delivered(&self) -> bool {
        self.delivered
    }

    pub fn start_observed_at(&self) -> DateTime<Utc> {
        self.start_observed_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }
}

/// 派送追踪器：站点编号 1..=total_stops
#[derive(Debug, Clone)]
pub struct DeliveryTracker {
    total_stops: usize,
    records: BTreeMap<usize, DeliveryRecord>,
    last_observed_at: Option<DateTime<Utc>>,
}

impl DeliveryTracker {
    pub fn new(total_stops: usize) -> Self {
        Self {
            total_stops,
            records: BTreeMap::new(),
            last_observed_at: None,
        }
    }

    pub fn total_stops(&self) -> usize {
        self.total_stops
    }

    fn in_range(&self, stop_id: usize) -> bool {
        (1..=self.total_stops).contains(&stop_id)
    }

    /// 幂等：首次观察时创建记录；返回是否新建
    pub fn observe(&mut self, stop_id: usize, now: DateTime<Utc>) -> bool {
        if !self.in_range(stop_id) {
            tracing::warn!(stop_id, "Ignoring observation of unknown stop");
            return false;
        }
        if self.records.contains_key(&stop_id) {
            return false;
        }
        // 时钟回拨时沿用上一次观察时间，保证单调
        let observed_at = match self.last_observed_at {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_observed_at = Some(observed_at);
        self.records.insert(stop_id, DeliveryRecord::new(observed_at));
        true
    }

    /// 标记已派送；已派送时为空操作。返回 true 表示剩余数已变化，界面需要刷新
    pub fn mark_delivered(&mut self, stop_id: usize, now: DateTime<Utc>) -> bool {
        if !self.in_range(stop_id) {
            tracing::warn!(stop_id, "Ignoring delivery mark for unknown stop");
            return false;
        }
        self.observe(stop_id, now);
        match self.records.get_mut(&stop_id) {
            Some(record) if !record.delivered => {
                record.delivered = true;
                record.completed_at = Some(now);
                tracing::debug!(stop_id, "Stop delivered");
                true
            }
            _ => false,
        }
    }

    /// 取消派送标记；未派送时为空操作
    pub fn mark_undelivered(&mut self, stop_id: usize) -> bool {
        match self.records.get_mut(&stop_id) {
            Some(record) if record.delivered => {
                record.delivered = false;
                record.completed_at = None;
                tracing::debug!(stop_id, "Stop marked undelivered");
                true
            }
            _ => false,
        }
    }

    /// 切换派送状态，返回切换后的状态
    pub fn toggle(&mut self, stop_id: usize, now: DateTime<Utc>) -> bool {
        if self.is_delivered(stop_id) {
            self.mark_undelivered(stop_id);
            false
        } else {
            self.mark_delivered(stop_id, now)
        }
    }

    /// 对所有已知站点执行 mark_delivered，返回实际变化的数量
    pub fn mark_all(&mut self, now: DateTime<Utc>) -> usize {
        let ids: Vec<usize> = self.records.keys().copied().collect();
        ids.into_iter()
            .filter(|&id| self.mark_delivered(id, now))
            .count()
    }

    /// 对所有已知站点执行 mark_undelivered，返回实际变化的数量
    pub fn clear_all(&mut self) -> usize {
        let ids: Vec<usize> = self.records.keys().copied().collect();
        ids.into_iter()
            .filter(|&id| self.mark_undelivered(id))
            .count()
    }

    pub fn is_delivered(&self, stop_id: usize) -> bool {
        self.records.get(&stop_id).is_some_and(|r| r.delivered)
    }

    pub fn record(&self, stop_id: usize) -> Option<&DeliveryRecord> {
        self.records.get(&stop_id)
    }

    /// 已创建的记录数
    pub fn known_count(&self) -> usize {
        self.records.len()
    }

    pub fn delivered_count(&self) -> usize {
        self.records.values().filter(|r| r.delivered).count()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_stops - self.delivered_count()
    }

    pub fn is_complete(&self) -> bool {
        self.total_stops > 0 && self.remaining_count() == 0
    }

    /// 整体重置：清空所有记录
    pub fn reset(&mut self) {
        self.records.clear();
        self.last_observed_at = None;
    }
}
