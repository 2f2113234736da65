use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{MetricsSnapshot, RiskLevel};

/// One stored reading from `/api/history`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    /// Backend local time, ISO 8601 without offset.
    pub timestamp: NaiveDateTime,
    pub metrics: MetricsSnapshot,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub entries: usize,
    pub total_mouse_clicks: u64,
    pub total_key_presses: u64,
    /// Screen time is cumulative on the backend, so the day's value is the max.
    pub total_screen_time: f64,
    pub risk_levels: HashMap<RiskLevel, usize>,
}

impl DailySummary {
    pub fn risk_count(&self, level: RiskLevel) -> usize {
        self.risk_levels.get(&level).copied().unwrap_or(0)
    }
}

/// Summarizes the entries that fall on `date`. `None` if there are none.
pub fn summarize_day(entries: &[HistoryEntry], date: NaiveDate) -> Option<DailySummary> {
    let daily: Vec<&HistoryEntry> = entries
        .iter()
        .filter(|entry| entry.timestamp.date() == date)
        .collect();

    if daily.is_empty() {
        return None;
    }

    let mut risk_levels: HashMap<RiskLevel, usize> =
        RiskLevel::all().into_iter().map(|level| (level, 0)).collect();
    for entry in &daily {
        *risk_levels.entry(entry.metrics.risk_level).or_insert(0) += 1;
    }

    Some(DailySummary {
        date,
        entries: daily.len(),
        total_mouse_clicks: daily.iter().map(|e| e.metrics.mouse_clicks).sum(),
        total_key_presses: daily.iter().map(|e| e.metrics.key_presses).sum(),
        total_screen_time: daily
            .iter()
            .map(|e| e.metrics.screen_time)
            .fold(0.0, f64::max),
        risk_levels,
    })
}
