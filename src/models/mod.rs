mod history;
mod risk;
mod snapshot;

pub use history::{summarize_day, DailySummary, HistoryEntry};
pub use risk::{RiskConfig, RiskLevel};
pub use snapshot::MetricsSnapshot;
