//! Presentation side of the dashboard.
//!
//! The update loop only talks to [`DashboardView`]; what a "view" is (an
//! in-memory panel, a terminal printout, a test recorder) is up to the caller.

mod panel;
mod terminal;

pub use panel::{PanelView, Slot, SlotValue};
pub use terminal::TerminalView;

use chrono::{DateTime, Local};
use log::error;
use serde::Serialize;

use crate::{
    format::format_time,
    models::{MetricsSnapshot, RiskLevel},
};

/// Activity numbers as they are shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityDisplay {
    pub mouse_clicks: String,
    pub key_presses: String,
    pub screen_time: String,
    pub current_app: String,
}

impl ActivityDisplay {
    pub fn from_snapshot(snapshot: &MetricsSnapshot) -> Self {
        Self {
            mouse_clicks: snapshot.mouse_clicks.to_string(),
            key_presses: snapshot.key_presses.to_string(),
            screen_time: format_time(snapshot.screen_time),
            current_app: snapshot.current_app.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskDisplay {
    pub level: RiskLevel,
    pub label: String,
    pub color: &'static str,
    pub icon: &'static str,
    pub message: &'static str,
}

impl RiskDisplay {
    pub fn for_level(level: RiskLevel) -> Self {
        let config = level.config();
        Self {
            level,
            label: level.label(),
            color: config.color,
            icon: config.icon,
            message: config.message,
        }
    }
}

/// Named capabilities the update loop renders through.
pub trait DashboardView: Send + 'static {
    fn set_metrics(&mut self, metrics: &ActivityDisplay);
    fn set_risk(&mut self, risk: &RiskDisplay);
    fn set_recommendations(&mut self, recommendations: &[String]);
    fn set_last_updated(&mut self, at: DateTime<Local>);

    /// No user-facing notification exists yet; errors only reach the log.
    fn show_error(&mut self, message: &str) {
        error!("{message}");
    }
}

/// Pushes one snapshot through the view: metrics, risk, recommendations,
/// then the last-updated stamp, always in that order.
pub fn render_snapshot<V: DashboardView + ?Sized>(
    view: &mut V,
    snapshot: &MetricsSnapshot,
    now: DateTime<Local>,
) {
    view.set_metrics(&ActivityDisplay::from_snapshot(snapshot));
    view.set_risk(&RiskDisplay::for_level(snapshot.risk_level));
    view.set_recommendations(&snapshot.recommendations);
    view.set_last_updated(now);
}
