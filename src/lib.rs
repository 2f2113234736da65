pub mod cli;
pub mod client;
pub mod config;
pub mod format;
pub mod models;
pub mod update_loop;
pub mod view;

pub use cli::run;
pub use client::{FetchError, MetricsClient, MetricsSource, DEFAULT_HISTORY_HOURS};
pub use config::DashboardConfig;
pub use format::{format_date, format_number, format_time};
pub use models::{HistoryEntry, MetricsSnapshot, RiskConfig, RiskLevel};
pub use update_loop::{
    refresh_once, start_update_loop, CyclePolicy, LoopConfig, LoopStatus, UpdateLoopController,
    UpdateLoopHandle,
};
pub use view::{render_snapshot, DashboardView, PanelView, Slot, TerminalView};
