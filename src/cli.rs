//! Command-line entry points for the dashboard binary.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::info;
use tokio::sync::Mutex;

use crate::{
    client::MetricsClient,
    config::DashboardConfig,
    format::{format_date, format_number, format_time},
    models::{summarize_day, RiskLevel},
    update_loop::{refresh_once, CyclePolicy, UpdateLoopController},
    view::{DashboardView, PanelView, TerminalView},
};

#[derive(Parser, Debug)]
#[command(name = "burnout-dashboard")]
#[command(version)]
#[command(about = "Live terminal view of the burnout monitor", long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(short, long, global = true)]
    pub base_url: Option<String>,

    /// JSON config file
    #[arg(short, long, global = true, default_value = "burnout-dashboard.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Refresh the dashboard on a timer until Ctrl-C
    Watch {
        /// Milliseconds between refreshes
        #[arg(short, long)]
        interval_ms: Option<u64>,

        /// Skip a tick while the previous refresh is still waiting on the backend
        #[arg(long)]
        skip_if_busy: bool,
    },

    /// Fetch and print the current metrics once
    Snapshot,

    /// Fetch stored readings and summarize one day
    History {
        /// Size of the window in hours
        #[arg(long)]
        hours: Option<u32>,

        /// Day to summarize (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

impl Cli {
    /// File config with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<DashboardConfig> {
        let mut config = DashboardConfig::load(&self.config)?;
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }

        match &self.command {
            Commands::Watch {
                interval_ms,
                skip_if_busy,
            } => {
                if let Some(interval_ms) = interval_ms {
                    config.interval_ms = *interval_ms;
                }
                if *skip_if_busy {
                    config.cycle_policy = CyclePolicy::SkipIfBusy;
                }
            }
            Commands::History { hours: Some(hours), .. } => config.history_hours = *hours,
            _ => {}
        }

        config.validate()?;
        Ok(config)
    }
}

pub async fn run() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    let client = MetricsClient::new(config.base_url.clone());
    let panel = PanelView::without(&config.hidden_slot_list()?);

    match cli.command {
        Commands::Watch { .. } => cmd_watch(client, panel, &config).await,
        Commands::Snapshot => cmd_snapshot(client, panel).await,
        Commands::History { date, .. } => cmd_history(client, &config, date).await,
    }
}

async fn cmd_watch(client: MetricsClient, panel: PanelView, config: &DashboardConfig) -> Result<()> {
    info!("Watching {} (Ctrl-C to stop)", client.base_url());

    let view = Arc::new(Mutex::new(TerminalView::stdout(panel)));
    let mut controller = UpdateLoopController::new();
    controller.start(Arc::new(client), view, config.loop_config())?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    info!("Stopping dashboard");
    controller.stop().await
}

async fn cmd_snapshot(client: MetricsClient, panel: PanelView) -> Result<()> {
    let view = Mutex::new(TerminalView::stdout(panel));
    if !refresh_once(&client, &view).await {
        let message = format!("no metrics available from {}", client.current_metrics_url());
        view.lock().await.show_error(&message);
        bail!(message);
    }
    Ok(())
}

async fn cmd_history(
    client: MetricsClient,
    config: &DashboardConfig,
    date: Option<NaiveDate>,
) -> Result<()> {
    let hours = config.history_hours;
    let Some(entries) = client.fetch_history(hours).await else {
        bail!("no history available from {}", client.history_url(hours));
    };

    println!("{} readings in the last {hours}h", format_number(entries.len() as f64));

    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let Some(summary) = summarize_day(&entries, date) else {
        println!("No readings on {}", format_date(&date));
        return Ok(());
    };

    println!("Summary for {}", format_date(&summary.date));
    println!("  Readings:      {}", format_number(summary.entries as f64));
    println!("  Mouse clicks:  {}", format_number(summary.total_mouse_clicks as f64));
    println!("  Key presses:   {}", format_number(summary.total_key_presses as f64));
    println!("  Screen time:   {}", format_time(summary.total_screen_time));
    for level in RiskLevel::all() {
        println!("  {:<14} {}", format!("{}:", level.label()), summary.risk_count(level));
    }
    Ok(())
}
