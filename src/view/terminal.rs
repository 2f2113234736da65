use std::io::{self, Write};

use chrono::{DateTime, Local};
use log::warn;
use owo_colors::OwoColorize;

use super::{ActivityDisplay, DashboardView, PanelView, RiskDisplay, Slot};

/// Prints the panel after every completed refresh. The last-updated stamp is
/// the final step of a cycle, so that is when the frame is flushed.
pub struct TerminalView<W: Write + Send + 'static = io::Stdout> {
    panel: PanelView,
    out: W,
    color: bool,
}

impl TerminalView<io::Stdout> {
    pub fn stdout(panel: PanelView) -> Self {
        Self::new(panel, io::stdout(), true)
    }
}

impl<W: Write + Send + 'static> TerminalView<W> {
    pub fn new(panel: PanelView, out: W, color: bool) -> Self {
        Self { panel, out, color }
    }

    pub fn panel(&self) -> &PanelView {
        &self.panel
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes the current panel as one frame.
    pub fn print_frame(&mut self) -> io::Result<()> {
        let risk_color = self.panel.indicator().map(|(color, _)| color.to_string());

        writeln!(self.out, "{}", "-".repeat(40))?;
        for (slot, line) in self.panel.lines() {
            let is_risk_line = matches!(
                slot,
                Slot::RiskIndicator | Slot::RiskLevel | Slot::RiskMessage
            );
            if self.color && is_risk_line {
                writeln!(self.out, "{}", paint(&line, risk_color.as_deref()))?;
            } else {
                writeln!(self.out, "{line}")?;
            }
        }
        self.out.flush()
    }
}

fn paint(line: &str, color: Option<&str>) -> String {
    match color {
        Some("green") => line.green().to_string(),
        Some("yellow") => line.yellow().to_string(),
        Some("red") => line.red().to_string(),
        _ => line.to_string(),
    }
}

impl<W: Write + Send + 'static> DashboardView for TerminalView<W> {
    fn set_metrics(&mut self, metrics: &ActivityDisplay) {
        self.panel.set_metrics(metrics);
    }

    fn set_risk(&mut self, risk: &RiskDisplay) {
        self.panel.set_risk(risk);
    }

    fn set_recommendations(&mut self, recommendations: &[String]) {
        self.panel.set_recommendations(recommendations);
    }

    fn set_last_updated(&mut self, at: DateTime<Local>) {
        self.panel.set_last_updated(at);
        if let Err(err) = self.print_frame() {
            warn!("failed to print dashboard frame: {err}");
        }
    }
}
