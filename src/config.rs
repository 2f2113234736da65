use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

use crate::client::DEFAULT_HISTORY_HOURS;
use crate::update_loop::{CyclePolicy, LoopConfig, DEFAULT_INTERVAL_MS};
use crate::view::Slot;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    pub base_url: String,
    pub interval_ms: u64,
    pub history_hours: u32,
    pub cycle_policy: CyclePolicy,
    /// Slot ids (e.g. `"currentApp"`) the terminal view leaves out.
    pub hidden_slots: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            interval_ms: DEFAULT_INTERVAL_MS,
            history_hours: DEFAULT_HISTORY_HOURS,
            cycle_policy: CyclePolicy::Concurrent,
            hidden_slots: Vec::new(),
        }
    }
}

impl DashboardConfig {
    /// Reads `path` if it exists; a missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            bail!("intervalMs must be greater than zero");
        }
        if self.history_hours == 0 {
            bail!("historyHours must be greater than zero");
        }
        if self.base_url.trim().is_empty() {
            bail!("baseUrl must not be empty");
        }
        self.hidden_slot_list()?;
        Ok(())
    }

    pub fn hidden_slot_list(&self) -> Result<Vec<Slot>> {
        self.hidden_slots
            .iter()
            .map(|id| Slot::from_id(id).with_context(|| format!("unknown slot id '{id}'")))
            .collect()
    }

    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            interval: Duration::from_millis(self.interval_ms),
            policy: self.cycle_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.loop_config().interval, Duration::from_millis(5000));
        assert_eq!(config.history_hours, 24);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"intervalMs": 2000, "cyclePolicy": "skipIfBusy", "hiddenSlots": ["currentApp"]}}"#
        )
        .unwrap();

        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.interval_ms, 2000);
        assert_eq!(config.cycle_policy, CyclePolicy::SkipIfBusy);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.hidden_slot_list().unwrap(), vec![Slot::CurrentApp]);
    }

    #[test]
    fn rejects_zero_interval_and_unknown_slots() {
        let config = DashboardConfig {
            interval_ms: 0,
            ..DashboardConfig::default()
        };
        assert!(config.validate().is_err());

        let config = DashboardConfig {
            hidden_slots: vec!["sidebar".into()],
            ..DashboardConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sidebar"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = DashboardConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
