use serde::{Deserialize, Deserializer, Serialize};

use super::RiskLevel;

/// One point-in-time reading served by `/api/current_metrics`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsSnapshot {
    pub mouse_clicks: u64,
    pub key_presses: u64,
    /// Minutes; fractional values allowed.
    pub screen_time: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_app: String,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self {
            mouse_clicks: 0,
            key_presses: 0,
            screen_time: 0.0,
            current_app: String::new(),
            risk_level: RiskLevel::Low,
            recommendations: Vec::new(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
