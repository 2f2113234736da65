use serde::{Deserialize, Deserializer, Serialize};

/// Display configuration for one risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskConfig {
    pub color: &'static str,
    pub icon: &'static str,
    pub message: &'static str,
}

const LOW: RiskConfig = RiskConfig {
    color: "green",
    icon: "smile",
    message: "Everything looks good!",
};

const MEDIUM: RiskConfig = RiskConfig {
    color: "yellow",
    icon: "meh",
    message: "Consider taking a break soon",
};

const HIGH: RiskConfig = RiskConfig {
    color: "red",
    icon: "frown",
    message: "Time to take action!",
};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Resolves a backend tag. Anything outside `low`/`medium`/`high` is `Low`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "medium" => RiskLevel::Medium,
            "high" => RiskLevel::High,
            _ => RiskLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    pub fn config(&self) -> &'static RiskConfig {
        match self {
            RiskLevel::Low => &LOW,
            RiskLevel::Medium => &MEDIUM,
            RiskLevel::High => &HIGH,
        }
    }

    /// "Low Risk", "Medium Risk", "High Risk".
    pub fn label(&self) -> String {
        let tag = self.as_str();
        let mut chars = tag.chars();
        match chars.next() {
            Some(first) => format!("{}{} Risk", first.to_ascii_uppercase(), chars.as_str()),
            None => "Risk".to_string(),
        }
    }

    pub fn all() -> [RiskLevel; 3] {
        [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High]
    }
}

// The backend reports "unknown" when its analysis fails, and may omit the
// field or send null. All of those land on Low instead of failing the decode.
impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = Option::<String>::deserialize(deserializer)?;
        Ok(tag.as_deref().map(RiskLevel::from_tag).unwrap_or_default())
    }
}
