use std::collections::BTreeMap;

use chrono::{DateTime, Local};

use super::{ActivityDisplay, DashboardView, RiskDisplay};

/// Display targets a panel can carry. Ids match the dashboard page element ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    RiskIndicator,
    RiskLevel,
    RiskMessage,
    MouseClicks,
    KeyPresses,
    ScreenTime,
    CurrentApp,
    Recommendations,
    LastUpdate,
}

impl Slot {
    pub const ALL: [Slot; 9] = [
        Slot::RiskIndicator,
        Slot::RiskLevel,
        Slot::RiskMessage,
        Slot::MouseClicks,
        Slot::KeyPresses,
        Slot::ScreenTime,
        Slot::CurrentApp,
        Slot::Recommendations,
        Slot::LastUpdate,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Slot::RiskIndicator => "riskIndicator",
            Slot::RiskLevel => "riskLevel",
            Slot::RiskMessage => "riskMessage",
            Slot::MouseClicks => "mouseClicks",
            Slot::KeyPresses => "keyPresses",
            Slot::ScreenTime => "screenTime",
            Slot::CurrentApp => "currentApp",
            Slot::Recommendations => "recommendations",
            Slot::LastUpdate => "lastUpdate",
        }
    }

    pub fn from_id(id: &str) -> Option<Slot> {
        Slot::ALL.into_iter().find(|slot| slot.id() == id)
    }

    fn caption(&self) -> &'static str {
        match self {
            Slot::RiskIndicator => "Indicator",
            Slot::RiskLevel => "Risk",
            Slot::RiskMessage => "Status",
            Slot::MouseClicks => "Mouse clicks",
            Slot::KeyPresses => "Key presses",
            Slot::ScreenTime => "Screen time",
            Slot::CurrentApp => "Current app",
            Slot::Recommendations => "Recommendations",
            Slot::LastUpdate => "Updated",
        }
    }

    fn empty_value(&self) -> SlotValue {
        match self {
            Slot::RiskIndicator => SlotValue::Indicator {
                color: String::new(),
                icon: String::new(),
            },
            Slot::Recommendations => SlotValue::List(Vec::new()),
            _ => SlotValue::Text(String::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValue {
    Text(String),
    Indicator { color: String, icon: String },
    List(Vec<String>),
}

/// In-memory dashboard page. Only the slots it was built with exist; writes
/// aimed at any other slot are dropped without complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    slots: BTreeMap<Slot, SlotValue>,
}

impl Default for PanelView {
    fn default() -> Self {
        Self::with_slots(Slot::ALL)
    }
}

impl PanelView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slots(slots: impl IntoIterator<Item = Slot>) -> Self {
        Self {
            slots: slots
                .into_iter()
                .map(|slot| (slot, slot.empty_value()))
                .collect(),
        }
    }

    /// Every slot except the given ones.
    pub fn without(hidden: &[Slot]) -> Self {
        Self::with_slots(Slot::ALL.into_iter().filter(|slot| !hidden.contains(slot)))
    }

    pub fn has_slot(&self, slot: Slot) -> bool {
        self.slots.contains_key(&slot)
    }

    pub fn get(&self, slot: Slot) -> Option<&SlotValue> {
        self.slots.get(&slot)
    }

    pub fn text(&self, slot: Slot) -> Option<&str> {
        match self.slots.get(&slot)? {
            SlotValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn list(&self, slot: Slot) -> Option<&[String]> {
        match self.slots.get(&slot)? {
            SlotValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// `(color, icon)` of the risk indicator.
    pub fn indicator(&self) -> Option<(&str, &str)> {
        match self.slots.get(&Slot::RiskIndicator)? {
            SlotValue::Indicator { color, icon } => Some((color.as_str(), icon.as_str())),
            _ => None,
        }
    }

    fn write(&mut self, slot: Slot, value: SlotValue) {
        if let Some(existing) = self.slots.get_mut(&slot) {
            *existing = value;
        }
    }

    fn write_text(&mut self, slot: Slot, text: impl Into<String>) {
        self.write(slot, SlotValue::Text(text.into()));
    }

    /// One entry per display line, tagged with the slot it came from.
    pub fn lines(&self) -> Vec<(Slot, String)> {
        let mut lines = Vec::new();
        for (slot, value) in &self.slots {
            match value {
                SlotValue::Text(text) if *slot == Slot::LastUpdate => {
                    lines.push((*slot, text.clone()));
                }
                SlotValue::Text(text) => {
                    lines.push((*slot, format!("{:<16}{}", format!("{}:", slot.caption()), text)));
                }
                SlotValue::Indicator { color, icon } => {
                    lines.push((
                        *slot,
                        format!("{:<16}[{}] {}", format!("{}:", slot.caption()), color, icon),
                    ));
                }
                SlotValue::List(items) => {
                    lines.push((*slot, format!("{}:", slot.caption())));
                    lines.extend(items.iter().map(|item| (*slot, format!("  - {item}"))));
                }
            }
        }
        lines
    }

    pub fn render(&self) -> String {
        self.lines()
            .into_iter()
            .map(|(_, line)| line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl DashboardView for PanelView {
    fn set_metrics(&mut self, metrics: &ActivityDisplay) {
        self.write_text(Slot::MouseClicks, &metrics.mouse_clicks);
        self.write_text(Slot::KeyPresses, &metrics.key_presses);
        self.write_text(Slot::ScreenTime, &metrics.screen_time);
        self.write_text(Slot::CurrentApp, &metrics.current_app);
    }

    fn set_risk(&mut self, risk: &RiskDisplay) {
        self.write(
            Slot::RiskIndicator,
            SlotValue::Indicator {
                color: risk.color.to_string(),
                icon: risk.icon.to_string(),
            },
        );
        self.write_text(Slot::RiskLevel, &risk.label);
        self.write_text(Slot::RiskMessage, risk.message);
    }

    fn set_recommendations(&mut self, recommendations: &[String]) {
        self.write(Slot::Recommendations, SlotValue::List(recommendations.to_vec()));
    }

    fn set_last_updated(&mut self, at: DateTime<Local>) {
        self.write_text(
            Slot::LastUpdate,
            format!("Last updated: {}", at.format("%H:%M:%S")),
        );
    }
}
