//! Display slots: the last rendered text for each metric plus its visual state.
//!
//! A slot belongs to at most one mutually exclusive tag group (trouble-code
//! or ignition). The active tag is stored as a single `Option<StateTag>`, so
//! applying a new tag always replaces the previous one and a reset clears it.

use crate::config::Placeholder;
use crate::format::FieldRender;
use crate::metrics::{FieldKind, MetricName};

/// Trouble-code group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtcTag {
    HasDtc,
    NoDtc,
}

/// Ignition group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnitionTag {
    Off,
    On,
    Running,
}

impl IgnitionTag {
    /// Match a sender label exactly. Other labels have no dedicated tag.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Off" => Some(IgnitionTag::Off),
            "On" => Some(IgnitionTag::On),
            "Running" => Some(IgnitionTag::Running),
            _ => None,
        }
    }
}

/// A visual state tag from one of the exclusive groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateTag {
    Dtc(DtcTag),
    Ignition(IgnitionTag),
}

impl StateTag {
    /// CSS class carried by the slot element while this tag is active.
    pub fn class(&self) -> &'static str {
        match self {
            StateTag::Dtc(DtcTag::HasDtc) => "has-dtc",
            StateTag::Dtc(DtcTag::NoDtc) => "no-dtc",
            StateTag::Ignition(IgnitionTag::Off) => "Off",
            StateTag::Ignition(IgnitionTag::On) => "On",
            StateTag::Ignition(IgnitionTag::Running) => "Running",
        }
    }
}

/// One metric's display state.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySlot {
    name: MetricName,
    text: Option<String>,
    tag: Option<StateTag>,
}

impl DisplaySlot {
    pub fn new(name: MetricName) -> Self {
        Self {
            name,
            text: None,
            tag: None,
        }
    }

    pub fn name(&self) -> MetricName {
        self.name
    }

    /// Rendered text, or `None` while the slot shows its placeholder.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Text to put in the page element.
    pub fn display_text<'a>(&'a self, placeholder: &Placeholder) -> &'a str {
        self.text.as_deref().unwrap_or(placeholder.as_str())
    }

    pub fn tag(&self) -> Option<StateTag> {
        self.tag
    }

    pub fn is_placeholder(&self) -> bool {
        self.text.is_none() && self.tag.is_none()
    }

    /// Apply a rendered field: replace the text and set (or clear) the group tag.
    pub fn apply(&mut self, render: FieldRender) {
        self.text = render.text;
        self.apply_state(render.tag);
    }

    /// Clear the slot's group and set at most one tag.
    pub fn apply_state(&mut self, tag: Option<StateTag>) {
        self.tag = tag;
    }

    /// Back to the neutral placeholder with no tag.
    pub fn reset(&mut self) {
        self.text = None;
        self.tag = None;
    }

    /// Full class list for the slot element.
    pub fn css_classes(&self) -> String {
        let base = match self.name.kind() {
            FieldKind::TroubleCode => "metric-value small-text dtc",
            FieldKind::Ignition => "metric-value text-status ignitionState",
            FieldKind::Gauge { .. } | FieldKind::Duration => "metric-value",
        };
        match self.tag {
            Some(tag) => format!("{base} {}", tag.class()),
            None => base.to_string(),
        }
    }
}

/// Fixed table of slots, one per known metric, created once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotTable {
    slots: Vec<DisplaySlot>,
}

impl SlotTable {
    pub fn new() -> Self {
        Self {
            slots: MetricName::ALL.iter().copied().map(DisplaySlot::new).collect(),
        }
    }

    pub fn get(&self, name: MetricName) -> &DisplaySlot {
        // Slots are built from MetricName::ALL in order.
        &self.slots[Self::index(name)]
    }

    pub fn get_mut(&mut self, name: MetricName) -> &mut DisplaySlot {
        &mut self.slots[Self::index(name)]
    }

    pub fn iter(&self) -> impl Iterator<Item = &DisplaySlot> {
        self.slots.iter()
    }

    /// Reset every slot to its placeholder.
    pub fn reset_all(&mut self) {
        for slot in &mut self.slots {
            slot.reset();
        }
    }

    pub fn all_placeholder(&self) -> bool {
        self.slots.iter().all(DisplaySlot::is_placeholder)
    }

    fn index(name: MetricName) -> usize {
        MetricName::ALL
            .iter()
            .position(|candidate| *candidate == name)
            .unwrap_or_default()
    }
}

impl Default for SlotTable {
    fn default() -> Self {
        Self::new()
    }
}
