//! Output contracts from the core engine.
//!
//! Outputs carry the style writes produced by one evaluation, addressed by
//! element index, and the notifications to hand to the listener. Hosts apply
//! changes; the session forwards events through the notification channel.

use serde::{Deserialize, Serialize};

/// Lifecycle stage reported with each notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollStage {
    Init,
    ScrollForward,
    ScrollBackward,
}

/// Notification payload delivered to the listener.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollEvent {
    pub name: String,
    pub stage: ScrollStage,
    /// Crossed keyframe as a percentage of viewport height (`constant * 100`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<f64>,
}

impl ScrollEvent {
    pub fn init(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stage: ScrollStage::Init,
            checkpoint: None,
        }
    }

    pub fn checkpoint(name: impl Into<String>, constant: f64, stage: ScrollStage) -> Self {
        Self {
            name: name.into(),
            stage,
            checkpoint: Some(checkpoint_percent(constant)),
        }
    }
}

/// `constant * 100`, snapped to a whole number when only rounding noise separates them.
pub fn checkpoint_percent(constant: f64) -> f64 {
    let raw = constant * 100.0;
    let rounded = raw.round();
    if (raw - rounded).abs() < 1e-9 {
        rounded
    } else {
        raw
    }
}

/// One CSS property write for the element at `element` (index into the session's elements).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleChange {
    pub element: usize,
    pub property: String,
    pub value: String,
}

/// Outputs of one element evaluation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<StyleChange>,
    #[serde(default)]
    pub events: Vec<ScrollEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: StyleChange) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: ScrollEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }
}
