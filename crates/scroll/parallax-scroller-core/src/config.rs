//! Core configuration for parallax-scroller-core.

use serde::{Deserialize, Serialize};

/// How malformed declarations inside keyframe attributes are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsePolicy {
    /// Drop malformed fragments silently.
    #[default]
    Lenient,
    /// Reject the whole initialization on the first malformed fragment.
    Strict,
}

/// What a frame does when one element fails to evaluate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The error aborts the frame and stops the loop.
    #[default]
    FailFast,
    /// The failing element is logged and skipped; the rest of the frame proceeds.
    IsolateElements,
}

/// Session configuration. Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Attribute naming an animated element; its value keys notifications.
    pub designation_attribute: String,

    /// Trailing delay before a resize burst triggers re-initialization.
    pub resize_debounce_ms: u32,

    pub parse_policy: ParsePolicy,
    pub failure_policy: FailurePolicy,

    /// Forget last scroll points when elements are rebuilt (e.g. on resize).
    pub reset_checkpoints_on_rebuild: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            designation_attribute: "data-scroll".to_string(),
            resize_debounce_ms: 250,
            parse_policy: ParsePolicy::Lenient,
            failure_policy: FailurePolicy::FailFast,
            reset_checkpoints_on_rebuild: false,
        }
    }
}
