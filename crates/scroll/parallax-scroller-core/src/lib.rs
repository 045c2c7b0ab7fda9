//! Parallax Scroller Core (host-agnostic)
//!
//! Animates elements in sync with page scroll. Each element declares per-property
//! keyframes at scroll checkpoints (`data-<percent>p` attributes); on every frame
//! the engine interpolates CSS values between the bracketing keyframes and emits
//! checkpoint notifications when the scroll position crosses a keyframe.
//!
//! The page itself sits behind [`ScrollHost`]; the wasm adapter implements it
//! on top of the DOM.

pub mod config;
pub mod driver;
pub mod element;
pub mod engine;
pub mod error;
pub mod host;
pub mod keyframes;
pub mod listener;
pub mod outputs;
pub mod parser;
pub mod session;

// Re-exports for consumers (adapters)
pub use config::{Config, FailurePolicy, ParsePolicy};
pub use driver::{page_scroll_fraction, ScrollDriver};
pub use element::{parse_keyframe_attribute, AnimatedElement, SourceNode};
pub use engine::{CheckpointCache, Engine, FrameContext, FrameStyle, Tweening};
pub use error::ScrollerError;
pub use host::ScrollHost;
pub use keyframes::{Keyframe, KeyframeStore};
pub use listener::{Listener, NotificationChannel};
pub use outputs::{Outputs, ScrollEvent, ScrollStage, StyleChange};
pub use parser::{
    parse_style_block, parse_value_template, substitute_style_value, Declaration, StyleTemplate,
};
pub use session::{Session, SessionState};

/// Scroller result type
pub type Result<T> = core::result::Result<T, ScrollerError>;
