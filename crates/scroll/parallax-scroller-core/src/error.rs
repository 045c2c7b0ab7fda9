//! Error types for the parallax scroller

use serde::{Deserialize, Serialize};

/// Errors raised while configuring or evaluating scroll animations.
///
/// Validation errors surface synchronously from setup calls. A
/// [`ScrollerError::StyleMismatch`] surfaces from frame evaluation and, under the
/// default failure policy, stops the frame loop.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ScrollerError {
    /// Keyframe constant is not a finite number
    #[error("Scroll percentage must be an integer, got \"{value}\" instead")]
    InvalidScrollPercentage { value: String },

    /// Listener supplied by the host is not callable
    #[error("Listener must be a function")]
    InvalidListener,

    /// Root handle supplied by the host is not an element
    #[error("Invalid root element")]
    InvalidRootElement,

    /// Declaration rejected under the strict parse policy
    #[error("Malformed style declaration: \"{fragment}\"")]
    MalformedDeclaration { fragment: String },

    /// Two numeric keyframes of one property carry a different number of values
    #[error("Styles between keyframes must match")]
    StyleMismatch {
        property: String,
        from_len: usize,
        to_len: usize,
    },
}

impl ScrollerError {
    /// Build the error for an unusable scroll constant.
    pub fn invalid_percentage(value: impl ToString) -> Self {
        Self::InvalidScrollPercentage {
            value: value.to_string(),
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidScrollPercentage { .. }
            | Self::InvalidListener
            | Self::InvalidRootElement
            | Self::MalformedDeclaration { .. } => "validation",
            Self::StyleMismatch { .. } => "mismatch",
        }
    }

    /// Mismatches are authoring bugs found mid-loop; everything else is caught at setup.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::StyleMismatch { .. })
    }
}

impl From<ScrollerError> for String {
    fn from(err: ScrollerError) -> Self {
        err.to_string()
    }
}
