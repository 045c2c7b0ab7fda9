//! Keyframe model and per-property keyframe store.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ScrollerError;
use crate::parser::{parse_value_template, substitute_style_value, Declaration, StyleTemplate};
use crate::Result;

/// Target style of one CSS property at one scroll checkpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Scroll position in viewport heights (0 = top, 1 = one viewport down).
    pub constant: f64,
    pub template: String,
    pub values: Vec<f64>,
}

impl Keyframe {
    pub fn new(constant: f64, parsed: StyleTemplate) -> Self {
        Self {
            constant,
            template: parsed.template,
            values: parsed.values,
        }
    }

    /// Absolute pixel offset of this keyframe for a given viewport height.
    #[inline]
    pub fn window(&self, viewport_height: f64) -> f64 {
        self.constant * viewport_height
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        self.values.is_empty()
    }

    /// The CSS value this keyframe describes on its own.
    pub fn render(&self) -> String {
        if self.is_literal() {
            self.template.clone()
        } else {
            substitute_style_value(&self.template, &self.values)
        }
    }
}

/// Keyframes of one element keyed by CSS property.
///
/// Properties keep their registration order, which is also the order the engine
/// walks them in. Call [`KeyframeStore::sort`] once all keyframes are registered.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyframeStore {
    styles: IndexMap<String, Vec<Keyframe>>,
}

impl KeyframeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a keyframe to a property's list, creating the list if needed.
    pub fn register_keyframe(
        &mut self,
        property: &str,
        constant: f64,
        parsed: StyleTemplate,
    ) -> Result<()> {
        validate_constant(constant)?;
        self.styles
            .entry(property.to_string())
            .or_default()
            .push(Keyframe::new(constant, parsed));
        Ok(())
    }

    /// Register every declaration of one keyframe attribute at `constant`.
    pub fn register_declarations(&mut self, declarations: &[Declaration], constant: f64) -> Result<()> {
        validate_constant(constant)?;
        for decl in declarations {
            if decl.property.is_empty() || decl.value.is_empty() {
                continue;
            }
            self.register_keyframe(&decl.property, constant, parse_value_template(&decl.value))?;
        }
        Ok(())
    }

    /// Stable ascending sort by constant for every property. Idempotent.
    pub fn sort(&mut self) {
        for frames in self.styles.values_mut() {
            frames.sort_by(|a, b| a.constant.partial_cmp(&b.constant).unwrap_or(Ordering::Equal));
        }
    }

    pub fn get(&self, property: &str) -> Option<&[Keyframe]> {
        self.styles.get(property).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Keyframe])> {
        self.styles.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Largest constant across all properties, if any keyframe exists.
    pub fn max_constant(&self) -> Option<f64> {
        self.styles
            .values()
            .flatten()
            .map(|k| k.constant)
            .fold(None, |acc: Option<f64>, c| Some(acc.map_or(c, |m| m.max(c))))
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

fn validate_constant(constant: f64) -> Result<()> {
    if constant.is_finite() {
        Ok(())
    } else {
        Err(ScrollerError::invalid_percentage(constant))
    }
}
