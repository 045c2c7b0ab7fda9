//! Animated elements built from attribute-annotated source nodes.
//!
//! Markup such as
//!
//! ```text
//! data-scroll="hero"
//! data-0p="transform: translate(0, 0)"
//! data-300p="transform: translate(300px, -100px)"
//! ```
//!
//! becomes an [`AnimatedElement`] named `hero` whose `transform` list holds two
//! keyframes at constants `0` and `3`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Config;
use crate::error::ScrollerError;
use crate::keyframes::KeyframeStore;
use crate::parser::parse_declarations;
use crate::Result;

static KEYFRAME_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data-([0-9]*)p$").expect("attribute pattern compiles"));

/// A discovered node as the host reports it: an opaque handle plus its attributes.
#[derive(Clone, Debug)]
pub struct SourceNode<H> {
    pub handle: H,
    pub attributes: Vec<(String, String)>,
}

impl<H> SourceNode<H> {
    pub fn new<K, V>(handle: H, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            handle,
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Non-empty value of the designation attribute.
    pub fn designation(&self, attribute: &str) -> Option<&str> {
        self.attribute(attribute).filter(|name| !name.is_empty())
    }
}

/// Scroll constant encoded in a `data-<percent>p` attribute name.
///
/// Returns `None` for unrelated attributes. `data-p` matches the pattern but
/// carries no number and is rejected.
pub fn parse_keyframe_attribute(name: &str) -> Option<Result<f64>> {
    let caps = KEYFRAME_ATTRIBUTE.captures(name)?;
    let digits = &caps[1];
    Some(
        digits
            .parse::<f64>()
            .map(|percent| percent / 100.0)
            .map_err(|_| ScrollerError::invalid_percentage(digits)),
    )
}

/// An element under scroll control.
#[derive(Clone, Debug)]
pub struct AnimatedElement<H> {
    /// Unique per session; keys notifications and the checkpoint cache.
    pub name: String,
    pub handle: H,
    pub styles: KeyframeStore,
}

impl<H> AnimatedElement<H> {
    pub fn new(name: impl Into<String>, handle: H) -> Self {
        Self {
            name: name.into(),
            handle,
            styles: KeyframeStore::new(),
        }
    }

    /// Read every keyframe attribute of `node` and sort the result.
    pub fn build(name: impl Into<String>, node: SourceNode<H>, cfg: &Config) -> Result<Self> {
        let mut element = Self::new(name, node.handle);
        for (attr, value) in &node.attributes {
            let Some(constant) = parse_keyframe_attribute(attr) else {
                continue;
            };
            let constant = constant?;
            let declarations = parse_declarations(value, cfg.parse_policy)?;
            element.styles.register_declarations(&declarations, constant)?;
        }
        element.styles.sort();
        Ok(element)
    }

    /// Styles to apply before the first frame: each property whose earliest
    /// keyframe sits at the very top of the page.
    pub fn initial_styles(&self) -> Vec<(&str, String)> {
        self.styles
            .iter()
            .filter_map(|(property, frames)| {
                let first = frames.first()?;
                (first.constant == 0.0).then(|| (property, first.render()))
            })
            .collect()
    }
}
