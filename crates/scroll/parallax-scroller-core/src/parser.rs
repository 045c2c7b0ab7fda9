//! Style declaration parsing.
//!
//! Keyframe attributes carry CSS declaration blocks such as
//! `transform: translate(300px, 0) rotate(10deg); opacity: 0`. Parsing happens in
//! two steps:
//! - [`parse_style_block`] splits the block into ordered `(property, value)` pairs;
//! - [`parse_value_template`] turns one value into a [`StyleTemplate`], replacing
//!   every numeric literal with [`PLACEHOLDER`] and collecting the numbers in order.
//!
//! [`substitute_style_value`] performs the inverse and is what the engine uses to
//! write interpolated values back out.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ParsePolicy;
use crate::error::ScrollerError;
use crate::Result;

/// Marker standing in for one numeric literal inside a template.
pub const PLACEHOLDER: &str = "{?}";

static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*(@?[A-Za-z0-9_\-\[\]]+)\s*:\s*([^;\n]+?)\s*(?:;|$)")
        .expect("declaration pattern compiles")
});

static STRICT_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(@?[A-Za-z0-9_\-\[\]]+)\s*:\s*([^\n]+)$")
        .expect("strict declaration pattern compiles")
});

static NUMERIC_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[-+]?[0-9]*\.?[0-9]+(?:e[-+]?[0-9]+)?").expect("numeric pattern compiles")
});

/// One `property: value` pair from a declaration block, both trimmed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// A CSS value with its numeric literals lifted out.
///
/// `values.len()` always equals the number of placeholders in `template`.
/// An empty `values` marks a literal value (`display: none`), used verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleTemplate {
    pub template: String,
    pub values: Vec<f64>,
}

impl StyleTemplate {
    #[inline]
    pub fn is_literal(&self) -> bool {
        self.values.is_empty()
    }

    /// Render the template with its own values.
    pub fn render(&self) -> String {
        if self.is_literal() {
            self.template.clone()
        } else {
            substitute_style_value(&self.template, &self.values)
        }
    }
}

/// Split a declaration block into ordered pairs, dropping malformed fragments.
///
/// A fragment is kept only when it looks like `<identifier> : <non-empty value>`;
/// the identifier may start with `@` and contain dashes and brackets. Doubled or
/// missing trailing semicolons are tolerated.
pub fn parse_style_block(raw: &str) -> Vec<Declaration> {
    DECLARATION
        .captures_iter(raw)
        .filter_map(|caps| {
            let value = caps[2].trim();
            (!value.is_empty()).then(|| Declaration::new(&caps[1], value))
        })
        .collect()
}

/// Same as [`parse_style_block`], but every non-empty fragment must be well formed.
pub fn parse_style_block_strict(raw: &str) -> Result<Vec<Declaration>> {
    let mut out = Vec::new();
    for fragment in raw.split(';').map(str::trim).filter(|f| !f.is_empty()) {
        let caps = STRICT_DECLARATION.captures(fragment).ok_or_else(|| {
            ScrollerError::MalformedDeclaration {
                fragment: fragment.to_string(),
            }
        })?;
        out.push(Declaration::new(&caps[1], caps[2].trim_end()));
    }
    Ok(out)
}

/// Parse a declaration block under the given policy.
pub fn parse_declarations(raw: &str, policy: ParsePolicy) -> Result<Vec<Declaration>> {
    match policy {
        ParsePolicy::Lenient => {
            let declarations = parse_style_block(raw);
            if declarations.is_empty() && !raw.trim().is_empty() {
                log::debug!("no usable declarations in {raw:?}");
            }
            Ok(declarations)
        }
        ParsePolicy::Strict => parse_style_block_strict(raw),
    }
}

/// Extract numeric literals from a CSS value, left to right.
///
/// ```
/// use parallax_scroller_core::parser::parse_value_template;
///
/// let parsed = parse_value_template("translate(300px, 0) rotate(10deg)");
/// assert_eq!(parsed.template, "translate({?}px, {?}) rotate({?}deg)");
/// assert_eq!(parsed.values, vec![300.0, 0.0, 10.0]);
/// ```
pub fn parse_value_template(value: &str) -> StyleTemplate {
    let mut values = Vec::new();
    let template = NUMERIC_LITERAL.replace_all(value, |caps: &regex::Captures<'_>| {
        values.push(caps[0].parse::<f64>().unwrap_or_default());
        PLACEHOLDER
    });
    StyleTemplate {
        template: template.trim().to_string(),
        values,
    }
}

/// Fill placeholders left to right.
///
/// Surplus values are ignored; placeholders without a value stay as they are.
pub fn substitute_style_value(template: &str, values: &[f64]) -> String {
    let mut out = String::with_capacity(template.len() + values.len() * 8);
    let mut rest = template;
    let mut values = values.iter();
    while let Some(idx) = rest.find(PLACEHOLDER) {
        let Some(value) = values.next() else {
            break;
        };
        out.push_str(&rest[..idx]);
        out.push_str(&format_number(*value));
        rest = &rest[idx + PLACEHOLDER.len()..];
    }
    out.push_str(rest);
    out
}

/// Shortest round-trip formatting; negative zero prints as `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
