//! Interpolation & checkpoint engine.
//!
//! For every property of an element the engine walks consecutive keyframe pairs
//! (a [`Tweening`]) and:
//! - writes the CSS value for the pair bracketing the current scroll point
//!   (linear interpolation for numeric values, step for literals);
//! - reports the first keyframe boundary crossed since the previous evaluation
//!   of the same element, forward or backward.
//!
//! The walk for a property stops at the first pair whose style is "applied",
//! which with ascending keyframes is the most recently reached region.

use hashbrown::HashMap;

use crate::element::AnimatedElement;
use crate::error::ScrollerError;
use crate::keyframes::Keyframe;
use crate::outputs::{Outputs, ScrollEvent, ScrollStage, StyleChange};
use crate::parser::substitute_style_value;
use crate::Result;

/// Last absolute scroll point per element name.
///
/// A missing entry reads as negative infinity: the element has seen nothing yet.
#[derive(Clone, Debug, Default)]
pub struct CheckpointCache {
    points: HashMap<String, f64>,
}

impl CheckpointCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, name: &str) -> f64 {
        self.points.get(name).copied().unwrap_or(f64::NEG_INFINITY)
    }

    pub fn record(&mut self, name: &str, point: f64) {
        match self.points.get_mut(name) {
            Some(slot) => *slot = point,
            None => {
                self.points.insert(name.to_string(), point);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.points.contains_key(name)
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Geometry an evaluation needs from the session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    pub viewport_height: f64,
    /// `max_constant * viewport_height`; scroll fractions are scaled by this.
    pub full_view_height: f64,
}

/// Consecutive keyframes of one property; `to` is absent for the last one.
#[derive(Clone, Copy, Debug)]
pub struct Tweening<'a> {
    pub from: &'a Keyframe,
    pub to: Option<&'a Keyframe>,
}

/// Result of trying one tweening at one point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameStyle {
    /// Value to write, if any.
    pub value: Option<String>,
    /// Whether this pair owns the current point; ends the walk for the property.
    pub applied: bool,
}

impl FrameStyle {
    fn skipped() -> Self {
        Self::default()
    }

    fn write(value: String, applied: bool) -> Self {
        Self {
            value: Some(value),
            applied,
        }
    }
}

#[inline]
pub fn interpolate(from: f64, to: f64, progress: f64) -> f64 {
    from + (to - from) * progress
}

/// Progress of `point` between two windows, clamped to `[0, 1]`.
pub fn relative_progress(point: f64, from_window: f64, to_window: f64) -> f64 {
    if point >= to_window {
        1.0
    } else if from_window <= point && point <= to_window {
        (point - from_window) / (to_window - from_window)
    } else {
        0.0
    }
}

pub fn interpolate_values(from: &[f64], to: &[f64], progress: f64) -> Vec<f64> {
    from.iter()
        .zip(to)
        .map(|(a, b)| interpolate(*a, *b, progress))
        .collect()
}

/// Style for `point` within a tweening, without the bracket test.
pub fn frame_style(
    property: &str,
    point: f64,
    tweening: Tweening<'_>,
    viewport_height: f64,
) -> Result<FrameStyle> {
    let Tweening { from, to } = tweening;
    let from_window = from.window(viewport_height);

    let Some(to) = to else {
        if point >= from_window {
            return Ok(FrameStyle::write(from.render(), true));
        }
        return Ok(FrameStyle::skipped());
    };
    let to_window = to.window(viewport_height);

    if !from.is_literal() && !to.is_literal() {
        if from.values.len() != to.values.len() {
            return Err(ScrollerError::StyleMismatch {
                property: property.to_string(),
                from_len: from.values.len(),
                to_len: to.values.len(),
            });
        }
        let progress = relative_progress(point, from_window, to_window);
        let values = interpolate_values(&from.values, &to.values, progress);
        let applied = point >= from_window && point <= to_window;
        return Ok(FrameStyle::write(
            substitute_style_value(&to.template, &values),
            applied,
        ));
    }

    // Step semantics. A numeric side facing a literal one is rendered with its own
    // values instead of writing its raw `{?}` template; this deviation is intentional.
    if point >= to_window {
        Ok(FrameStyle::write(to.render(), true))
    } else if point >= from_window {
        Ok(FrameStyle::write(from.render(), true))
    } else {
        Ok(FrameStyle::skipped())
    }
}

/// [`frame_style`] guarded by the bracket test: a pair is left alone when both the
/// previous and current points lie before it, or both lie at/after its end.
pub fn apply_frame_style(
    property: &str,
    point: f64,
    previous: f64,
    tweening: Tweening<'_>,
    viewport_height: f64,
) -> Result<FrameStyle> {
    let from_window = tweening.from.window(viewport_height);
    let to_window = tweening.to.map(|to| to.window(viewport_height));

    let both_before = point < from_window && previous < from_window;
    let both_after = to_window.is_some_and(|w| point >= w && previous >= w);
    if both_before || both_after {
        return Ok(FrameStyle::skipped());
    }
    frame_style(property, point, tweening, viewport_height)
}

/// Boundary crossed between `previous` and `point`, as `(constant, stage)`.
///
/// The `from` boundary is checked before the `to` boundary.
pub fn checkpoint_crossing(
    point: f64,
    previous: f64,
    tweening: Tweening<'_>,
    viewport_height: f64,
) -> Option<(f64, ScrollStage)> {
    let crossing = |keyframe: &Keyframe| {
        let window = keyframe.window(viewport_height);
        if point >= window && previous < window {
            Some((keyframe.constant, ScrollStage::ScrollForward))
        } else if point <= window && previous > window {
            Some((keyframe.constant, ScrollStage::ScrollBackward))
        } else {
            None
        }
    };
    crossing(tweening.from).or_else(|| tweening.to.and_then(crossing))
}

/// Evaluates elements against scroll fractions and remembers where each one was.
#[derive(Debug, Default)]
pub struct Engine {
    points: CheckpointCache,
    outputs: Outputs,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously recorded points, e.g. those of a replaced session.
    pub fn with_points(points: CheckpointCache) -> Self {
        Self {
            points,
            outputs: Outputs::default(),
        }
    }

    /// Hand the recorded points over, leaving this engine with an empty cache.
    pub fn take_points(&mut self) -> CheckpointCache {
        std::mem::take(&mut self.points)
    }

    pub fn points(&self) -> &CheckpointCache {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut CheckpointCache {
        &mut self.points
    }

    /// Outputs of the latest evaluation, including partial output of a failed one.
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Evaluate one element at `percent` of the full view height.
    ///
    /// `index` is echoed in the produced [`StyleChange`]s. At most one checkpoint
    /// event is produced per call. An unchanged point produces nothing.
    pub fn evaluate<H>(
        &mut self,
        index: usize,
        element: &AnimatedElement<H>,
        percent: f64,
        ctx: FrameContext,
    ) -> Result<&Outputs> {
        self.outputs.clear();

        let point = percent * ctx.full_view_height;
        let name = element.name.as_str();
        let previous = self.points.get(name);
        if point == previous {
            return Ok(&self.outputs);
        }

        let mut notified = false;
        for (property, frames) in element.styles.iter() {
            for (i, from) in frames.iter().enumerate() {
                let tweening = Tweening {
                    from,
                    to: frames.get(i + 1),
                };
                let style =
                    apply_frame_style(property, point, previous, tweening, ctx.viewport_height)?;
                if let Some(value) = style.value {
                    self.outputs.push_change(StyleChange {
                        element: index,
                        property: property.to_string(),
                        value,
                    });
                }

                if !notified {
                    if let Some((constant, stage)) =
                        checkpoint_crossing(point, previous, tweening, ctx.viewport_height)
                    {
                        self.outputs
                            .push_event(ScrollEvent::checkpoint(name, constant, stage));
                        notified = true;
                    }
                }

                if style.applied {
                    break;
                }
            }
        }

        self.points.record(name, point);
        Ok(&self.outputs)
    }
}
