//! Scroll driver: page scroll fraction and per-frame change detection.

/// Fraction of the scrollable page that has been scrolled.
///
/// `0` when the document cannot scroll. Not clamped: overscroll may report
/// slightly outside `[0, 1]`.
pub fn page_scroll_fraction(scroll_offset: f64, scroll_extent: f64, client_height: f64) -> f64 {
    let height = scroll_extent - client_height;
    if height > 0.0 {
        scroll_offset / height
    } else {
        0.0
    }
}

/// Remembers the last rendered fraction so idle frames do no element work.
#[derive(Clone, Debug, Default)]
pub struct ScrollDriver {
    last_fraction: Option<f64>,
}

impl ScrollDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `fraction` differs from the last committed one.
    #[inline]
    pub fn should_render(&self, fraction: f64) -> bool {
        self.last_fraction != Some(fraction)
    }

    /// Record a fraction once every element has been evaluated at it.
    #[inline]
    pub fn commit(&mut self, fraction: f64) {
        self.last_fraction = Some(fraction);
    }

    pub fn last_fraction(&self) -> Option<f64> {
        self.last_fraction
    }

    /// Force the next frame to render.
    pub fn reset(&mut self) {
        self.last_fraction = None;
    }
}
