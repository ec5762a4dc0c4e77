//! Shrink-to-fit font sizing.
//!
//! The fit loop never grows a size: a line that already fits keeps its
//! requested size. Oversized lines shrink by a proportional step, at least
//! half a pixel per round, until they fit or hit the 1px floor.

/// Text width measurement, pluggable per typeface.
///
/// Implementations are bound to a concrete font; the layout engine only
/// asks "how wide is this text at this pixel size".
pub trait TextMeasure {
    /// Width in pixels of `text` rendered at `size_px`.
    fn text_width(&self, text: &str, size_px: f32) -> f32;
}

/// Fixed-advance measurement: every character advances by
/// `ratio * size_px` pixels.
///
/// Matches how monospaced bitmap faces measure, and keeps layout tests
/// independent of any real font.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvance {
    pub ratio: f32,
}

impl FixedAdvance {
    /// Advance ratio of the built-in 12x24 bitmap face.
    pub fn builtin() -> Self {
        Self { ratio: 0.5 }
    }
}

impl TextMeasure for FixedAdvance {
    fn text_width(&self, text: &str, size_px: f32) -> f32 {
        text.chars().count() as f32 * self.ratio * size_px
    }
}

/// Shrink `start_px` until `text` fits inside `max_width_px`.
///
/// Returns `start_px` unchanged when the text already fits (never
/// upscales). Otherwise the size drops by
/// `max(0.5, ceil((measured - max_width) / 50))` per round, which converges
/// faster the further the text is over the limit. The result is always at
/// least 1.
pub fn fit_font_size(
    measure: &dyn TextMeasure,
    text: &str,
    start_px: f32,
    max_width_px: f32,
) -> f32 {
    let mut px = start_px.max(1.0);
    let mut width = measure.text_width(text, px);
    if width <= max_width_px {
        return px;
    }
    while width > max_width_px && px > 1.0 {
        let step = ((width - max_width_px) / 50.0).ceil().max(0.5);
        px = (px - step).max(1.0);
        width = measure.text_width(text, px);
    }
    px.max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fitting_text_keeps_size() {
        let measure = FixedAdvance { ratio: 0.5 };
        // "HI" at 30px is 30 wide; plenty of room in 400.
        assert_eq!(fit_font_size(&measure, "HI", 30.0, 400.0), 30.0);
    }

    #[test]
    fn test_never_upscales() {
        let measure = FixedAdvance { ratio: 0.5 };
        // Even when the line would fit at a much larger size.
        assert_eq!(fit_font_size(&measure, "A", 12.0, 1000.0), 12.0);
    }

    #[test]
    fn test_shrinks_until_fit() {
        let measure = FixedAdvance { ratio: 0.5 };
        // 20 chars at 0.5 ratio: width = 10 * px. Fits 100px at px <= 10.
        let text = "ABCDEFGHIJKLMNOPQRST";
        let fitted = fit_font_size(&measure, text, 40.0, 100.0);
        assert!(fitted <= 10.0, "got {}", fitted);
        assert!(measure.text_width(text, fitted) <= 100.0);
    }

    #[test]
    fn test_floor_is_one_pixel() {
        let measure = FixedAdvance { ratio: 0.5 };
        let long = "X".repeat(500);
        // Cannot fit 500 chars into 10px at any size; floor at 1.
        assert_eq!(fit_font_size(&measure, &long, 40.0, 10.0), 1.0);
    }

    #[test]
    fn test_start_below_one_is_floored() {
        let measure = FixedAdvance { ratio: 0.5 };
        assert_eq!(fit_font_size(&measure, "HI", 0.2, 400.0), 1.0);
    }

    #[test]
    fn test_proportional_step_converges_quickly() {
        // Counts measure calls to confirm the big-overflow step is taken.
        struct Counting<'a> {
            inner: &'a FixedAdvance,
            calls: std::cell::Cell<usize>,
        }
        impl TextMeasure for Counting<'_> {
            fn text_width(&self, text: &str, size_px: f32) -> f32 {
                self.calls.set(self.calls.get() + 1);
                self.inner.text_width(text, size_px)
            }
        }

        let measure = Counting {
            inner: &FixedAdvance { ratio: 0.5 },
            calls: std::cell::Cell::new(0),
        };
        let text = "W".repeat(100); // width = 50 * px
        let fitted = fit_font_size(&measure, &text, 100.0, 200.0);
        assert!(fitted <= 4.0);
        // Overflow starts at 4800px; proportional steps get there in far
        // fewer rounds than half-pixel stepping (which would need ~192).
        assert!(measure.calls.get() < 60, "took {} calls", measure.calls.get());
    }

    #[test]
    fn test_result_is_deterministic() {
        let measure = FixedAdvance { ratio: 0.5 };
        let a = fit_font_size(&measure, "REPEATABLE", 29.333, 120.0);
        let b = fit_font_size(&measure, "REPEATABLE", 29.333, 120.0);
        assert_eq!(a, b);
    }
}
