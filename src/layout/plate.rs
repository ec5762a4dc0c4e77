//! Line stacking and centering on the plate rectangle.

use crate::template::LabelTemplate;

use super::fit::{TextMeasure, fit_font_size};
use super::units::pt_to_px;

/// A rectangle in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl PlateRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }
}

/// Layout tuning knobs with the designer's defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Horizontal padding inside the plate, in pixels.
    pub inner_padding_px: f32,
    /// Gap between lines as a fraction of the FIRST line's final size.
    ///
    /// Pegging the gap to the first line keeps spacing uniform-looking even
    /// when later lines use different sizes. Kept for compatibility with
    /// existing layouts.
    pub line_gap_ratio: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            inner_padding_px: 12.0,
            line_gap_ratio: 0.22,
        }
    }
}

/// One laid-out text line.
///
/// `x`/`y` are the center of the line's glyph box: text is drawn centered
/// horizontally around `x` with its vertical midline at `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    /// Final font size in pixels after fitting.
    pub size_px: f32,
    pub x: f32,
    pub y: f32,
}

/// The computed plate: rectangle, corner radius and placed lines.
///
/// Ephemeral by design; recomputed on every input change, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPlate {
    pub rect: PlateRect,
    /// 0 for squared corners.
    pub corner_radius: f32,
    pub lines: Vec<PlacedLine>,
    /// Sum of final line sizes plus inter-line gaps.
    pub text_block_height: f32,
}

/// Lay out a template's lines inside `rect`.
///
/// Blank lines (empty after trimming) are dropped together with their sizes
/// before any fitting happens, so they reserve no space. Each remaining line
/// is independently shrunk to the usable width, then the block is centered
/// vertically with gaps pegged to the first line's final size.
pub fn layout_plate(
    template: &LabelTemplate,
    rect: PlateRect,
    options: &LayoutOptions,
    measure: &dyn TextMeasure,
) -> RenderedPlate {
    let corner_radius = template.corners.radius(rect.w, rect.h);

    // Trim and drop blanks, keeping each survivor paired with its own size.
    let visible: Vec<(&str, f32)> = template
        .lines
        .iter()
        .map(|line| (line.text.trim(), line.size_pt))
        .filter(|(text, _)| !text.is_empty())
        .collect();

    if visible.is_empty() {
        return RenderedPlate {
            rect,
            corner_radius,
            lines: Vec::new(),
            text_block_height: 0.0,
        };
    }

    let max_width = (rect.w - 2.0 * options.inner_padding_px).max(1.0);

    let final_px: Vec<f32> = visible
        .iter()
        .map(|(text, size_pt)| fit_font_size(measure, text, pt_to_px(*size_pt), max_width))
        .collect();

    let gap = final_px[0] * options.line_gap_ratio;
    let total_height: f32 =
        final_px.iter().sum::<f32>() + (final_px.len() as f32 - 1.0) * gap;

    let cx = rect.center_x();
    let mut y = rect.y + (rect.h - total_height) / 2.0 + final_px[0] / 2.0;

    let lines = visible
        .iter()
        .zip(final_px.iter())
        .map(|((text, _), &size_px)| {
            let placed = PlacedLine {
                text: (*text).to_string(),
                size_px,
                x: cx,
                y,
            };
            y += size_px + gap;
            placed
        })
        .collect();

    RenderedPlate {
        rect,
        corner_radius,
        lines,
        text_block_height: total_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fit::FixedAdvance;
    use crate::template::{CornerStyle, LineSpec};
    use pretty_assertions::assert_eq;

    fn template_with_lines(lines: Vec<LineSpec>) -> LabelTemplate {
        LabelTemplate {
            lines,
            ..Default::default()
        }
    }

    #[test]
    fn test_single_line_centered() {
        let template = template_with_lines(vec![LineSpec::new("JOHN DOE", 22.0)]);
        let rect = PlateRect::new(48.0, 48.0, 480.0, 144.0);
        let plate = layout_plate(
            &template,
            rect,
            &LayoutOptions::default(),
            &FixedAdvance::builtin(),
        );

        assert_eq!(plate.lines.len(), 1);
        let line = &plate.lines[0];
        // 22pt -> 29.33px; 8 chars at 0.5 ratio = 117px wide, fits 456.
        assert!((line.size_px - 29.333_334).abs() < 1e-3);
        assert_eq!(line.x, 288.0);
        // Single line: block height = size, center y = rect middle.
        assert!((plate.text_block_height - line.size_px).abs() < 1e-4);
        assert!((line.y - (48.0 + 144.0 / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn test_block_height_formula() {
        let template = template_with_lines(vec![
            LineSpec::new("ONE", 22.0),
            LineSpec::new("TWO", 18.0),
            LineSpec::new("THREE", 14.0),
        ]);
        let rect = PlateRect::new(0.0, 0.0, 480.0, 300.0);
        let options = LayoutOptions::default();
        let plate = layout_plate(&template, rect, &options, &FixedAdvance::builtin());

        let sizes: Vec<f32> = plate.lines.iter().map(|l| l.size_px).collect();
        let expected =
            sizes.iter().sum::<f32>() + 2.0 * sizes[0] * options.line_gap_ratio;
        assert!((plate.text_block_height - expected).abs() < 1e-4);

        // First line center per the formula.
        let first_y = (300.0 - expected) / 2.0 + sizes[0] / 2.0;
        assert!((plate.lines[0].y - first_y).abs() < 1e-4);

        // Each following line advances by its predecessor's size plus the
        // first-line-pegged gap.
        let gap = sizes[0] * options.line_gap_ratio;
        assert!((plate.lines[1].y - (plate.lines[0].y + sizes[0] + gap)).abs() < 1e-4);
        assert!((plate.lines[2].y - (plate.lines[1].y + sizes[1] + gap)).abs() < 1e-4);
    }

    #[test]
    fn test_blank_lines_reserve_no_space() {
        let with_blanks = template_with_lines(vec![
            LineSpec::new("TOP", 22.0),
            LineSpec::new("   ", 28.0),
            LineSpec::new("", 28.0),
            LineSpec::new("BOTTOM", 22.0),
        ]);
        let without_blanks = template_with_lines(vec![
            LineSpec::new("TOP", 22.0),
            LineSpec::new("BOTTOM", 22.0),
        ]);
        let rect = PlateRect::new(0.0, 0.0, 480.0, 144.0);
        let options = LayoutOptions::default();
        let measure = FixedAdvance::builtin();

        let a = layout_plate(&with_blanks, rect, &options, &measure);
        let b = layout_plate(&without_blanks, rect, &options, &measure);
        assert_eq!(a, b);
    }

    #[test]
    fn test_blank_line_sizes_do_not_leak() {
        // The blank 28pt line must not shift sizing of the lines around it:
        // each visible line keeps its own paired size.
        let template = template_with_lines(vec![
            LineSpec::new("  ", 28.0),
            LineSpec::new("NAME", 14.0),
        ]);
        let rect = PlateRect::new(0.0, 0.0, 480.0, 144.0);
        let plate = layout_plate(
            &template,
            rect,
            &LayoutOptions::default(),
            &FixedAdvance::builtin(),
        );
        assert_eq!(plate.lines.len(), 1);
        assert!((plate.lines[0].size_px - pt_to_px(14.0)).abs() < 1e-4);
    }

    #[test]
    fn test_all_blank_yields_empty_plate() {
        let template = template_with_lines(vec![LineSpec::new("   ", 22.0)]);
        let rect = PlateRect::new(10.0, 10.0, 100.0, 50.0);
        let plate = layout_plate(
            &template,
            rect,
            &LayoutOptions::default(),
            &FixedAdvance::builtin(),
        );
        assert!(plate.lines.is_empty());
        assert_eq!(plate.text_block_height, 0.0);
        assert_eq!(plate.rect, rect);
    }

    #[test]
    fn test_narrow_plate_shrinks_line() {
        let template = template_with_lines(vec![LineSpec::new("A VERY LONG NAME LINE", 28.0)]);
        // 21 chars at 0.5 ratio: fits 96px usable width only below ~9.1px.
        let rect = PlateRect::new(0.0, 0.0, 120.0, 60.0);
        let measure = FixedAdvance::builtin();
        let plate = layout_plate(&template, rect, &LayoutOptions::default(), &measure);

        let line = &plate.lines[0];
        assert!(line.size_px < pt_to_px(28.0));
        assert!(line.size_px >= 1.0);
        assert!(measure.text_width(&line.text, line.size_px) <= 96.0);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let template = template_with_lines(vec![
            LineSpec::new("ALPHA", 24.0),
            LineSpec::new("BETA", 16.0),
        ]);
        let rect = PlateRect::new(48.0, 48.0, 300.0, 200.0);
        let options = LayoutOptions::default();
        let measure = FixedAdvance::builtin();

        let a = layout_plate(&template, rect, &options, &measure);
        let b = layout_plate(&template, rect, &options, &measure);
        assert_eq!(a, b);
    }

    #[test]
    fn test_rounded_corner_radius() {
        let template = LabelTemplate {
            corners: CornerStyle::Rounded,
            ..template_with_lines(vec![LineSpec::new("X", 22.0)])
        };
        let rect = PlateRect::new(0.0, 0.0, 480.0, 144.0);
        let plate = layout_plate(
            &template,
            rect,
            &LayoutOptions::default(),
            &FixedAdvance::builtin(),
        );
        assert!((plate.corner_radius - 144.0 * 0.06).abs() < 1e-4);
    }

    #[test]
    fn test_trimmed_text_is_drawn() {
        let template = template_with_lines(vec![LineSpec::new("  PADDED  ", 22.0)]);
        let rect = PlateRect::new(0.0, 0.0, 480.0, 144.0);
        let plate = layout_plate(
            &template,
            rect,
            &LayoutOptions::default(),
            &FixedAdvance::builtin(),
        );
        assert_eq!(plate.lines[0].text, "PADDED");
    }
}
