//! Typefaces for plate preview rendering.
//!
//! Two backends sit behind one measurement/drawing surface: the built-in
//! Spleen bitmap faces (always available, fully deterministic) and an
//! optional TrueType font loaded at runtime for smoother previews.
//!
//! The built-in faces are monospaced at a 1:2 aspect, so measurement is
//! exact: every character advances by half the pixel height. Glyphs are
//! scaled from the 12x24 face (or 6x12 below 16px) with nearest neighbor.

use ab_glyph::{Font, FontArc, ScaleFont};
use spleen_font::{FONT_6X12, FONT_12X24, PSF2Font};
use std::path::Path;

use crate::error::PlacaError;
use crate::layout::TextMeasure;

/// Advance width as a fraction of pixel height for the built-in faces.
pub const BUILTIN_ADVANCE_RATIO: f32 = 0.5;

/// Below this pixel height the 6x12 face scales better than 12x24.
const SMALL_FACE_THRESHOLD: f32 = 16.0;

/// A measurement and glyph source for preview rendering.
#[derive(Debug, Clone)]
pub enum Typeface {
    /// Built-in Spleen bitmap faces.
    Builtin,
    /// A runtime-loaded TrueType font.
    Ttf(FontArc),
}

impl Typeface {
    pub fn builtin() -> Self {
        Typeface::Builtin
    }

    /// Parse a TrueType font from raw bytes.
    pub fn from_ttf_bytes(bytes: Vec<u8>) -> Result<Self, PlacaError> {
        FontArc::try_from_vec(bytes)
            .map(Typeface::Ttf)
            .map_err(|e| PlacaError::Font(format!("Failed to parse TTF: {}", e)))
    }

    /// Load a TrueType font from a file.
    pub fn load_ttf(path: &Path) -> Result<Self, PlacaError> {
        let bytes = std::fs::read(path)?;
        Self::from_ttf_bytes(bytes)
    }

    /// Draw `text` centered at (`cx`, `cy`) with glyph height `size_px`.
    ///
    /// Calls `plot(x, y, coverage)` for each covered pixel; coverage is 1.0
    /// for bitmap glyphs and anti-aliased 0..1 for TTF glyphs. Coordinates
    /// may fall outside the target surface; the caller clips.
    pub fn draw_text<F>(&self, text: &str, cx: f32, cy: f32, size_px: f32, mut plot: F)
    where
        F: FnMut(i32, i32, f32),
    {
        match self {
            Typeface::Builtin => draw_bitmap_text(text, cx, cy, size_px, &mut plot),
            Typeface::Ttf(font) => draw_ttf_text(font, text, cx, cy, size_px, &mut plot),
        }
    }
}

impl TextMeasure for Typeface {
    fn text_width(&self, text: &str, size_px: f32) -> f32 {
        match self {
            Typeface::Builtin => text.chars().count() as f32 * size_px * BUILTIN_ADVANCE_RATIO,
            Typeface::Ttf(font) => {
                let scaled = font.as_scaled(size_px);
                text.chars()
                    .map(|ch| scaled.h_advance(font.glyph_id(ch)))
                    .sum()
            }
        }
    }
}

/// Collect one glyph from the appropriate Spleen face as a 0/1 bitmap.
fn base_bitmap(ch: char, small: bool) -> (Vec<u8>, usize, usize) {
    let utf8 = ch.to_string();
    if small {
        let (w, h) = (6usize, 12usize);
        let mut bits = vec![0u8; w * h];
        let mut face = PSF2Font::new(FONT_6X12).unwrap();
        match face.glyph_for_utf8(utf8.as_bytes()) {
            Some(glyph) => {
                for (y, row) in glyph.enumerate() {
                    for (x, on) in row.enumerate() {
                        if y < h && x < w {
                            bits[y * w + x] = on as u8;
                        }
                    }
                }
            }
            None => draw_box(&mut bits, w, h),
        }
        (bits, w, h)
    } else {
        let (w, h) = (12usize, 24usize);
        let mut bits = vec![0u8; w * h];
        let mut face = PSF2Font::new(FONT_12X24).unwrap();
        match face.glyph_for_utf8(utf8.as_bytes()) {
            Some(glyph) => {
                for (y, row) in glyph.enumerate() {
                    for (x, on) in row.enumerate() {
                        if y < h && x < w {
                            bits[y * w + x] = on as u8;
                        }
                    }
                }
            }
            None => draw_box(&mut bits, w, h),
        }
        (bits, w, h)
    }
}

/// Draw a box outline for characters the face doesn't cover.
fn draw_box(bits: &mut [u8], width: usize, height: usize) {
    for x in 0..width {
        bits[x] = 1;
        bits[(height - 1) * width + x] = 1;
    }
    for y in 0..height {
        bits[y * width] = 1;
        bits[y * width + width - 1] = 1;
    }
}

fn draw_bitmap_text<F>(text: &str, cx: f32, cy: f32, size_px: f32, plot: &mut F)
where
    F: FnMut(i32, i32, f32),
{
    let cell_h = size_px.round().max(1.0) as usize;
    let cell_w = (size_px * BUILTIN_ADVANCE_RATIO).round().max(1.0) as usize;
    let count = text.chars().count();
    if count == 0 {
        return;
    }

    let total_w = (cell_w * count) as f32;
    let left = (cx - total_w / 2.0).round() as i32;
    let top = (cy - cell_h as f32 / 2.0).round() as i32;
    let small = size_px < SMALL_FACE_THRESHOLD;

    for (i, ch) in text.chars().enumerate() {
        let (bits, base_w, base_h) = base_bitmap(ch, small);
        let cell_x = left + (i * cell_w) as i32;
        // Nearest-neighbor scale from the base face into the cell.
        for dy in 0..cell_h {
            let sy = dy * base_h / cell_h;
            for dx in 0..cell_w {
                let sx = dx * base_w / cell_w;
                if bits[sy * base_w + sx] != 0 {
                    plot(cell_x + dx as i32, top + dy as i32, 1.0);
                }
            }
        }
    }
}

fn draw_ttf_text<F>(font: &FontArc, text: &str, cx: f32, cy: f32, size_px: f32, plot: &mut F)
where
    F: FnMut(i32, i32, f32),
{
    let scaled = font.as_scaled(size_px);

    // Layout: compute glyph positions relative to a zero caret.
    let mut glyphs = Vec::new();
    let mut caret = 0.0f32;
    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        glyphs.push((glyph_id, caret));
        caret += scaled.h_advance(glyph_id);
    }

    let left = cx - caret / 2.0;
    // Position the baseline so the ascent..descent box is centered on cy.
    let ascent = scaled.ascent();
    let descent = scaled.descent();
    let baseline = cy + (ascent + descent) / 2.0;

    for (glyph_id, glyph_x) in glyphs {
        let glyph = glyph_id
            .with_scale_and_position(size_px, ab_glyph::point(left + glyph_x, baseline));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                plot(
                    px as i32 + bounds.min.x as i32,
                    py as i32 + bounds.min.y as i32,
                    coverage,
                );
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_measure_is_fixed_advance() {
        let face = Typeface::builtin();
        assert_eq!(face.text_width("JOHN DOE", 24.0), 8.0 * 12.0);
        assert_eq!(face.text_width("", 24.0), 0.0);
    }

    #[test]
    fn test_base_bitmap_has_ink() {
        let (bits, w, h) = base_bitmap('A', false);
        assert_eq!(bits.len(), w * h);
        assert!(bits.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_unknown_char_falls_back_to_box() {
        // A codepoint far outside the face's coverage.
        let (bits, w, _h) = base_bitmap('\u{10FFFF}', false);
        // Box outline: the top-left corner pixel is set.
        assert_eq!(bits[0], 1);
        assert_eq!(bits[w - 1], 1);
    }

    #[test]
    fn test_draw_centers_on_target() {
        let face = Typeface::builtin();
        let mut min_x = i32::MAX;
        let mut max_x = i32::MIN;
        face.draw_text("HH", 100.0, 50.0, 24.0, |x, _y, _c| {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
        });
        // Two 12px cells centered at x=100: ink stays within [88, 112).
        assert!(min_x >= 88, "min_x = {}", min_x);
        assert!(max_x < 112, "max_x = {}", max_x);
    }

    #[test]
    fn test_small_sizes_still_plot() {
        let face = Typeface::builtin();
        let mut plotted = 0usize;
        face.draw_text("A", 10.0, 10.0, 8.0, |_x, _y, _c| plotted += 1);
        assert!(plotted > 0);
    }
}
