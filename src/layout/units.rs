//! Physical-to-pixel unit conversion and preview surface geometry.

use crate::template::MIN_DIMENSION_IN;

use super::plate::PlateRect;

/// Reference display density in pixels per inch.
pub const DPI: f32 = 96.0;

/// Points per inch.
pub const PT_PER_IN: f32 = 72.0;

/// Padding around the plate on the preview surface, in pixels.
pub const SURFACE_PAD: f32 = 48.0;

/// Floor applied to the width available for the preview surface.
const MIN_AVAIL_WIDTH: f32 = 360.0;

/// Floor for the inner (plate) area width.
const MIN_INNER_WIDTH: f32 = 200.0;

/// Floor for the inner (plate) area height.
const MIN_INNER_HEIGHT: f32 = 260.0;

/// Inner area height as a fraction of its width.
const INNER_HEIGHT_RATIO: f32 = 0.7;

/// Convert a point size to pixels at the reference density.
pub fn pt_to_px(pt: f32) -> f32 {
    pt * DPI / PT_PER_IN
}

/// Convert inches to pixels at the reference density.
pub fn in_to_px(inches: f32) -> f32 {
    inches * DPI
}

/// Preview surface sized around a scaled plate rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    /// Surface width in pixels (plate plus padding on both sides).
    pub surface_w: f32,
    /// Surface height in pixels.
    pub surface_h: f32,
    /// The plate rectangle, centered on the surface.
    pub rect: PlateRect,
    /// Scale applied to the physical plate size to fit the available area.
    pub scale: f32,
}

/// Compute the preview surface for a plate of the given physical size.
///
/// The plate's pixel size (`inches * DPI`) is scaled uniformly to fit inside
/// an inner area derived from `avail_width`; the scale is uncapped, so small
/// plates grow to fill the area. The surface wraps the scaled plate with
/// [`SURFACE_PAD`] on every side, leaving the plate at `(PAD, PAD)`.
pub fn surface_geometry(width_in: f32, height_in: f32, avail_width: f32) -> SurfaceGeometry {
    let w_in = if width_in.is_finite() {
        width_in.max(MIN_DIMENSION_IN)
    } else {
        MIN_DIMENSION_IN
    };
    let h_in = if height_in.is_finite() {
        height_in.max(MIN_DIMENSION_IN)
    } else {
        MIN_DIMENSION_IN
    };

    let plate_w_px = in_to_px(w_in);
    let plate_h_px = in_to_px(h_in);

    let avail = avail_width.max(MIN_AVAIL_WIDTH);
    let inner_w = (avail - SURFACE_PAD * 2.0).max(MIN_INNER_WIDTH);
    let inner_h = (inner_w * INNER_HEIGHT_RATIO).max(MIN_INNER_HEIGHT);

    let scale = (inner_w / plate_w_px).min(inner_h / plate_h_px);
    let plate_w = plate_w_px * scale;
    let plate_h = plate_h_px * scale;

    let surface_w = plate_w + SURFACE_PAD * 2.0;
    let surface_h = plate_h + SURFACE_PAD * 2.0;

    SurfaceGeometry {
        surface_w,
        surface_h,
        rect: PlateRect {
            x: (surface_w - plate_w) / 2.0,
            y: (surface_h - plate_h) / 2.0,
            w: plate_w,
            h: plate_h,
        },
        scale,
    }
}
