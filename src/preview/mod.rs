//! # Plate Preview Renderer
//!
//! Renders a label template to an RGBA raster the way the designer's canvas
//! does: plate rectangle filled with the palette background (optionally
//! rounded), text lines fitted and centered by the layout engine, all
//! wrapped in a padded surface.
//!
//! ## Architecture
//!
//! ```text
//! LabelTemplate → surface_geometry() → layout_plate() → RgbaImage
//!                                                          ↓
//!                                              PNG bytes / data URI
//! ```
//!
//! The surface outside the plate stays transparent, matching the cleared
//! canvas around the drawn plate.

mod font;

pub use font::{BUILTIN_ADVANCE_RATIO, Typeface};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, Rgba, RgbaImage};

use crate::error::PlacaError;
use crate::layout::{LayoutOptions, PlateRect, RenderedPlate, layout_plate, surface_geometry};
use crate::template::LabelTemplate;

/// Preview rendering options.
#[derive(Debug, Clone, Copy)]
pub struct PreviewOptions {
    /// Width available for the surface, in CSS pixels.
    pub avail_width: f32,
    /// HiDPI multiplier applied to the raster output.
    pub device_pixel_ratio: f32,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        // 576px of available width renders a 5" x 1.5" plate at scale 1.
        Self {
            avail_width: 576.0,
            device_pixel_ratio: 1.0,
        }
    }
}

/// Render a template to an RGBA raster.
///
/// Geometry is computed in CSS pixels and multiplied by the device pixel
/// ratio at draw time, so glyphs rasterize at full output resolution.
pub fn render_plate_image(
    template: &LabelTemplate,
    typeface: &Typeface,
    options: &PreviewOptions,
) -> RgbaImage {
    let geometry = surface_geometry(template.width_in, template.height_in, options.avail_width);
    let plate = layout_plate(template, geometry.rect, &LayoutOptions::default(), typeface);

    let dpr = options.device_pixel_ratio.max(0.1);
    let width = (geometry.surface_w * dpr).round().max(1.0) as u32;
    let height = (geometry.surface_h * dpr).round().max(1.0) as u32;

    let mut img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));

    let palette = template.palette();
    fill_plate(&mut img, &plate, palette.bg_rgb(), dpr);
    draw_lines(&mut img, &plate, typeface, palette.fg_rgb(), dpr);

    img
}

/// Render a template straight to PNG bytes.
pub fn render_plate_png(
    template: &LabelTemplate,
    typeface: &Typeface,
    options: &PreviewOptions,
) -> Result<Vec<u8>, PlacaError> {
    let img = render_plate_image(template, typeface, options);
    encode_png(&img)
}

/// Render a template to a `data:image/png;base64,...` URI for embedding.
pub fn render_plate_data_uri(
    template: &LabelTemplate,
    typeface: &Typeface,
    options: &PreviewOptions,
) -> Result<String, PlacaError> {
    let png = render_plate_png(template, typeface, options)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}

/// Encode an RGBA raster as PNG.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, PlacaError> {
    let mut png_bytes = Vec::new();
    let encoder = PngEncoder::new(&mut png_bytes);
    encoder
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| PlacaError::Image(format!("PNG encode failed: {}", e)))?;
    Ok(png_bytes)
}

/// Fill the plate rectangle, honoring the corner radius.
fn fill_plate(img: &mut RgbaImage, plate: &RenderedPlate, bg: [u8; 3], dpr: f32) {
    let rect = plate.rect;
    let x0 = (rect.x * dpr).floor().max(0.0) as u32;
    let y0 = (rect.y * dpr).floor().max(0.0) as u32;
    let x1 = (((rect.x + rect.w) * dpr).ceil() as u32).min(img.width());
    let y1 = (((rect.y + rect.h) * dpr).ceil() as u32).min(img.height());

    for py in y0..y1 {
        for px in x0..x1 {
            // Sample at the pixel center, in CSS coordinates.
            let cx = (px as f32 + 0.5) / dpr;
            let cy = (py as f32 + 0.5) / dpr;
            if inside_rounded_rect(cx, cy, &rect, plate.corner_radius) {
                img.put_pixel(px, py, Rgba([bg[0], bg[1], bg[2], 255]));
            }
        }
    }
}

/// Point-in-rounded-rectangle test.
///
/// Clamping the point into the radius-inset inner box reduces every case to
/// a single distance check: interior points collapse to themselves and
/// corner points measure against the nearest arc center.
fn inside_rounded_rect(x: f32, y: f32, rect: &PlateRect, radius: f32) -> bool {
    if x < rect.x || x > rect.x + rect.w || y < rect.y || y > rect.y + rect.h {
        return false;
    }
    if radius <= 0.0 {
        return true;
    }
    let r = radius.min(rect.w / 2.0).min(rect.h / 2.0);
    let ax = x.clamp(rect.x + r, rect.x + rect.w - r);
    let ay = y.clamp(rect.y + r, rect.y + rect.h - r);
    let dx = x - ax;
    let dy = y - ay;
    dx * dx + dy * dy <= r * r
}

/// Draw the laid-out lines in the foreground color.
fn draw_lines(
    img: &mut RgbaImage,
    plate: &RenderedPlate,
    typeface: &Typeface,
    fg: [u8; 3],
    dpr: f32,
) {
    let (width, height) = (img.width() as i32, img.height() as i32);
    for line in &plate.lines {
        typeface.draw_text(
            &line.text,
            line.x * dpr,
            line.y * dpr,
            line.size_px * dpr,
            |x, y, coverage| {
                if x >= 0 && x < width && y >= 0 && y < height {
                    blend_pixel(img, x as u32, y as u32, fg, coverage);
                }
            },
        );
    }
}

/// Source-over blend of `rgb` at `coverage` opacity onto one pixel.
fn blend_pixel(img: &mut RgbaImage, x: u32, y: u32, rgb: [u8; 3], coverage: f32) {
    let c = coverage.clamp(0.0, 1.0);
    if c <= 0.0 {
        return;
    }
    let dst = img.get_pixel_mut(x, y);
    for i in 0..3 {
        dst[i] = (rgb[i] as f32 * c + dst[i] as f32 * (1.0 - c)).round() as u8;
    }
    dst[3] = (255.0 * c + dst[3] as f32 * (1.0 - c)).round() as u8;
}
