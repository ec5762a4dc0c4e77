//! # Label Template Model
//!
//! The value object shared by both layout engines: physical plate dimensions,
//! a named color palette, corner style, font family and 1..6 text lines with
//! per-line point sizes.
//!
//! The serde shape mirrors the saved-entry format produced by the designer
//! frontend (`variant: "nameplate"`, `sizeName`, `lines: [{text, pt}]`), and
//! parsing is deliberately tolerant: dimensions accept numbers or numeric
//! strings, missing quantity defaults to 1, and unknown palette names keep
//! any supplied bg/fg colors.

use serde::{Deserialize, Serialize};

use crate::error::PlacaError;

/// Minimum number of text lines on a plate.
pub const MIN_LINES: usize = 1;
/// Maximum number of text lines on a plate.
pub const MAX_LINES: usize = 6;
/// Floor for plate dimensions in inches.
pub const MIN_DIMENSION_IN: f32 = 0.1;
/// Point sizes offered by the designer, largest first.
pub const ALLOWED_SIZES_PT: [f32; 8] = [28.0, 24.0, 22.0, 20.0, 18.0, 16.0, 14.0, 12.0];
/// Default point size for a new line.
pub const DEFAULT_SIZE_PT: f32 = 22.0;
/// Default font stack.
pub const DEFAULT_FONT: &str = "Calibri, Arial, Helvetica, sans-serif";
/// Rounded corner radius as a fraction of the shorter plate side.
pub const CORNER_RADIUS_RATIO: f32 = 0.06;

/// The eight offered palettes as (name, background, foreground) hex triples.
const PALETTE_TABLE: [(&str, &str, &str); 8] = [
    ("Green/White", "#008000", "#ffffff"),
    ("Red/White", "#cc0000", "#ffffff"),
    ("Yellow/Black", "#ffd500", "#000000"),
    ("Blue/White", "#0057d9", "#ffffff"),
    ("Black/White", "#000000", "#ffffff"),
    ("White/Black", "#ffffff", "#000000"),
    ("Orange/Black", "#ff7a00", "#000000"),
    ("Gray/Black", "#808080", "#000000"),
];

/// A named background/foreground color pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub name: String,
    /// Background hex color, e.g. "#008000".
    pub bg: String,
    /// Foreground (glyph) hex color.
    pub fg: String,
}

impl ColorPalette {
    /// Look up one of the eight offered palettes by name.
    pub fn by_name(name: &str) -> Option<ColorPalette> {
        PALETTE_TABLE
            .iter()
            .find(|(n, _, _)| *n == name)
            .map(|(n, bg, fg)| ColorPalette {
                name: (*n).to_string(),
                bg: (*bg).to_string(),
                fg: (*fg).to_string(),
            })
    }

    /// All offered palette names, in menu order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        PALETTE_TABLE.iter().map(|(n, _, _)| *n)
    }

    /// Background color as RGB bytes (white when unparseable).
    pub fn bg_rgb(&self) -> [u8; 3] {
        parse_hex_color(&self.bg).unwrap_or([255, 255, 255])
    }

    /// Foreground color as RGB bytes (black when unparseable).
    pub fn fg_rgb(&self) -> [u8; 3] {
        parse_hex_color(&self.fg).unwrap_or([0, 0, 0])
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        ColorPalette::by_name("Green/White").unwrap()
    }
}

/// Parse a `#rrggbb` or `#rgb` hex color.
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.trim().strip_prefix('#')?;
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some([r, g, b])
        }
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
            let r = digit(0)?;
            let g = digit(1)?;
            let b = digit(2)?;
            Some([r * 17, g * 17, b * 17])
        }
        _ => None,
    }
}

/// Corner treatment for the plate rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CornerStyle {
    #[default]
    Squared,
    Rounded,
}

impl CornerStyle {
    /// Corner radius in the same units as the given plate dimensions.
    pub fn radius(self, plate_w: f32, plate_h: f32) -> f32 {
        match self {
            CornerStyle::Squared => 0.0,
            CornerStyle::Rounded => plate_w.min(plate_h) * CORNER_RADIUS_RATIO,
        }
    }
}

/// One text line with its requested point size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSpec {
    #[serde(default)]
    pub text: String,
    /// Requested size in points ("pt" on the wire).
    #[serde(rename = "pt", default = "default_size_pt")]
    pub size_pt: f32,
}

impl LineSpec {
    pub fn new(text: impl Into<String>, size_pt: f32) -> Self {
        Self {
            text: text.into(),
            size_pt,
        }
    }
}

fn default_size_pt() -> f32 {
    DEFAULT_SIZE_PT
}

fn default_variant() -> String {
    "nameplate".to_string()
}

fn default_height_in() -> f32 {
    1.5
}

fn default_width_in() -> f32 {
    5.0
}

fn default_font() -> String {
    DEFAULT_FONT.to_string()
}

fn default_quantity() -> u32 {
    1
}

/// A label template: everything needed to lay out and render one plate.
///
/// Immutable once submitted; the layout engines only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTemplate {
    /// Entry discriminator, always "nameplate" for this designer.
    #[serde(default = "default_variant")]
    pub variant: String,

    /// Plate height in inches.
    #[serde(default = "default_height_in", deserialize_with = "deserialize_inches")]
    pub height_in: f32,

    /// Plate width in inches.
    #[serde(default = "default_width_in", deserialize_with = "deserialize_inches")]
    pub width_in: f32,

    /// Display label like `1.50" x 5.00"`, as saved by the frontend.
    #[serde(rename = "sizeName", default, skip_serializing_if = "Option::is_none")]
    pub size_name: Option<String>,

    /// Palette name like "Green/White".
    #[serde(rename = "colorName", default, skip_serializing_if = "Option::is_none")]
    pub color_name: Option<String>,

    /// Background hex, carried alongside the palette name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,

    /// Foreground hex, carried alongside the palette name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<String>,

    #[serde(default)]
    pub corners: CornerStyle,

    /// Font family stack for display purposes.
    #[serde(default = "default_font")]
    pub font: String,

    /// 1..6 text lines.
    pub lines: Vec<LineSpec>,

    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl Default for LabelTemplate {
    fn default() -> Self {
        let palette = ColorPalette::default();
        Self {
            variant: default_variant(),
            height_in: default_height_in(),
            width_in: default_width_in(),
            size_name: None,
            color_name: Some(palette.name.clone()),
            bg: Some(palette.bg),
            fg: Some(palette.fg),
            corners: CornerStyle::Squared,
            font: default_font(),
            lines: vec![LineSpec::new("", DEFAULT_SIZE_PT)],
            quantity: 1,
        }
    }
}

impl LabelTemplate {
    /// Resolve the effective palette for rendering.
    ///
    /// A recognized `colorName` wins. Otherwise, supplied bg/fg hex values
    /// are kept under the unrecognized name, and with nothing usable the
    /// default Green/White applies.
    pub fn palette(&self) -> ColorPalette {
        if let Some(name) = &self.color_name
            && let Some(palette) = ColorPalette::by_name(name)
        {
            return palette;
        }
        if let (Some(bg), Some(fg)) = (&self.bg, &self.fg) {
            return ColorPalette {
                name: self
                    .color_name
                    .clone()
                    .unwrap_or_else(|| "Custom".to_string()),
                bg: bg.clone(),
                fg: fg.clone(),
            };
        }
        ColorPalette::default()
    }

    /// Display label for the plate size, e.g. `1.50" x 5.00"`.
    pub fn display_size(&self) -> String {
        match &self.size_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("{:.2}\" x {:.2}\"", self.height_in, self.width_in),
        }
    }

    /// Apply the designer's input floors: dimensions at least 0.1 inches,
    /// quantity at least 1.
    pub fn clamped(mut self) -> Self {
        if !self.height_in.is_finite() || self.height_in < MIN_DIMENSION_IN {
            self.height_in = MIN_DIMENSION_IN;
        }
        if !self.width_in.is_finite() || self.width_in < MIN_DIMENSION_IN {
            self.width_in = MIN_DIMENSION_IN;
        }
        if self.quantity < 1 {
            self.quantity = 1;
        }
        self
    }

    /// Check the structural invariants: 1..6 lines, point sizes from the
    /// allowed set.
    pub fn validate(&self) -> Result<(), PlacaError> {
        if self.lines.len() < MIN_LINES || self.lines.len() > MAX_LINES {
            return Err(PlacaError::Validation(format!(
                "Template must have between {} and {} lines, got {}",
                MIN_LINES,
                MAX_LINES,
                self.lines.len()
            )));
        }
        for (i, line) in self.lines.iter().enumerate() {
            if !ALLOWED_SIZES_PT.contains(&line.size_pt) {
                return Err(PlacaError::Validation(format!(
                    "Line {} has unsupported point size {}",
                    i + 1,
                    line.size_pt
                )));
            }
        }
        Ok(())
    }
}

/// Accept inches either as a JSON number or a numeric string.
fn deserialize_inches<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Inches {
        Number(f32),
        Text(String),
    }

    match Inches::deserialize(deserializer)? {
        Inches::Number(n) => Ok(n),
        Inches::Text(s) => s
            .trim()
            .parse::<f32>()
            .map_err(|_| serde::de::Error::custom(format!("invalid dimension: {:?}", s))),
    }
}
