//! From-scratch PDF 1.7 writer for the order summary.
//!
//! The document is built page by page as content-stream operator text in
//! top-down page coordinates, then serialized in one pass: header, numbered
//! objects, cross-reference table, trailer. Content streams are deflated
//! (`/FlateDecode`), text uses the standard Helvetica family, and preview
//! thumbnails become image XObjects.
//!
//! Pages stay buffered until [`PdfDocument::render`], so a finished page can
//! be reselected and drawn on again. The summary renderer uses that to stamp
//! "Page X of N" footers once the total page count is known.

pub mod images;
pub mod metrics;
pub mod summary;

pub use images::{decode_data_uri, PixelData, PreviewImage};
pub use metrics::Font;
pub use summary::{render_summary, SummaryItem};

use std::fmt::Write as FmtWrite;
use std::io::Write as IoWrite;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::PlacaError;

/// US Letter, in points.
pub const LETTER_WIDTH: f64 = 612.0;
pub const LETTER_HEIGHT: f64 = 792.0;

/// A multi-page PDF under construction.
///
/// Drawing calls take top-down coordinates (y grows downward, like the
/// raster preview) and are flipped into PDF's bottom-up space as they are
/// written. All drawing applies to the currently selected page.
pub struct PdfDocument {
    page_width: f64,
    page_height: f64,
    title: Option<String>,
    pages: Vec<String>,
    current: usize,
    images: Vec<PreviewImage>,
    alphas: Vec<f64>,
}

impl PdfDocument {
    pub fn new(page_width: f64, page_height: f64) -> Self {
        Self {
            page_width,
            page_height,
            title: None,
            pages: Vec::new(),
            current: 0,
            images: Vec::new(),
            alphas: Vec::new(),
        }
    }

    /// Sets the /Title entry of the document info dictionary.
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Starts a fresh page and selects it.
    pub fn add_page(&mut self) {
        self.pages.push(String::new());
        self.current = self.pages.len() - 1;
    }

    /// Reselects an earlier page so more operators can be appended to it.
    pub fn select_page(&mut self, index: usize) {
        self.current = index.min(self.pages.len().saturating_sub(1));
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Registers a decoded thumbnail and returns its XObject index.
    pub fn register_image(&mut self, image: PreviewImage) -> usize {
        self.images.push(image);
        self.images.len() - 1
    }

    fn content(&mut self) -> &mut String {
        if self.pages.is_empty() {
            self.add_page();
        }
        &mut self.pages[self.current]
    }

    fn alpha_index(&mut self, alpha: f64) -> usize {
        if let Some(index) = self.alphas.iter().position(|a| (a - alpha).abs() < 1e-6) {
            return index;
        }
        self.alphas.push(alpha);
        self.alphas.len() - 1
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, rgb: [u8; 3]) {
        let py = self.page_height - y - h;
        let (r, g, b) = rgb_components(rgb);
        let _ = write!(
            self.content(),
            "q\n{r:.3} {g:.3} {b:.3} rg\n{x:.2} {py:.2} {w:.2} {h:.2} re\nf\nQ\n"
        );
    }

    /// Filled rectangle with constant alpha, via a shared ExtGState.
    pub fn fill_rect_alpha(&mut self, x: f64, y: f64, w: f64, h: f64, rgb: [u8; 3], alpha: f64) {
        let gs = self.alpha_index(alpha);
        let py = self.page_height - y - h;
        let (r, g, b) = rgb_components(rgb);
        let _ = write!(
            self.content(),
            "q\n/Gs{gs} gs\n{r:.3} {g:.3} {b:.3} rg\n{x:.2} {py:.2} {w:.2} {h:.2} re\nf\nQ\n"
        );
    }

    pub fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, rgb: [u8; 3], line_width: f64) {
        let py = self.page_height - y - h;
        let (r, g, b) = rgb_components(rgb);
        let _ = write!(
            self.content(),
            "q\n{r:.3} {g:.3} {b:.3} RG\n{line_width:.2} w\n{x:.2} {py:.2} {w:.2} {h:.2} re\nS\nQ\n"
        );
    }

    pub fn stroke_line(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        rgb: [u8; 3],
        line_width: f64,
    ) {
        let py1 = self.page_height - y1;
        let py2 = self.page_height - y2;
        let (r, g, b) = rgb_components(rgb);
        let _ = write!(
            self.content(),
            "q\n{r:.3} {g:.3} {b:.3} RG\n{line_width:.2} w\n{x1:.2} {py1:.2} m\n{x2:.2} {py2:.2} l\nS\nQ\n"
        );
    }

    /// Draws a single line of text. `y` is the top of the text box; the
    /// baseline lands one ascent below it.
    pub fn text(&mut self, text: &str, x: f64, y: f64, font: Font, size: f64, rgb: [u8; 3]) {
        let py = self.page_height - y - font.ascent(size);
        let (r, g, b) = rgb_components(rgb);
        let escaped = escape_pdf_string(text);
        let resource = font.resource_name();
        let _ = write!(
            self.content(),
            "BT\n{r:.3} {g:.3} {b:.3} rg\n/{resource} {size:.1} Tf\n{x:.2} {py:.2} Td\n({escaped}) Tj\nET\n"
        );
    }

    /// Paints a registered image into the given box, stretching to fill it.
    pub fn draw_image(&mut self, image_index: usize, x: f64, y: f64, w: f64, h: f64) {
        let py = self.page_height - y - h;
        let _ = write!(
            self.content(),
            "q\n{w:.2} 0 0 {h:.2} {x:.2} {py:.2} cm\n/Im{image_index} Do\nQ\n"
        );
    }

    /// Serializes the buffered document into final PDF bytes.
    pub fn render(&self) -> Result<Vec<u8>, PlacaError> {
        // Objects are 1-indexed; 1 is the catalog and 2 the page tree, both
        // filled in once the page objects exist.
        let mut objects: Vec<Vec<u8>> = vec![Vec::new(), Vec::new(), Vec::new()];

        let font_ids: Vec<usize> = Font::ALL
            .iter()
            .map(|font| {
                let id = objects.len();
                objects.push(
                    format!(
                        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                        font.base_name()
                    )
                    .into_bytes(),
                );
                id
            })
            .collect();

        let alpha_ids: Vec<usize> = self
            .alphas
            .iter()
            .map(|alpha| {
                let id = objects.len();
                objects.push(
                    format!("<< /Type /ExtGState /ca {alpha:.2} /CA {alpha:.2} >>").into_bytes(),
                );
                id
            })
            .collect();

        let mut image_ids = Vec::with_capacity(self.images.len());
        for image in &self.images {
            let id = objects.len();
            objects.push(image_object(image)?);
            image_ids.push(id);
        }

        let resources = self.resource_dict(&font_ids, &alpha_ids, &image_ids);

        let empty_page = [String::new()];
        let pages: &[String] = if self.pages.is_empty() {
            &empty_page
        } else {
            &self.pages
        };

        let mut page_ids = Vec::with_capacity(pages.len());
        for content in pages {
            let compressed = deflate(content.as_bytes())?;
            let content_id = objects.len();
            let mut data = Vec::new();
            let _ = write!(
                data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            data.extend_from_slice(&compressed);
            data.extend_from_slice(b"\nendstream");
            objects.push(data);

            let page_id = objects.len();
            objects.push(
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Contents {} 0 R /Resources {} >>",
                    self.page_width, self.page_height, content_id, resources
                )
                .into_bytes(),
            );
            page_ids.push(page_id);
        }

        objects[1] = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();
        let kids: String = page_ids
            .iter()
            .map(|id| format!("{id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");
        objects[2] = format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", page_ids.len())
            .into_bytes();

        let info_id = self.title.as_ref().map(|title| {
            let id = objects.len();
            objects.push(
                format!(
                    "<< /Title ({}) /Producer (placa {}) >>",
                    escape_pdf_string(title),
                    env!("CARGO_PKG_VERSION")
                )
                .into_bytes(),
            );
            id
        });

        Ok(serialize(&objects, info_id))
    }

    fn resource_dict(&self, font_ids: &[usize], alpha_ids: &[usize], image_ids: &[usize]) -> String {
        let fonts: String = Font::ALL
            .iter()
            .zip(font_ids)
            .map(|(font, id)| format!("/{} {} 0 R", font.resource_name(), id))
            .collect::<Vec<_>>()
            .join(" ");
        let mut dict = format!("<< /Font << {fonts} >>");

        if !alpha_ids.is_empty() {
            let states: String = alpha_ids
                .iter()
                .enumerate()
                .map(|(i, id)| format!("/Gs{i} {id} 0 R"))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(dict, " /ExtGState << {states} >>");
        }

        if !image_ids.is_empty() {
            let xobjects: String = image_ids
                .iter()
                .enumerate()
                .map(|(i, id)| format!("/Im{i} {id} 0 R"))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(dict, " /XObject << {xobjects} >>");
        }

        dict.push_str(" >>");
        dict
    }
}

fn rgb_components(rgb: [u8; 3]) -> (f64, f64, f64) {
    (
        rgb[0] as f64 / 255.0,
        rgb[1] as f64 / 255.0,
        rgb[2] as f64 / 255.0,
    )
}

/// Escape a string for a PDF literal. Latin-1 characters become octal
/// escapes (the fonts use WinAnsiEncoding); anything wider degrades to '?'.
fn escape_pdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            ' '..='~' => out.push(ch),
            _ => {
                let code = ch as u32;
                if (0xA0..=0xFF).contains(&code) {
                    let _ = write!(out, "\\{code:03o}");
                } else {
                    out.push('?');
                }
            }
        }
    }
    out
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, PlacaError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(6));
    encoder
        .write_all(data)
        .map_err(|e| PlacaError::Pdf(format!("deflate stream: {e}")))?;
    encoder
        .finish()
        .map_err(|e| PlacaError::Pdf(format!("deflate stream: {e}")))
}

fn image_object(image: &PreviewImage) -> Result<Vec<u8>, PlacaError> {
    let (payload, filter, color_space) = match &image.pixels {
        PixelData::Jpeg { data, grayscale } => {
            let cs = if *grayscale { "DeviceGray" } else { "DeviceRGB" };
            (data.clone(), "DCTDecode", cs)
        }
        PixelData::Rgb(raw) => (deflate(raw)?, "FlateDecode", "DeviceRGB"),
    };

    let mut data = Vec::new();
    let _ = write!(
        data,
        "<< /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /{} /BitsPerComponent 8 /Filter /{} /Length {} >>\nstream\n",
        image.width_px,
        image.height_px,
        color_space,
        filter,
        payload.len()
    );
    data.extend_from_slice(&payload);
    data.extend_from_slice(b"\nendstream");
    Ok(data)
}

/// Lay the objects out with a cross-reference table and trailer.
fn serialize(objects: &[Vec<u8>], info_id: Option<usize>) -> Vec<u8> {
    let mut output: Vec<u8> = Vec::new();
    let mut offsets = vec![0usize; objects.len()];

    output.extend_from_slice(b"%PDF-1.7\n");
    output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

    for (i, data) in objects.iter().enumerate().skip(1) {
        offsets[i] = output.len();
        let _ = write!(output, "{i} 0 obj\n");
        output.extend_from_slice(data);
        output.extend_from_slice(b"\nendobj\n\n");
    }

    let xref_offset = output.len();
    let _ = write!(output, "xref\n0 {}\n", objects.len());
    let _ = write!(output, "0000000000 65535 f \n");
    for offset in offsets.iter().skip(1) {
        let _ = write!(output, "{offset:010} 00000 n \n");
    }

    let _ = write!(output, "trailer\n<< /Size {} /Root 1 0 R", objects.len());
    if let Some(id) = info_id {
        let _ = write!(output, " /Info {id} 0 R");
    }
    let _ = write!(output, " >>\nstartxref\n{xref_offset}\n%%EOF\n");

    output
}
