//! The order summary: one table row per saved label, paginated onto US
//! Letter pages with repeating headers and a footer stamped in a second
//! phase once the page count is known.

use chrono::{DateTime, Local};

use super::images::decode_data_uri;
use super::metrics::Font;
use super::{PdfDocument, LETTER_HEIGHT, LETTER_WIDTH};
use crate::error::PlacaError;

pub const DEFAULT_TITLE: &str = "Saved Labels Summary";

const MARGIN: f64 = 40.0;
const CONTENT_WIDTH: f64 = LETTER_WIDTH - 2.0 * MARGIN;
/// Preview | Size/Name | Font | Qty
const COLUMN_WIDTHS: [f64; 4] = [110.0, 220.0, 140.0, 60.0];
const ROW_HEIGHT: f64 = 80.0;
/// Space a row needs before it is placed; overflow starts a new page.
const ROW_CLEARANCE: f64 = ROW_HEIGHT + 24.0;

const TITLE_Y: f64 = MARGIN;
const META_Y: f64 = 64.0;
const COLUMN_LABEL_Y: f64 = 82.0;
const RULE_Y: f64 = 98.0;
/// Cursor position after the page and column headers.
const HEADER_BOTTOM: f64 = 104.0;
const FOOTER_Y: f64 = 762.0;

const BLACK: [u8; 3] = [0x00, 0x00, 0x00];
const BORDER_GRAY: [u8; 3] = [0xcc, 0xcc, 0xcc];
const PLACEHOLDER_FILL: [u8; 3] = [0x66, 0x66, 0x66];
const PLACEHOLDER_TEXT: [u8; 3] = [0x77, 0x77, 0x77];
const FOOTER_GRAY: [u8; 3] = [0x66, 0x66, 0x66];

/// One table row.
#[derive(Debug, Clone, Default)]
pub struct SummaryItem {
    /// `data:image/(png|jpeg);base64,` thumbnail, if one was rendered.
    pub preview_png: Option<String>,
    /// Bold first line of the Size/Name column, e.g. `1.50" x 5.00"`.
    pub size_top: String,
    /// Second line of the Size/Name column.
    pub size_bottom: String,
    pub font_label: String,
    pub qty: u32,
}

/// Render the summary table to PDF bytes.
///
/// Rows are laid out greedily: a row that would cross the bottom margin
/// starts a new page, and rows never split. Thumbnails that fail to decode
/// fall back to a placeholder box instead of failing the document.
pub fn render_summary(
    title: Option<&str>,
    reference_id: &str,
    created_at: DateTime<Local>,
    items: &[SummaryItem],
) -> Result<Vec<u8>, PlacaError> {
    let title = title.unwrap_or(DEFAULT_TITLE);
    let timestamp = created_at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string();
    let reference_line = format!(
        "Reference ID: {}",
        if reference_id.is_empty() { "-" } else { reference_id }
    );

    let mut doc = PdfDocument::new(LETTER_WIDTH, LETTER_HEIGHT).with_title(title);

    // Register decodable thumbnails up front; rows reference them by index.
    let thumbnails: Vec<Option<(usize, u32, u32)>> = items
        .iter()
        .map(|item| {
            item.preview_png
                .as_deref()
                .and_then(|uri| decode_data_uri(uri).ok())
                .map(|image| {
                    let (w, h) = (image.width_px, image.height_px);
                    (doc.register_image(image), w, h)
                })
        })
        .collect();

    let mut page_number = 1;
    let mut y = start_page(&mut doc, title, &reference_line, &timestamp, page_number);

    for (item, thumbnail) in items.iter().zip(&thumbnails) {
        if y + ROW_CLEARANCE > LETTER_HEIGHT - MARGIN {
            page_number += 1;
            y = start_page(&mut doc, title, &reference_line, &timestamp, page_number);
        }
        y = draw_row(&mut doc, item, thumbnail.as_ref(), y);
    }

    // Second phase: total page count is now known, stamp every footer.
    let total = doc.page_count();
    let footer_left = format!("{reference_line} | {timestamp}");
    for page in 0..total {
        doc.select_page(page);
        doc.text(&footer_left, MARGIN, FOOTER_Y, Font::Helvetica, 8.0, FOOTER_GRAY);
        let label = format!("Page {} of {}", page + 1, total);
        let label_w = Font::Helvetica.text_width(&label, 8.0);
        doc.text(
            &label,
            MARGIN + CONTENT_WIDTH - label_w,
            FOOTER_Y,
            Font::Helvetica,
            8.0,
            FOOTER_GRAY,
        );
    }

    doc.render()
}

/// Open a page and draw the title, metadata line and column headers.
/// Returns the y cursor for the first row.
fn start_page(
    doc: &mut PdfDocument,
    title: &str,
    reference_line: &str,
    timestamp: &str,
    page_number: usize,
) -> f64 {
    doc.add_page();

    let title_w = Font::HelveticaBold.text_width(title, 16.0);
    doc.text(
        title,
        MARGIN + (CONTENT_WIDTH - title_w) / 2.0,
        TITLE_Y,
        Font::HelveticaBold,
        16.0,
        BLACK,
    );

    doc.text(reference_line, MARGIN, META_Y, Font::Helvetica, 10.0, BLACK);
    let page_line = format!("{timestamp} | Page {page_number}");
    let page_line_w = Font::Helvetica.text_width(&page_line, 10.0);
    doc.text(
        &page_line,
        MARGIN + CONTENT_WIDTH - page_line_w,
        META_Y,
        Font::Helvetica,
        10.0,
        BLACK,
    );

    let labels = ["Preview", "Size/Name", "Font", "Qty"];
    let mut x = MARGIN;
    for (i, (label, width)) in labels.iter().zip(COLUMN_WIDTHS).enumerate() {
        if i == labels.len() - 1 {
            let label_w = Font::HelveticaBold.text_width(label, 11.0);
            doc.text(label, x + width - label_w, COLUMN_LABEL_Y, Font::HelveticaBold, 11.0, BLACK);
        } else {
            doc.text(label, x, COLUMN_LABEL_Y, Font::HelveticaBold, 11.0, BLACK);
        }
        x += width;
    }

    let table_w: f64 = COLUMN_WIDTHS.iter().sum();
    doc.stroke_line(MARGIN, RULE_Y, MARGIN + table_w, RULE_Y, BLACK, 1.0);

    HEADER_BOTTOM
}

/// Draw one row at `base_y` and return the cursor for the next row.
fn draw_row(
    doc: &mut PdfDocument,
    item: &SummaryItem,
    thumbnail: Option<&(usize, u32, u32)>,
    base_y: f64,
) -> f64 {
    let [preview_w, size_w, font_w, qty_w] = COLUMN_WIDTHS;
    let preview_x = MARGIN;
    let size_x = preview_x + preview_w;
    let font_x = size_x + size_w;
    let qty_x = font_x + font_w;
    let table_w = preview_w + size_w + font_w + qty_w;

    doc.stroke_rect(preview_x, base_y - 4.0, table_w, ROW_HEIGHT + 8.0, BORDER_GRAY, 1.0);

    let frame_x = preview_x + 8.0;
    let frame_y = base_y + 6.0;
    let frame_w = preview_w - 16.0;
    let frame_h = ROW_HEIGHT - 12.0;
    match thumbnail {
        Some(&(image_index, px_w, px_h)) => {
            let (x, y, w, h) = fit_box(px_w, px_h, frame_x, frame_y, frame_w, frame_h);
            doc.draw_image(image_index, x, y, w, h);
        }
        None => {
            doc.fill_rect_alpha(frame_x, frame_y, frame_w, frame_h, PLACEHOLDER_FILL, 0.08);
            let notice = "Preview unavailable";
            let notice_w = Font::HelveticaOblique.text_width(notice, 9.0);
            let notice_x = preview_x + 12.0 + (preview_w - 24.0 - notice_w) / 2.0;
            doc.text(
                notice,
                notice_x,
                base_y + ROW_HEIGHT / 2.0 - 6.0,
                Font::HelveticaOblique,
                9.0,
                PLACEHOLDER_TEXT,
            );
        }
    }

    let size_top = clip_to_width(&item.size_top, Font::HelveticaBold, 11.0, size_w - 12.0);
    doc.text(&size_top, size_x + 6.0, base_y + 8.0, Font::HelveticaBold, 11.0, BLACK);
    let size_bottom = clip_to_width(&item.size_bottom, Font::Helvetica, 10.0, size_w - 12.0);
    doc.text(&size_bottom, size_x + 6.0, base_y + 26.0, Font::Helvetica, 10.0, BLACK);

    let font_label = clip_to_width(&item.font_label, Font::Helvetica, 10.0, font_w - 12.0);
    doc.text(&font_label, font_x + 6.0, base_y + 14.0, Font::Helvetica, 10.0, BLACK);

    let qty = item.qty.to_string();
    let qty_text_w = Font::HelveticaBold.text_width(&qty, 12.0);
    doc.text(
        &qty,
        qty_x + (qty_w - qty_text_w) / 2.0,
        base_y + 14.0,
        Font::HelveticaBold,
        12.0,
        BLACK,
    );

    base_y + ROW_HEIGHT + 6.0
}

/// Scale an image proportionally to exactly fit a box, centered both ways.
fn fit_box(px_w: u32, px_h: u32, x: f64, y: f64, box_w: f64, box_h: f64) -> (f64, f64, f64, f64) {
    if px_w == 0 || px_h == 0 {
        return (x, y, box_w, box_h);
    }
    let image_ratio = px_w as f64 / px_h as f64;
    let box_ratio = box_w / box_h;
    let (w, h) = if image_ratio > box_ratio {
        (box_w, box_w / image_ratio)
    } else {
        (box_h * image_ratio, box_h)
    };
    (x + (box_w - w) / 2.0, y + (box_h - h) / 2.0, w, h)
}

/// Shorten text with a trailing "..." if it would overflow a column.
fn clip_to_width(text: &str, font: Font, size: f64, max_width: f64) -> String {
    if font.text_width(text, size) <= max_width {
        return text.to_string();
    }
    let mut clipped = text.to_string();
    while !clipped.is_empty() {
        clipped.pop();
        let candidate = format!("{}...", clipped.trim_end());
        if font.text_width(&candidate, size) <= max_width {
            return candidate;
        }
    }
    "...".to_string()
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn created_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 12, 9, 30, 0).unwrap()
    }

    fn item(label: &str) -> SummaryItem {
        SummaryItem {
            preview_png: None,
            size_top: format!("1.50\" x 5.00\" ({label})"),
            size_bottom: "JOHN DOE".to_string(),
            font_label: "Calibri".to_string(),
            qty: 2,
        }
    }

    fn png_data_uri() -> String {
        let mut img = image::RgbaImage::new(4, 2);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgba([0, 128, 0, 255]);
        }
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), 4, 2, image::ExtendedColorType::Rgba8)
            .unwrap();
        format!("data:image/png;base64,{}", STANDARD.encode(&buf))
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    /// Inflate every stream object and concatenate the results.
    fn decompressed_streams(bytes: &[u8]) -> String {
        use flate2::read::ZlibDecoder;
        use std::io::Read;

        let marker = b">>\nstream\n";
        let mut text = String::new();
        let mut i = 0;
        while let Some(pos) = find(&bytes[i..], marker) {
            let start = i + pos + marker.len();
            let Some(len) = find(&bytes[start..], b"\nendstream") else {
                break;
            };
            let mut decoder = ZlibDecoder::new(&bytes[start..start + len]);
            let mut out = Vec::new();
            if decoder.read_to_end(&mut out).is_ok() {
                text.push_str(&String::from_utf8_lossy(&out));
            }
            i = start + len;
        }
        text
    }

    #[test]
    fn test_single_page_structure() {
        let items = vec![item("Green/White"), item("Red/White")];
        let bytes = render_summary(None, "REF-1001", created_at(), &items).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("/MediaBox [0 0 612.00 792.00]"));
        assert!(text.contains("/Title (Saved Labels Summary)"));
        assert!(bytes.windows(5).any(|w| w == b"%%EOF"));
    }

    #[test]
    fn test_rows_paginate_greedily_and_never_split() {
        let items: Vec<SummaryItem> = (0..25).map(|i| item(&format!("#{i}"))).collect();

        // Derive the expected count from the placement rule itself.
        let mut expected_pages = 1;
        let mut y = HEADER_BOTTOM;
        for _ in 0..items.len() {
            if y + ROW_CLEARANCE > LETTER_HEIGHT - MARGIN {
                expected_pages += 1;
                y = HEADER_BOTTOM;
            }
            y += ROW_HEIGHT + 6.0;
        }
        assert_eq!(expected_pages, 4);

        let bytes = render_summary(None, "REF-1001", created_at(), &items).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains(&format!("/Count {expected_pages}")));

        // 25 bordered row rects across the document, none clipped or resized
        let streams = decompressed_streams(&bytes);
        assert_eq!(streams.matches("530.00 88.00 re\nS").count(), 25);
    }

    #[test]
    fn test_headers_repeat_on_every_page() {
        let items: Vec<SummaryItem> = (0..8).map(|i| item(&format!("#{i}"))).collect();
        let bytes = render_summary(None, "REF-77", created_at(), &items).unwrap();
        let streams = decompressed_streams(&bytes);
        assert_eq!(streams.matches("(Saved Labels Summary) Tj").count(), 2);
        assert_eq!(streams.matches("(Size/Name) Tj").count(), 2);
        assert_eq!(streams.matches("(Reference ID: REF-77) Tj").count(), 2);
        assert!(streams.contains("| Page 1) Tj"));
        assert!(streams.contains("| Page 2) Tj"));
    }

    #[test]
    fn test_footer_counts_total_pages() {
        let items: Vec<SummaryItem> = (0..8).map(|i| item(&format!("#{i}"))).collect();
        let bytes = render_summary(None, "REF-77", created_at(), &items).unwrap();
        let streams = decompressed_streams(&bytes);
        assert!(streams.contains("(Page 1 of 2) Tj"));
        assert!(streams.contains("(Page 2 of 2) Tj"));
    }

    #[test]
    fn test_empty_reference_id_renders_dash() {
        let bytes = render_summary(None, "", created_at(), &[item("x")]).unwrap();
        let streams = decompressed_streams(&bytes);
        assert!(streams.contains("(Reference ID: -) Tj"));
    }

    #[test]
    fn test_no_items_still_produces_one_page() {
        let bytes = render_summary(None, "REF-0", created_at(), &[]).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Count 1"));
        let streams = decompressed_streams(&bytes);
        assert!(streams.contains("(Page 1 of 1) Tj"));
    }

    #[test]
    fn test_decodable_preview_is_embedded() {
        let mut with_preview = item("x");
        with_preview.preview_png = Some(png_data_uri());
        let bytes = render_summary(None, "REF-9", created_at(), &[with_preview]).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/XObject << /Im0"));
        assert!(text.contains("/Subtype /Image /Width 4 /Height 2"));
        let streams = decompressed_streams(&bytes);
        assert!(streams.contains("/Im0 Do"));
        assert!(!streams.contains("(Preview unavailable) Tj"));
    }

    #[test]
    fn test_malformed_preview_falls_back_to_placeholder() {
        let mut broken = item("x");
        broken.preview_png = Some("data:image/png;base64,@@not@@base64@@".to_string());
        let bytes = render_summary(None, "REF-9", created_at(), &[broken]).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(!text.contains("/XObject"));
        let streams = decompressed_streams(&bytes);
        assert!(streams.contains("(Preview unavailable) Tj"));
        assert!(streams.contains("/Gs0 gs"));
    }

    #[test]
    fn test_custom_title_overrides_default() {
        let bytes =
            render_summary(Some("March Batch"), "REF-3", created_at(), &[item("x")]).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Title (March Batch)"));
        let streams = decompressed_streams(&bytes);
        assert!(streams.contains("(March Batch) Tj"));
        assert!(!streams.contains("(Saved Labels Summary) Tj"));
    }

    #[test]
    fn test_wide_image_fits_to_frame_width() {
        let (x, y, w, h) = fit_box(480, 144, 48.0, 110.0, 94.0, 68.0);
        assert!((w - 94.0).abs() < 1e-9);
        assert!((h - 28.2).abs() < 1e-9);
        assert!((x - 48.0).abs() < 1e-9);
        assert!((y - (110.0 + (68.0 - 28.2) / 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_tall_image_fits_to_frame_height() {
        let (_, y, w, h) = fit_box(100, 400, 0.0, 0.0, 94.0, 68.0);
        assert!((h - 68.0).abs() < 1e-9);
        assert!((w - 17.0).abs() < 1e-9);
        assert!((y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_clip_to_width_keeps_short_text() {
        assert_eq!(clip_to_width("Calibri", Font::Helvetica, 10.0, 128.0), "Calibri");
    }

    #[test]
    fn test_clip_to_width_truncates_long_text() {
        let long = "Calibri, Arial, Helvetica, sans-serif and then some";
        let clipped = clip_to_width(long, Font::Helvetica, 10.0, 128.0);
        assert!(clipped.ends_with("..."));
        assert!(Font::Helvetica.text_width(&clipped, 10.0) <= 128.0);
        assert!(clipped.len() < long.len());
    }
}
