//! Decodes preview thumbnails for PDF embedding.
//!
//! Previews arrive as `data:image/png;base64,...` URIs. JPEG payloads pass
//! through untouched, since PDF understands DCTDecode natively. PNG payloads
//! are decoded and composited over white so transparency survives the trip
//! into an opaque RGB image stream.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::PlacaError;

/// A decoded thumbnail ready to become an image XObject.
#[derive(Debug, Clone)]
pub struct PreviewImage {
    pub width_px: u32,
    pub height_px: u32,
    pub pixels: PixelData,
}

#[derive(Debug, Clone)]
pub enum PixelData {
    /// Raw JPEG bytes, embedded as-is with DCTDecode.
    Jpeg { data: Vec<u8>, grayscale: bool },
    /// width * height * 3 bytes of RGB, deflated at serialization time.
    Rgb(Vec<u8>),
}

/// Decode a `data:image/(png|jpeg);base64,` URI.
pub fn decode_data_uri(uri: &str) -> Result<PreviewImage, PlacaError> {
    let rest = strip_prefix_ignore_case(uri, "data:image/")
        .ok_or_else(|| PlacaError::Image("not an image data URI".to_string()))?;
    let payload = strip_prefix_ignore_case(rest, "png;base64,")
        .or_else(|| strip_prefix_ignore_case(rest, "jpeg;base64,"))
        .ok_or_else(|| PlacaError::Image("unsupported data URI media type".to_string()))?;
    if payload.is_empty() {
        return Err(PlacaError::Image("empty data URI payload".to_string()));
    }
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| PlacaError::Image(format!("base64 decode: {e}")))?;
    decode_bytes(&bytes)
}

/// Decode raw image bytes by sniffing the magic number.
pub fn decode_bytes(data: &[u8]) -> Result<PreviewImage, PlacaError> {
    if is_jpeg(data) {
        decode_jpeg(data)
    } else if is_png(data) {
        decode_png(data)
    } else {
        Err(PlacaError::Image(
            "unsupported image format, expected PNG or JPEG".to_string(),
        ))
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

fn is_png(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == [0x89, 0x50, 0x4E, 0x47]
}

/// JPEG passthrough: only the dimensions and component count are read.
fn decode_jpeg(data: &[u8]) -> Result<PreviewImage, PlacaError> {
    let reader = image::ImageReader::new(std::io::Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| PlacaError::Image(format!("sniff jpeg: {e}")))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| PlacaError::Image(format!("read jpeg dimensions: {e}")))?;

    Ok(PreviewImage {
        width_px: width,
        height_px: height,
        pixels: PixelData::Jpeg {
            data: data.to_vec(),
            grayscale: jpeg_is_grayscale(data),
        },
    })
}

/// Walk the JPEG marker chain to the SOF segment and read its component
/// count. One component means grayscale, anything else is treated as RGB.
fn jpeg_is_grayscale(data: &[u8]) -> bool {
    let mut i = 2; // past SOI
    while i + 1 < data.len() {
        if data[i] != 0xFF {
            break;
        }
        let marker = data[i + 1];
        let is_sof = matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        if is_sof {
            return i + 9 < data.len() && data[i + 9] == 1;
        }
        if i + 3 < data.len() {
            let segment_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
            i += 2 + segment_len;
        } else {
            break;
        }
    }
    false
}

fn decode_png(data: &[u8]) -> Result<PreviewImage, PlacaError> {
    let decoded = image::load_from_memory(data)
        .map_err(|e| PlacaError::Image(format!("decode png: {e}")))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());

    // The summary page is white, so flattening transparency over white is
    // visually identical to a soft mask.
    let mut rgb = Vec::with_capacity((width * height) as usize * 3);
    for pixel in rgba.pixels() {
        let alpha = pixel[3];
        rgb.push(over_white(pixel[0], alpha));
        rgb.push(over_white(pixel[1], alpha));
        rgb.push(over_white(pixel[2], alpha));
    }

    Ok(PreviewImage {
        width_px: width,
        height_px: height,
        pixels: PixelData::Rgb(rgb),
    })
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    ((channel as u32 * alpha as u32 + 255 * (255 - alpha as u32) + 127) / 255) as u8
}
