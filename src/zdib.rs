//! Decoder for S Note `.zdib` bitmaps.
//!
//! A `.zdib` resource is a zlib stream wrapping a 52-byte header followed by
//! raw RGBA pixels, row-major with no padding. Width is the little-endian u16
//! at offset 4 and height the little-endian u16 at offset 8; the other header
//! fields are not needed to rebuild the image.

use std::io::Cursor;

use crate::error::BitmapError;

const HEADER_LEN: usize = 52;
const WIDTH_OFFSET: usize = 4;
const HEIGHT_OFFSET: usize = 8;

#[derive(Debug, Clone)]
pub struct DecodedBitmap {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

pub fn decode_zdib(compressed: &[u8]) -> Result<DecodedBitmap, BitmapError> {
    let raw = miniz_oxide::inflate::decompress_to_vec_zlib(compressed)
        .map_err(|e| BitmapError::CorruptStream(format!("{:?}", e.status)))?;

    if raw.len() < HEADER_LEN {
        return Err(BitmapError::Truncated {
            expected: HEADER_LEN,
            actual: raw.len(),
        });
    }
    let width = u16::from_le_bytes([raw[WIDTH_OFFSET], raw[WIDTH_OFFSET + 1]]) as u32;
    let height = u16::from_le_bytes([raw[HEIGHT_OFFSET], raw[HEIGHT_OFFSET + 1]]) as u32;
    if width == 0 || height == 0 {
        return Err(BitmapError::EmptyImage { width, height });
    }

    let pixel_len = width as usize * height as usize * 4;
    let pixels = &raw[HEADER_LEN..];
    // Short buffers are rejected rather than padded; trailing bytes are ignored.
    if pixels.len() < pixel_len {
        return Err(BitmapError::Truncated {
            expected: HEADER_LEN + pixel_len,
            actual: raw.len(),
        });
    }

    let rgba = image::RgbaImage::from_raw(width, height, pixels[..pixel_len].to_vec()).ok_or(
        BitmapError::Truncated {
            expected: HEADER_LEN + pixel_len,
            actual: raw.len(),
        },
    )?;
    let mut png = Vec::new();
    rgba.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| BitmapError::Encode(e.to_string()))?;

    log::debug!(
        "Decoded zdib {}x{} ({} bytes compressed, {} bytes PNG)",
        width,
        height,
        compressed.len(),
        png.len()
    );

    Ok(DecodedBitmap { png, width, height })
}
