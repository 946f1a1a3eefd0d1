//! Image decoding for embedding into a report page.

use anyhow::{Context, Result};
use image::GenericImageView;

/// Longest edge kept when embedding; larger images are downscaled first.
pub const MAX_EMBED_EDGE: u32 = 2400;

/// Decoded image as 8-bit RGB rows, ready for a DeviceRGB image XObject.
pub struct RgbImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decode an uploaded image, shrink it if needed and flatten any transparency
/// onto white.
pub fn decode_for_embedding(data: &[u8]) -> Result<RgbImage> {
    let mut img = image::load_from_memory(data).context("Failed to decode image")?;

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        anyhow::bail!("Image has no pixels");
    }
    if width > MAX_EMBED_EDGE || height > MAX_EMBED_EDGE {
        img = img.thumbnail(MAX_EMBED_EDGE, MAX_EMBED_EDGE);
    }

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
    for px in rgba.pixels() {
        let [r, g, b, a] = px.0;
        let alpha = a as u32;
        for channel in [r, g, b] {
            pixels.push(((channel as u32 * alpha + 255 * (255 - alpha)) / 255) as u8);
        }
    }

    Ok(RgbImage {
        width,
        height,
        pixels,
    })
}

/// Size and position (x, y, width, height) that fit an image inside the
/// content box, centered, keeping its aspect ratio.
pub fn fit_centered(
    width: u32,
    height: u32,
    box_x: i64,
    box_y: i64,
    box_width: i64,
    box_height: i64,
) -> (i64, i64, i64, i64) {
    let scale = f64::min(
        box_width as f64 / width as f64,
        box_height as f64 / height as f64,
    );
    let draw_width = ((width as f64 * scale).round() as i64).max(1);
    let draw_height = ((height as f64 * scale).round() as i64).max(1);
    let x = box_x + (box_width - draw_width) / 2;
    let y = box_y + (box_height - draw_height) / 2;
    (x, y, draw_width, draw_height)
}
