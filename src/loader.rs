use std::path::{Path, PathBuf};

use image::imageops::FilterType;

use crate::{
    core::RgbaFrame,
    error::{PromoError, PromoResult},
};

const PAD_WHITE: [u8; 4] = [255, 255, 255, 255];

/// Decodes one image file to straight RGBA.
pub fn load_rgba(path: &Path) -> PromoResult<RgbaFrame> {
    let img = image::open(path).map_err(|e| {
        PromoError::decode(format!("failed to decode image '{}': {e}", path.display()))
    })?;
    Ok(RgbaFrame::from_image(img.to_rgba8()))
}

/// Loads several images and pads each to the elementwise max of their
/// dimensions, centered on white. With `squared` the target canvas is
/// `max(max_width, max_height)` on both sides.
pub fn load_normalized(paths: &[PathBuf], squared: bool) -> PromoResult<Vec<RgbaFrame>> {
    let mut images = Vec::with_capacity(paths.len());
    let (mut max_w, mut max_h) = (0u32, 0u32);
    for path in paths {
        let img = load_rgba(path)?;
        max_w = max_w.max(img.width);
        max_h = max_h.max(img.height);
        images.push(img);
    }

    if squared {
        let side = max_w.max(max_h);
        max_w = side;
        max_h = side;
    }

    Ok(images
        .into_iter()
        .map(|img| pad_to(&img, max_w, max_h))
        .collect())
}

/// Centers `img` on a white canvas of `target_w` x `target_h`. Odd padding
/// remainders land on the bottom/right edge.
pub fn pad_to(img: &RgbaFrame, target_w: u32, target_h: u32) -> RgbaFrame {
    debug_assert!(target_w >= img.width && target_h >= img.height);
    let left = (target_w - img.width) / 2;
    let top = (target_h - img.height) / 2;

    let mut canvas = RgbaFrame::new(target_w, target_h, PAD_WHITE);
    for y in 0..img.height {
        let src = img.pixel_offset(0, y);
        let dst = canvas.pixel_offset(left, top + y);
        let row_len = (img.width * 4) as usize;
        canvas.data[dst..dst + row_len].copy_from_slice(&img.data[src..src + row_len]);
    }
    canvas
}

/// Dimension guard, run before every generator: downscales any image whose
/// longer side exceeds `max_side` and forces both dimensions even (the video
/// encoder rejects odd chroma-subsampled dimensions). Overwrites in place.
pub fn shrink_oversized(paths: &[PathBuf], max_side: u32) -> PromoResult<()> {
    for path in paths {
        let img = image::open(path).map_err(|e| {
            PromoError::decode(format!("failed to decode image '{}': {e}", path.display()))
        })?;
        let (width, height) = (img.width(), img.height());

        let longer = width.max(height);
        let (mut new_w, mut new_h) = if longer > max_side {
            let scale = f64::from(max_side) / f64::from(longer);
            (
                (f64::from(width) * scale) as u32,
                (f64::from(height) * scale) as u32,
            )
        } else {
            (width, height)
        };
        new_w -= new_w % 2;
        new_h -= new_h % 2;
        if new_w == 0 || new_h == 0 {
            return Err(PromoError::decode(format!(
                "image '{}' is too small to encode ({width}x{height})",
                path.display()
            )));
        }

        if (new_w, new_h) != (width, height) {
            tracing::debug!(
                path = %path.display(),
                from = format!("{width}x{height}"),
                to = format!("{new_w}x{new_h}"),
                "shrinking oversized input"
            );
            let resized = img.resize_exact(new_w, new_h, FilterType::Triangle);
            resized.save(path).map_err(|e| {
                PromoError::decode(format!(
                    "failed to write resized image '{}': {e}",
                    path.display()
                ))
            })?;
        }
    }
    Ok(())
}
