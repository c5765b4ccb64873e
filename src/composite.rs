//! The single blending primitive every procedural effect goes through.

use crate::core::RgbaFrame;

/// Composites `overlay` onto `base` at `(x, y)` with straight-alpha blending:
/// `base = (1 - a) * base + a * overlay` over the RGB channels.
///
/// Negative offsets crop the overlay's left/top edge and clamp placement to
/// zero; the overlay is clipped at the base's right/bottom edge. Base alpha
/// is left untouched.
pub fn paste(base: &mut RgbaFrame, overlay: &RgbaFrame, x: i64, y: i64) {
    let Some(region) = clip_region(base, overlay, x, y) else {
        return;
    };

    for row in 0..region.height {
        for col in 0..region.width {
            let o = overlay.pixel(region.crop_x + col, region.crop_y + row);
            let a = f32::from(o[3]) / 255.0;
            let i = base.pixel_offset(region.base_x + col, region.base_y + row);
            for c in 0..3 {
                let blended = (1.0 - a) * f32::from(base.data[i + c]) + a * f32::from(o[c]);
                base.data[i + c] = blended.round() as u8;
            }
        }
    }
}

/// Opaque variant: copies all four overlay channels into the clipped region,
/// ignoring the overlay's alpha.
pub fn paste_opaque(base: &mut RgbaFrame, overlay: &RgbaFrame, x: i64, y: i64) {
    let Some(region) = clip_region(base, overlay, x, y) else {
        return;
    };

    for row in 0..region.height {
        let src = overlay.pixel_offset(region.crop_x, region.crop_y + row);
        let dst = base.pixel_offset(region.base_x, region.base_y + row);
        let len = (region.width * 4) as usize;
        base.data[dst..dst + len].copy_from_slice(&overlay.data[src..src + len]);
    }
}

/// Linear cross-dissolve `(1-t)*a + t*b` over all four channels. Both frames
/// must share dimensions.
pub fn blend_weighted(a: &RgbaFrame, b: &RgbaFrame, t: f64) -> RgbaFrame {
    debug_assert_eq!((a.width, a.height), (b.width, b.height));
    let t = t.clamp(0.0, 1.0) as f32;
    let data = a
        .data
        .iter()
        .zip(b.data.iter())
        .map(|(&av, &bv)| ((1.0 - t) * f32::from(av) + t * f32::from(bv)).round() as u8)
        .collect();
    RgbaFrame {
        width: a.width,
        height: a.height,
        data,
    }
}

struct ClipRegion {
    crop_x: u32,
    crop_y: u32,
    base_x: u32,
    base_y: u32,
    width: u32,
    height: u32,
}

fn clip_region(base: &RgbaFrame, overlay: &RgbaFrame, x: i64, y: i64) -> Option<ClipRegion> {
    let (crop_x, base_x) = if x < 0 {
        (x.unsigned_abs(), 0)
    } else {
        (0, x as u64)
    };
    let (crop_y, base_y) = if y < 0 {
        (y.unsigned_abs(), 0)
    } else {
        (0, y as u64)
    };

    if crop_x >= u64::from(overlay.width)
        || crop_y >= u64::from(overlay.height)
        || base_x >= u64::from(base.width)
        || base_y >= u64::from(base.height)
    {
        return None;
    }

    let width = u64::from(overlay.width)
        .saturating_sub(crop_x)
        .min(u64::from(base.width) - base_x);
    let height = u64::from(overlay.height)
        .saturating_sub(crop_y)
        .min(u64::from(base.height) - base_y);

    Some(ClipRegion {
        crop_x: crop_x as u32,
        crop_y: crop_y as u32,
        base_x: base_x as u32,
        base_y: base_y as u32,
        width: width as u32,
        height: height as u32,
    })
}
