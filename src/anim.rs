use image::imageops::FilterType;
use kurbo::Vec2;

use crate::{
    composite,
    core::RgbaFrame,
    error::{PromoError, PromoResult},
};

/// One keyframe of a pan/zoom animation: a normalized canvas offset
/// (x, y roughly in [-1, 1]), a scale factor (> 0) and a timestamp in
/// seconds. Keyframes live in an ordered slice; the successor is the next
/// index, so the chain is fully built up front and never mutated.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct AnimationStep {
    pub offset: Vec2,
    pub scale: f64,
    pub timestamp_secs: f64,
}

impl AnimationStep {
    pub fn new(offset: Vec2, scale: f64, timestamp_secs: f64) -> Self {
        Self {
            offset,
            scale,
            timestamp_secs,
        }
    }
}

/// A chain needs at least two steps and strictly increasing timestamps.
pub fn validate_chain(steps: &[AnimationStep]) -> PromoResult<()> {
    if steps.len() < 2 {
        return Err(PromoError::configuration(
            "animation chain needs at least two steps",
        ));
    }
    for step in steps {
        if step.scale <= 0.0 {
            return Err(PromoError::configuration(
                "animation step scale must be > 0",
            ));
        }
    }
    if !steps
        .windows(2)
        .all(|w| w[0].timestamp_secs < w[1].timestamp_secs)
    {
        return Err(PromoError::configuration(
            "animation step timestamps must be strictly increasing",
        ));
    }
    Ok(())
}

/// Linear interpolation between two steps at `t` in [0, 1]. The timestamp of
/// the result is not meaningful and carries `a`'s value.
pub fn lerp_step(a: &AnimationStep, b: &AnimationStep, t: f64) -> AnimationStep {
    AnimationStep {
        offset: Vec2::new(
            a.offset.x + (b.offset.x - a.offset.x) * t,
            a.offset.y + (b.offset.y - a.offset.y) * t,
        ),
        scale: a.scale + (b.scale - a.scale) * t,
        timestamp_secs: a.timestamp_secs,
    }
}

/// Renders one interpolated step: scales `src` by the step's factor and
/// pastes it onto `canvas` at the normalized offset converted to pixels.
pub fn apply_step(step: &AnimationStep, canvas: &mut RgbaFrame, src: &RgbaFrame) {
    let new_w = ((f64::from(src.width) * step.scale) as u32).max(1);
    let new_h = ((f64::from(src.height) * step.scale) as u32).max(1);

    let scaled = if (new_w, new_h) == (src.width, src.height) {
        src.clone()
    } else {
        RgbaFrame::from_image(image::imageops::resize(
            &src.to_image(),
            new_w,
            new_h,
            FilterType::Triangle,
        ))
    };

    let x = (step.offset.x * f64::from(canvas.width)) as i64;
    let y = (step.offset.y * f64::from(canvas.height)) as i64;
    composite::paste(canvas, &scaled, x, y);
}
