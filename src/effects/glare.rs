use std::path::Path;

use crate::{
    composite,
    core::{FrameSequence, PipelineConfig, RgbaFrame},
    error::PromoResult,
    loader,
};

/// Natural duration of one sweep. Glare is the one effect that is never
/// looped up to the pipeline minimum; it plays this once.
pub const GLARE_SECS: f64 = 2.1;

/// Horizontal inset of the gradient canvas, matching its 200 px margin on
/// each side of the image width.
const BAND_INSET_X: i64 = -200;
const BAND_HALF_WIDTH: f64 = 100.0;
const PEAK_ALPHA: f64 = 200.0;

/// Sweeps a diagonal translucent band vertically across the image, the
/// vertical offset interpolating from `+height/2` down to `-height/2`.
pub fn render(image_path: &Path, cfg: &PipelineConfig) -> PromoResult<FrameSequence> {
    let img = loader::load_rgba(image_path)?;
    let gradient = diagonal_gradient(img.width + 400);

    let frame_count = cfg.fps.secs_to_frames_ceil(GLARE_SECS).max(2);
    let half_height = f64::from(img.height) / 2.0;

    let mut seq = FrameSequence::new();
    for i in 0..frame_count {
        let t = i as f64 / (frame_count - 1) as f64;
        let y = ((1.0 - 2.0 * t) * half_height) as i64;
        let mut frame = img.clone();
        composite::paste(&mut frame, &gradient, BAND_INSET_X, y);
        seq.push(frame)?;
    }
    Ok(seq)
}

/// A square canvas carrying a white 45° band: alpha falls off linearly from
/// `PEAK_ALPHA` at the anti-diagonal to zero at `BAND_HALF_WIDTH` pixels of
/// perpendicular distance.
fn diagonal_gradient(side: u32) -> RgbaFrame {
    let mut gradient = RgbaFrame::new(side, side, [255, 255, 255, 0]);
    let center = f64::from(side);
    for y in 0..side {
        for x in 0..side {
            let dist = (f64::from(x + y) - center) / std::f64::consts::SQRT_2;
            let alpha = PEAK_ALPHA * (1.0 - dist.abs() / BAND_HALF_WIDTH);
            if alpha > 0.0 {
                gradient.put_pixel(x, y, [255, 255, 255, alpha.round() as u8]);
            }
        }
    }
    gradient
}
