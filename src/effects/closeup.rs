use std::path::Path;

use kurbo::Vec2;

use crate::{
    anim::{self, AnimationStep},
    core::{FrameSequence, PipelineConfig},
    error::PromoResult,
    loader,
};

/// Zooms in while sliding left, drifts upward, then settles back to the
/// identity view. Keyframes at 0/1/3/4 seconds.
pub fn render(image_path: &Path, cfg: &PipelineConfig) -> PromoResult<FrameSequence> {
    let steps = [
        AnimationStep::new(Vec2::ZERO, 1.0, 0.0),
        AnimationStep::new(Vec2::new(-0.5, 0.0), 2.0, 1.0),
        AnimationStep::new(Vec2::new(-0.5, -1.0), 2.0, 3.0),
        AnimationStep::new(Vec2::ZERO, 1.0, 4.0),
    ];
    anim::validate_chain(&steps)?;

    let img = loader::load_rgba(image_path)?;

    let mut seq = FrameSequence::new();
    for pair in steps.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let segment_frames =
            ((b.timestamp_secs - a.timestamp_secs) * cfg.fps.as_f64()) as usize;
        for k in 0..segment_frames {
            let t = if segment_frames > 1 {
                k as f64 / (segment_frames - 1) as f64
            } else {
                0.0
            };
            let step = anim::lerp_step(a, b, t);
            let mut frame = img.clone();
            anim::apply_step(&step, &mut frame, &img);
            seq.push(frame)?;
        }
    }
    Ok(seq)
}
