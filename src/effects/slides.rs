use std::path::PathBuf;

use crate::{
    composite,
    core::{FrameSequence, PipelineConfig},
    error::{PromoError, PromoResult},
    loader,
};

/// Total play time of one pass across all slides.
const TOTAL_SECS: f64 = 8.5;
const TRANSITION_FRAMES: usize = 10;

/// Cycles through two or more images: holds each slide, then cross-dissolves
/// into the next, wrapping from the last back to the first.
pub fn render(image_paths: &[PathBuf], cfg: &PipelineConfig) -> PromoResult<FrameSequence> {
    if image_paths.len() < 2 {
        return Err(PromoError::configuration(
            "the slides effect needs at least two images",
        ));
    }

    let imgs = loader::load_normalized(image_paths, false)?;
    let secs_per_image = TOTAL_SECS / imgs.len() as f64;
    let frames_per_image = (secs_per_image * cfg.fps.as_f64()) as usize;
    let hold_frames = frames_per_image.saturating_sub(TRANSITION_FRAMES);

    let mut seq = FrameSequence::new();
    for (i, img) in imgs.iter().enumerate() {
        let next = &imgs[(i + 1) % imgs.len()];

        for _ in 0..hold_frames {
            seq.push(img.clone())?;
        }
        for k in 0..TRANSITION_FRAMES {
            let t = k as f64 / (TRANSITION_FRAMES - 1) as f64;
            seq.push(composite::blend_weighted(img, next, t))?;
        }
    }
    Ok(seq)
}
