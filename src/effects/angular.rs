use std::path::Path;

use crate::{
    composite,
    core::{FrameSequence, PipelineConfig},
    error::PromoResult,
    loader,
};

/// Shared template behind the corner-decoration effects: a matched pair of
/// authored overlay frame arrays is composited per frame, the top array at
/// (0, 0) and the bottom array at the image's bottom-right corner.
///
/// The pairs are authored with equal length; if they ever disagree the
/// sequence length is the shorter of the two.
pub fn render_angular(
    image_path: &Path,
    stem: &str,
    cfg: &PipelineConfig,
) -> PromoResult<FrameSequence> {
    let (top_frames, bottom_frames) = cfg.assets.overlay_pair(stem)?;
    let img = loader::load_rgba(image_path)?;

    let mut seq = FrameSequence::new();
    for (top, bottom) in top_frames.iter().zip(bottom_frames.iter()) {
        let mut frame = img.clone();
        composite::paste(&mut frame, top, 0, 0);
        let x = i64::from(img.width) - i64::from(bottom.width);
        let y = i64::from(img.height) - i64::from(bottom.height);
        composite::paste(&mut frame, bottom, x, y);
        seq.push(frame)?;
    }
    Ok(seq)
}
