use std::path::{Path, PathBuf};

use crate::{
    bridge,
    core::PipelineConfig,
    effects::{self, Effect},
    encode::{self, EncodeConfig},
    error::{PromoError, PromoResult},
    loader, watermark,
};

/// One rendering job as supplied by the caller: local image paths that
/// already exist, an effect display name, a watermark flag and an `.mp4`
/// destination.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct JobSpec {
    pub images: Vec<PathBuf>,
    /// Effect display name; unknown names fall back to the default effect.
    pub effect: String,
    #[serde(default)]
    pub watermark: bool,
    pub out: PathBuf,
}

/// Runs one job end to end and returns the finished video path.
///
/// Validation happens before any image is touched; the dimension guard then
/// rewrites oversized inputs in place; the effect routes either through
/// frame synthesis + the encoder or through the external compositor; the
/// watermark pass, when requested, writes the final file from a uuid-keyed
/// intermediate. The unwatermarked intermediate is retained by default so a
/// later buy-to-remove-watermark flow can reuse it.
#[tracing::instrument(skip(job, cfg), fields(effect = %job.effect, out = %job.out.display()))]
pub fn render_promo(job: &JobSpec, cfg: &PipelineConfig) -> PromoResult<PathBuf> {
    encode::validate_output_path(&job.out)?;
    if job.images.is_empty() {
        return Err(PromoError::configuration(
            "at least one source image is required",
        ));
    }

    let effect = Effect::from_display_name(&job.effect);
    if effect.accepts_many_images() && job.images.len() < 2 {
        return Err(PromoError::configuration(format!(
            "effect '{}' needs at least two images",
            effect.display_name()
        )));
    }

    loader::shrink_oversized(&job.images, cfg.max_image_side)?;

    let render_target = if job.watermark {
        intermediate_path(&job.out)
    } else {
        job.out.clone()
    };

    if effect.uses_external_compositor() {
        tracing::info!(?effect, "rendering via external compositor");
        bridge::compose_with_clips(&job.images[0], effect, &render_target, cfg)?;
    } else {
        tracing::info!(?effect, "rendering via frame synthesis");
        let seq = effects::synthesize(effect, &job.images, cfg)?;
        // Glare plays its natural duration once; everything else is looped
        // up to the pipeline minimum.
        let loops = if effect == Effect::Glare {
            1
        } else {
            seq.loops_for_min_duration(cfg.min_duration_secs, cfg.fps)
        };
        let (width, height) = seq.dimensions()?;
        encode::encode_sequence(
            &seq,
            loops,
            EncodeConfig {
                width,
                height,
                fps: cfg.fps,
                crf: cfg.synth_crf,
                out_path: render_target.clone(),
            },
        )?;
    }

    if job.watermark {
        watermark::burn_logo(&render_target, &job.out, cfg)?;
        if !cfg.keep_intermediate {
            let _ = std::fs::remove_file(&render_target);
        }
    }

    tracing::info!(out = %job.out.display(), "job finished");
    Ok(job.out.clone())
}

/// Sibling of the destination keyed by a random id; uniqueness of the name
/// is the only collision protection between concurrent jobs.
fn intermediate_path(out: &Path) -> PathBuf {
    let stem = out
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("render");
    out.with_file_name(format!(
        "{stem}.{}.{}",
        uuid::Uuid::new_v4(),
        encode::VIDEO_EXTENSION
    ))
}
