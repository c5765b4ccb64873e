//! External compositor path for the effects that ship as authored video
//! clips instead of overlay frame arrays. The still image is handed straight
//! to the tool and never decoded in-process here.

use std::{path::Path, process::Command};

use crate::{
    core::PipelineConfig,
    effects::Effect,
    encode,
    error::{PromoError, PromoResult},
};

/// Overlay the top clip at the origin and the bottom clip at the
/// bottom-right corner, then hold the last frame for 3 extra seconds.
const OVERLAY_FILTER: &str = "[0][1]overlay=0:0[tmp];[tmp][2]overlay=W-w:H-h[video];[video]tpad=stop_duration=3:stop_mode=clone";

/// Composites the effect's clip pair onto the still image in one ffmpeg run.
pub fn compose_with_clips(
    image_path: &Path,
    effect: Effect,
    out_path: &Path,
    cfg: &PipelineConfig,
) -> PromoResult<()> {
    let stem = effect.asset_stem().ok_or_else(|| {
        PromoError::configuration(format!(
            "effect {effect:?} has no pre-rendered clip pair and cannot use the external compositor"
        ))
    })?;
    let (top_clip, bottom_clip) = cfg.assets.clip_pair(stem)?;
    encode::ensure_parent_dir(out_path)?;

    tracing::debug!(
        image = %image_path.display(),
        ?effect,
        out = %out_path.display(),
        "compositing clip pair"
    );

    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-hwaccel", "auto", "-i"])
        .arg(image_path)
        .arg("-i")
        .arg(&top_clip)
        .arg("-i")
        .arg(&bottom_clip)
        .args([
            "-y",
            "-tune",
            "stillimage",
            "-shortest",
            "-filter_complex",
            OVERLAY_FILTER,
            "-preset",
            "ultrafast",
            "-an",
            "-threads",
            "0",
            "-crf",
            &cfg.overlay_crf.to_string(),
        ])
        .arg(out_path);

    encode::run_tool(cmd, "clip compositing")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn clipless_effect_is_rejected() {
        let cfg = PipelineConfig::default();
        let err = compose_with_clips(
            Path::new("img.png"),
            Effect::Glare,
            Path::new("target/out.mp4"),
            &cfg,
        )
        .unwrap_err();
        assert!(matches!(err, PromoError::Configuration(_)));
    }

    #[test]
    fn missing_clips_fail_before_tool_invocation() {
        let cfg = PipelineConfig::default().with_asset_root(PathBuf::from("no/such/root"));
        let err = compose_with_clips(
            Path::new("img.png"),
            Effect::Flames,
            Path::new("target/out.mp4"),
            &cfg,
        )
        .unwrap_err();
        assert!(matches!(err, PromoError::AssetMissing(_)));
    }
}
