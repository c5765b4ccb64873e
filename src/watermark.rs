//! Burns the static logo onto a finished video, 10 px in from the
//! bottom-right corner.

use std::{path::Path, process::Command};

use crate::{core::PipelineConfig, encode, error::PromoResult};

const LOGO_FILTER: &str = "overlay=W-w-10:H-h-10";

pub fn burn_logo(input_video: &Path, output_video: &Path, cfg: &PipelineConfig) -> PromoResult<()> {
    let logo = cfg.assets.watermark()?;
    encode::ensure_parent_dir(output_video)?;

    tracing::debug!(
        input = %input_video.display(),
        out = %output_video.display(),
        "burning watermark"
    );

    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-i")
        .arg(input_video)
        .arg("-i")
        .arg(logo)
        .args([
            "-y",
            "-filter_complex",
            LOGO_FILTER,
            "-an",
            "-preset",
            "ultrafast",
            "-threads",
            "0",
            "-crf",
            &cfg.overlay_crf.to_string(),
        ])
        .arg(output_video);

    encode::run_tool(cmd, "watermark overlay")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PromoError;

    #[test]
    fn missing_logo_is_asset_missing() {
        let cfg = PipelineConfig::default().with_asset_root("no/such/root");
        let err = burn_logo(
            Path::new("in.mp4"),
            Path::new("target/out.mp4"),
            &cfg,
        )
        .unwrap_err();
        assert!(matches!(err, PromoError::AssetMissing(_)));
    }
}
