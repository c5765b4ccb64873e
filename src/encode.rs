use std::{
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::{
    core::{Fps, FrameSequence, RgbaFrame},
    error::{PromoError, PromoResult},
};

/// The only container this pipeline produces.
pub const VIDEO_EXTENSION: &str = "mp4";

/// Fails fast when the destination does not end in `.mp4`. Runs before any
/// image is touched.
pub fn validate_output_path(path: &Path) -> PromoResult<()> {
    if path.extension().and_then(|e| e.to_str()) != Some(VIDEO_EXTENSION) {
        return Err(PromoError::configuration(format!(
            "output path '{}' must end in .{VIDEO_EXTENSION}",
            path.display()
        )));
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    pub crf: u8,
    pub out_path: PathBuf,
}

impl EncodeConfig {
    pub fn validate(&self) -> PromoResult<()> {
        validate_output_path(&self.out_path)?;
        if self.width == 0 || self.height == 0 {
            return Err(PromoError::configuration(
                "encode width/height must be non-zero",
            ));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // yuv420p output rejects odd chroma-subsampled dimensions.
            return Err(PromoError::configuration(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> PromoResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Runs a fully-assembled ffmpeg invocation with captured output, turning a
/// non-zero exit status into an `Encoding` error carrying the tool's stderr.
pub(crate) fn run_tool(mut cmd: Command, what: &str) -> PromoResult<()> {
    let output = cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            PromoError::encoding(format!(
                "failed to run ffmpeg for {what} (is it installed and on PATH?): {e}"
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PromoError::encoding(format!(
            "ffmpeg {what} exited with status {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    Ok(())
}

/// Streams raw RGBA frames into a system-`ffmpeg` child encoding H.264/yuv420p.
///
/// The system binary is used rather than native FFmpeg bindings to avoid dev
/// header/lib requirements.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    child: Child,
    stdin: Option<ChildStdin>,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig) -> PromoResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !is_ffmpeg_on_path() {
            return Err(PromoError::encoding(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-crf",
            &cfg.crf.to_string(),
            "-movflags",
            "+faststart",
        ])
        .arg(&cfg.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            PromoError::encoding(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| PromoError::encoding("failed to open ffmpeg stdin (unexpected)"))?;

        Ok(Self {
            cfg,
            child,
            stdin: Some(stdin),
        })
    }

    pub fn encode_frame(&mut self, frame: &RgbaFrame) -> PromoResult<()> {
        if frame.width != self.cfg.width || frame.height != self.cfg.height {
            return Err(PromoError::configuration(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(PromoError::encoding("ffmpeg encoder is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&frame.data).map_err(|e| {
            PromoError::encoding(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    pub fn finish(mut self) -> PromoResult<()> {
        drop(self.stdin.take());

        let output = self.child.wait_with_output().map_err(|e| {
            PromoError::encoding(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PromoError::encoding(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Encodes `loops` passes of the sequence back to back, guaranteeing the
/// minimum-duration policy without materializing the looped frames.
pub fn encode_sequence(seq: &FrameSequence, loops: u64, cfg: EncodeConfig) -> PromoResult<()> {
    if seq.is_empty() {
        return Err(PromoError::configuration(
            "cannot encode an empty frame sequence",
        ));
    }

    tracing::debug!(
        frames = seq.len(),
        loops,
        out = %cfg.out_path.display(),
        "encoding frame sequence"
    );

    let mut encoder = FfmpegEncoder::new(cfg)?;
    for _ in 0..loops.max(1) {
        for frame in seq.frames() {
            encoder.encode_frame(frame)?;
        }
    }
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(width: u32, height: u32, out: &str) -> EncodeConfig {
        EncodeConfig {
            width,
            height,
            fps: Fps::new(60, 1).unwrap(),
            crf: 20,
            out_path: PathBuf::from(out),
        }
    }

    #[test]
    fn output_path_must_be_mp4() {
        assert!(validate_output_path(Path::new("out.mp4")).is_ok());
        for bad in ["out.avi", "out.mp4.tmp", "out", "out."] {
            let err = validate_output_path(Path::new(bad)).unwrap_err();
            assert!(matches!(err, PromoError::Configuration(_)), "{bad}");
        }
    }

    #[test]
    fn config_validation_catches_bad_values() {
        assert!(cfg(0, 10, "target/out.mp4").validate().is_err());
        assert!(cfg(11, 10, "target/out.mp4").validate().is_err());
        assert!(cfg(10, 10, "target/out.webm").validate().is_err());
        assert!(cfg(10, 10, "target/out.mp4").validate().is_ok());
    }
}
