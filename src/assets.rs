use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use image::AnimationDecoder as _;

use crate::{
    core::{Fps, RgbaFrame},
    error::{PromoError, PromoResult},
};

/// On-disk locations of the pre-rendered decorations a deployment ships with.
///
/// Angular-overlay effects read a matched `<stem>_top/` + `<stem>_bottom/`
/// pair of PNG frame directories; the external-compositor effects read a
/// matched `<stem>_top.mov` + `<stem>_bottom.mov` clip pair.
#[derive(Clone, Debug)]
pub struct AssetLibrary {
    pub animations_dir: PathBuf,
    pub clips_dir: PathBuf,
    pub watermark_png: PathBuf,
    pub badge_gif: PathBuf,
}

impl Default for AssetLibrary {
    fn default() -> Self {
        Self::rooted("assets")
    }
}

impl AssetLibrary {
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            animations_dir: root.join("animations"),
            clips_dir: root.join("clips"),
            watermark_png: root.join("watermark.png"),
            badge_gif: root.join("animations").join("sale.gif"),
        }
    }

    /// Loads the top/bottom overlay frame arrays for an angular effect.
    pub fn overlay_pair(&self, stem: &str) -> PromoResult<(Vec<RgbaFrame>, Vec<RgbaFrame>)> {
        let top = load_overlay_frames(&self.animations_dir.join(format!("{stem}_top")))?;
        let bottom = load_overlay_frames(&self.animations_dir.join(format!("{stem}_bottom")))?;
        Ok((top, bottom))
    }

    /// Resolves the top/bottom clip pair for an external-compositor effect,
    /// failing before any tool invocation if either file is absent.
    pub fn clip_pair(&self, stem: &str) -> PromoResult<(PathBuf, PathBuf)> {
        let top = self.clips_dir.join(format!("{stem}_top.mov"));
        let bottom = self.clips_dir.join(format!("{stem}_bottom.mov"));
        for clip in [&top, &bottom] {
            if !clip.is_file() {
                return Err(PromoError::asset_missing(format!(
                    "overlay clip '{}' not found",
                    clip.display()
                )));
            }
        }
        Ok((top, bottom))
    }

    pub fn watermark(&self) -> PromoResult<&Path> {
        if !self.watermark_png.is_file() {
            return Err(PromoError::asset_missing(format!(
                "watermark logo '{}' not found",
                self.watermark_png.display()
            )));
        }
        Ok(&self.watermark_png)
    }
}

/// Reads a directory of numbered PNG frames, sorted by file name.
pub fn load_overlay_frames(dir: &Path) -> PromoResult<Vec<RgbaFrame>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        PromoError::asset_missing(format!(
            "overlay frame directory '{}' not readable: {e}",
            dir.display()
        ))
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("png"))
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(PromoError::asset_missing(format!(
            "overlay frame directory '{}' contains no PNG frames",
            dir.display()
        )));
    }

    let mut frames = Vec::with_capacity(paths.len());
    for path in &paths {
        frames.push(crate::loader::load_rgba(path)?);
    }
    Ok(frames)
}

/// Decomposes an animated GIF into RGBA frames at the pipeline frame rate.
///
/// Each source frame is duplicated so that the GIF's natural pacing survives
/// resampling to `fps`; `target_duration` retimes the whole animation by
/// stretching or compressing that duplication factor.
pub fn decompose_gif(
    path: &Path,
    fps: Fps,
    target_duration: Option<f64>,
) -> PromoResult<Vec<RgbaFrame>> {
    let file = File::open(path).map_err(|e| {
        PromoError::asset_missing(format!("gif asset '{}' not found: {e}", path.display()))
    })?;
    let decoder = image::codecs::gif::GifDecoder::new(BufReader::new(file))
        .with_context(|| format!("open gif '{}'", path.display()))?;
    let source_frames = decoder
        .into_frames()
        .collect_frames()
        .with_context(|| format!("decode gif frames from '{}'", path.display()))?;

    if source_frames.is_empty() {
        return Err(PromoError::asset_missing(format!(
            "gif '{}' contains no frames",
            path.display()
        )));
    }

    let total_secs: f64 = source_frames
        .iter()
        .map(|f| {
            let (num, den) = f.delay().numer_denom_ms();
            f64::from(num) / f64::from(den) / 1000.0
        })
        .sum();
    // GIFs with zero delays get the conventional 100 ms per frame.
    let per_frame_secs = if total_secs > 0.0 {
        total_secs / source_frames.len() as f64
    } else {
        0.1
    };
    let natural_duration = per_frame_secs * source_frames.len() as f64;
    let stretch = match target_duration {
        Some(target) if target > 0.0 => natural_duration / target,
        _ => 1.0,
    };

    let repeats = frame_repeats(fps, per_frame_secs, stretch);
    let mut frames = Vec::with_capacity(source_frames.len() * repeats);
    for frame in source_frames {
        let buffer = RgbaFrame::from_image(frame.into_buffer());
        for _ in 0..repeats {
            frames.push(buffer.clone());
        }
    }
    Ok(frames)
}

/// How many output frames one GIF frame occupies at `fps`.
pub fn frame_repeats(fps: Fps, per_frame_secs: f64, stretch: f64) -> usize {
    ((fps.as_f64() * per_frame_secs / stretch) as usize).max(1)
}
