use std::path::PathBuf;

use crate::{
    assets::AssetLibrary,
    error::{PromoError, PromoResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> PromoResult<Self> {
        if num == 0 {
            return Err(PromoError::configuration("Fps num must be > 0"));
        }
        if den == 0 {
            return Err(PromoError::configuration("Fps den must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * f64::from(self.den) / f64::from(self.num)
    }

    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        (secs * self.as_f64()).ceil().max(0.0) as u64
    }
}

/// Straight (non-premultiplied) RGBA8 raster, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbaFrame {
    pub fn new(width: u32, height: u32, fill: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..(width * height) {
            data.extend_from_slice(&fill);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn from_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    /// Clones the pixel data into an `image` buffer for resize/encode interop.
    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .expect("RgbaFrame data length matches width*height*4")
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.pixel_offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = self.pixel_offset(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }

    pub(crate) fn pixel_offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        ((y * self.width + x) * 4) as usize
    }
}

/// Ordered list of same-sized frames at one frame rate.
///
/// Frames are immutable once pushed; `push` rejects dimension mismatches so
/// that every sequence handed to the encoder is uniform.
#[derive(Clone, Debug, Default)]
pub struct FrameSequence {
    frames: Vec<RgbaFrame>,
}

impl FrameSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: RgbaFrame) -> PromoResult<()> {
        if let Some(first) = self.frames.first()
            && (first.width != frame.width || first.height != frame.height)
        {
            return Err(PromoError::configuration(format!(
                "frame size mismatch in sequence: got {}x{}, expected {}x{}",
                frame.width, frame.height, first.width, first.height
            )));
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[RgbaFrame] {
        &self.frames
    }

    pub fn dimensions(&self) -> PromoResult<(u32, u32)> {
        let first = self
            .frames
            .first()
            .ok_or_else(|| PromoError::configuration("frame sequence is empty"))?;
        Ok((first.width, first.height))
    }

    pub fn duration_secs(&self, fps: Fps) -> f64 {
        fps.frames_to_secs(self.frames.len() as u64)
    }

    /// Number of whole passes needed to cover `min_secs` of playback.
    pub fn loops_for_min_duration(&self, min_secs: f64, fps: Fps) -> u64 {
        let d = self.duration_secs(fps);
        if d <= 0.0 {
            return 1;
        }
        (min_secs / d).ceil().max(1.0) as u64
    }
}

/// Job-wide knobs, threaded explicitly into each stage instead of living in
/// process globals. `Default` gives the production values.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub fps: Fps,
    /// Every synthesized video except Glare is looped up to at least this.
    pub min_duration_secs: f64,
    /// Dimension guard: inputs with a longer side above this are downscaled.
    pub max_image_side: u32,
    /// Constant-rate-factor for the software-synthesized frame path.
    pub synth_crf: u8,
    /// Constant-rate-factor for the external-compositor and watermark passes.
    /// Intentionally different from `synth_crf`; inherited behavior.
    pub overlay_crf: u8,
    /// Keep the unwatermarked intermediate next to the final output.
    pub keep_intermediate: bool,
    pub assets: AssetLibrary,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fps: Fps { num: 60, den: 1 },
            min_duration_secs: 8.0,
            max_image_side: 1100,
            synth_crf: 20,
            overlay_crf: 30,
            keep_intermediate: true,
            assets: AssetLibrary::default(),
        }
    }
}

impl PipelineConfig {
    pub fn with_assets(mut self, assets: AssetLibrary) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_asset_root(self, root: impl Into<PathBuf>) -> Self {
        self.with_assets(AssetLibrary::rooted(root))
    }
}
