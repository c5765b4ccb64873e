use std::path::Path;

use crate::{
    assets, composite,
    core::{FrameSequence, PipelineConfig},
    error::PromoResult,
    loader,
};

/// Pins the animated sale badge to the image's bottom-right corner, one
/// output frame per decomposed GIF frame.
pub fn render(image_path: &Path, cfg: &PipelineConfig) -> PromoResult<FrameSequence> {
    let badge_frames = assets::decompose_gif(&cfg.assets.badge_gif, cfg.fps, None)?;
    let img = loader::load_rgba(image_path)?;

    let mut seq = FrameSequence::new();
    for badge in &badge_frames {
        let mut frame = img.clone();
        let x = i64::from(img.width) - i64::from(badge.width);
        let y = i64::from(img.height) - i64::from(badge.height);
        composite::paste(&mut frame, badge, x, y);
        seq.push(frame)?;
    }
    Ok(seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetLibrary;

    #[test]
    fn badge_lands_bottom_right() {
        let dir = std::path::PathBuf::from("target").join("badge_test");
        let animations = dir.join("animations");
        std::fs::create_dir_all(&animations).unwrap();

        // One-frame red badge gif, 100 ms delay.
        let gif_path = animations.join("sale.gif");
        {
            let out = std::fs::File::create(&gif_path).unwrap();
            let mut encoder = image::codecs::gif::GifEncoder::new(out);
            let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255]));
            encoder
                .encode_frame(image::Frame::from_parts(
                    img,
                    0,
                    0,
                    image::Delay::from_numer_denom_ms(100, 1),
                ))
                .unwrap();
        }

        let src = dir.join("src.png");
        image::RgbaImage::from_pixel(16, 12, image::Rgba([0, 0, 255, 255]))
            .save(&src)
            .unwrap();

        let mut lib = AssetLibrary::rooted(&dir);
        lib.badge_gif = gif_path;
        let cfg = PipelineConfig::default().with_assets(lib);

        let seq = render(&src, &cfg).unwrap();
        // One 100 ms gif frame becomes 6 output frames at 60 fps.
        assert_eq!(seq.len(), 6);
        let frame = &seq.frames()[0];
        // GIF decoding quantizes color but red must dominate in the corner.
        let corner = frame.pixel(14, 10);
        assert!(corner[0] > 200 && corner[2] < 50);
        assert_eq!(frame.pixel(0, 0), [0, 0, 255, 255]);
    }
}
