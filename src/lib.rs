#![forbid(unsafe_code)]

pub mod anim;
pub mod assets;
pub mod bridge;
pub mod composite;
pub mod core;
pub mod effects;
pub mod encode;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod watermark;

pub use assets::AssetLibrary;
pub use core::{Fps, FrameSequence, PipelineConfig, RgbaFrame};
pub use effects::Effect;
pub use error::{PromoError, PromoResult};
pub use pipeline::{JobSpec, render_promo};
