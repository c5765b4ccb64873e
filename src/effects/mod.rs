//! Effect registry and the procedural frame generators behind it.

mod angular;
mod badge;
mod closeup;
mod glare;
mod slides;

use std::path::PathBuf;

use crate::{
    core::{FrameSequence, PipelineConfig},
    error::{PromoError, PromoResult},
};

pub use angular::render_angular;

/// The closed set of visual treatments a job can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    Glare,
    SaleBadge,
    Slides,
    CloseUpAndSlideDown,
    BlueStarsMany,
    Pixels,
    Flames,
    FlashlightsMany,
    Flashlights,
    SaleMany,
    SaleOne,
}

pub const ALL_EFFECTS: [Effect; 11] = [
    Effect::Glare,
    Effect::SaleBadge,
    Effect::Slides,
    Effect::CloseUpAndSlideDown,
    Effect::BlueStarsMany,
    Effect::Pixels,
    Effect::Flames,
    Effect::FlashlightsMany,
    Effect::Flashlights,
    Effect::SaleMany,
    Effect::SaleOne,
];

impl Effect {
    /// Display name in the product language.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Glare => "Блеск",
            Self::SaleBadge => "Значок скидки",
            Self::Slides => "Слайды",
            Self::CloseUpAndSlideDown => "Крупный план и движение вниз",
            Self::BlueStarsMany => "Много синих звезд",
            Self::Pixels => "Пиксели",
            Self::Flames => "Огонь",
            Self::FlashlightsMany => "Много фонарей",
            Self::Flashlights => "Фонари",
            Self::SaleMany => "Много скидок",
            Self::SaleOne => "Одна скидка",
        }
    }

    /// Resolves a display name, falling back to [`Effect::Glare`] when the
    /// name is unknown. This sits on a conversational input path, so the
    /// registry never rejects input; callers that need strictness should
    /// compare against [`ALL_EFFECTS`] themselves.
    pub fn from_display_name(name: &str) -> Self {
        ALL_EFFECTS
            .into_iter()
            .find(|e| e.display_name() == name)
            .unwrap_or(Self::Glare)
    }

    /// Effects shipped as pre-rendered clip pairs route through the external
    /// compositor instead of the frame-synthesis path.
    pub fn uses_external_compositor(self) -> bool {
        self.asset_stem().is_some()
    }

    /// Slides is the only effect consuming an ordered set of images.
    pub fn accepts_many_images(self) -> bool {
        matches!(self, Self::Slides)
    }

    /// Asset stem for the corner-decoration effects (overlay frame arrays
    /// and clip pairs share a stem per effect).
    pub fn asset_stem(self) -> Option<&'static str> {
        match self {
            Self::BlueStarsMany => Some("blue_stars_many"),
            Self::Pixels => Some("pixels"),
            Self::Flames => Some("flames"),
            Self::FlashlightsMany => Some("flashlights_many"),
            Self::Flashlights => Some("flashlights"),
            Self::SaleMany => Some("sale_many"),
            Self::SaleOne => Some("sale_one"),
            _ => None,
        }
    }
}

/// Synthesizes the frame sequence for `effect` from the given source images.
///
/// Single-image effects use the first path; the corner-decoration effects
/// render from the authored overlay frame arrays (their clip-backed external
/// route is chosen by the pipeline, not here).
pub fn synthesize(
    effect: Effect,
    images: &[PathBuf],
    cfg: &PipelineConfig,
) -> PromoResult<FrameSequence> {
    let first = images
        .first()
        .ok_or_else(|| PromoError::configuration("at least one source image is required"))?;

    match effect {
        Effect::Glare => glare::render(first, cfg),
        Effect::SaleBadge => badge::render(first, cfg),
        Effect::Slides => slides::render(images, cfg),
        Effect::CloseUpAndSlideDown => closeup::render(first, cfg),
        other => {
            let stem = other.asset_stem().ok_or_else(|| {
                PromoError::configuration(format!("effect {other:?} has no overlay assets"))
            })?;
            angular::render_angular(first, stem, cfg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_are_unique_and_round_trip() {
        for effect in ALL_EFFECTS {
            assert_eq!(Effect::from_display_name(effect.display_name()), effect);
        }
        let names: std::collections::HashSet<_> =
            ALL_EFFECTS.iter().map(|e| e.display_name()).collect();
        assert_eq!(names.len(), ALL_EFFECTS.len());
    }

    #[test]
    fn unknown_display_name_falls_back_to_glare() {
        assert_eq!(Effect::from_display_name("нет такого"), Effect::Glare);
        assert_eq!(Effect::from_display_name(""), Effect::Glare);
    }

    #[test]
    fn classification_sets_match_the_effect_table() {
        let external: Vec<_> = ALL_EFFECTS
            .into_iter()
            .filter(|e| e.uses_external_compositor())
            .collect();
        assert_eq!(external.len(), 7);
        assert!(!Effect::Glare.uses_external_compositor());
        assert!(!Effect::Slides.uses_external_compositor());

        let multi: Vec<_> = ALL_EFFECTS
            .into_iter()
            .filter(|e| e.accepts_many_images())
            .collect();
        assert_eq!(multi, vec![Effect::Slides]);
    }

    #[test]
    fn serde_names_are_snake_case() {
        let json = serde_json::to_string(&Effect::CloseUpAndSlideDown).unwrap();
        assert_eq!(json, "\"close_up_and_slide_down\"");
    }
}
