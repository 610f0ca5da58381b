//! Named blur presets.

use super::{BlurProfile, BlurSettings, Easing};
use crate::error::ConfigError;
use crate::weight::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named, ready-made set of [`BlurSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Light blur confined to the bottom of the image.
    Subtle,
    /// Classic top-sharp, bottom-blurred look with a soft lead-in.
    Standard,
    /// Strong blur that starts early and builds slowly.
    Dramatic,
    /// Sharp center fading into blurred corners.
    Vignette,
}

impl Preset {
    /// Every preset, in display order.
    pub const ALL: [Preset; 4] = [
        Preset::Subtle,
        Preset::Standard,
        Preset::Dramatic,
        Preset::Vignette,
    ];

    /// Lowercase name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Preset::Subtle => "subtle",
            Preset::Standard => "standard",
            Preset::Dramatic => "dramatic",
            Preset::Vignette => "vignette",
        }
    }

    /// The settings this preset stands for.
    pub fn settings(self) -> BlurSettings {
        let defaults = BlurSettings::default();
        match self {
            Preset::Subtle => BlurSettings {
                profile: BlurProfile {
                    max_blur: 20.0,
                    clear_until: 0.3,
                    blur_start: 0.45,
                    end_y: 0.95,
                    lead_in: 0.0,
                },
                easing: Easing::Smoothstep,
                layer_count: 6,
                ..defaults
            },
            Preset::Standard => BlurSettings {
                profile: BlurProfile {
                    lead_in: 0.3,
                    ..BlurProfile::DEFAULT
                },
                ..defaults
            },
            Preset::Dramatic => BlurSettings {
                profile: BlurProfile {
                    max_blur: 80.0,
                    clear_until: 0.05,
                    blur_start: 0.15,
                    end_y: 0.7,
                    lead_in: 0.3,
                },
                easing: Easing::EaseIn,
                layer_count: 12,
                ..defaults
            },
            Preset::Vignette => BlurSettings {
                profile: BlurProfile {
                    max_blur: 40.0,
                    clear_until: 0.3,
                    blur_start: 0.45,
                    end_y: 0.9,
                    lead_in: 0.0,
                },
                direction: Direction::CenterToEdges,
                easing: Easing::Smootherstep,
                ..defaults
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}
