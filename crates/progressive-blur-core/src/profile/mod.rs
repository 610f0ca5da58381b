//! Blur parameters.
//!
//! [`BlurProfile`] holds the geometry of the blur ramp and is validated when it
//! is built, including when it is deserialized. [`BlurSettings`] bundles a
//! profile with everything else the pipeline needs to know.
//!
//! ## Ramp Layout
//!
//! Positions are normalized along the blur axis (0.0 = sharp end):
//!
//! ```text
//! 0 ── clear_until ── blur_start ──────────── end_y ── 1
//!   sharp    lead-in ramp       main ramp          full blur
//! ```

mod easing;
mod preset;

pub use easing::{smootherstep, Easing};
pub use preset::Preset;

use crate::composite::AlphaHandling;
use crate::error::ConfigError;
use crate::layers::BlurAlgorithm;
use crate::weight::Direction;
use serde::{Deserialize, Serialize};

/// Default maximum blur radius in pixels.
pub const DEFAULT_MAX_BLUR: f32 = 50.0;
/// Default end of the fully sharp region.
pub const DEFAULT_CLEAR_UNTIL: f32 = 0.15;
/// Default start of the main blur ramp.
pub const DEFAULT_BLUR_START: f32 = 0.25;
/// Default start of the fully blurred region.
pub const DEFAULT_END_Y: f32 = 0.85;
/// Default weight reached at `blur_start`.
pub const DEFAULT_LEAD_IN: f32 = 0.0;
/// Default number of blurred layers between the sharp image and `max_blur`.
pub const DEFAULT_LAYER_COUNT: usize = 8;

/// Geometry of the blur ramp.
///
/// Invariant: `max_blur > 0`, all fractions within 0.0..=1.0,
/// `clear_until <= blur_start < end_y` and `0 <= lead_in < 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileFields")]
pub struct BlurProfile {
    max_blur: f32,
    clear_until: f32,
    blur_start: f32,
    end_y: f32,
    lead_in: f32,
}

/// Unvalidated mirror of [`BlurProfile`] used for deserialization.
#[derive(Deserialize)]
#[serde(default)]
struct ProfileFields {
    max_blur: f32,
    clear_until: f32,
    blur_start: f32,
    end_y: f32,
    lead_in: f32,
}

impl Default for ProfileFields {
    fn default() -> Self {
        let p = BlurProfile::DEFAULT;
        Self {
            max_blur: p.max_blur,
            clear_until: p.clear_until,
            blur_start: p.blur_start,
            end_y: p.end_y,
            lead_in: p.lead_in,
        }
    }
}

impl TryFrom<ProfileFields> for BlurProfile {
    type Error = ConfigError;

    fn try_from(f: ProfileFields) -> Result<Self, Self::Error> {
        BlurProfile::new(f.max_blur, f.clear_until, f.blur_start, f.end_y)?.with_lead_in(f.lead_in)
    }
}

impl BlurProfile {
    /// The library defaults: 50px, sharp until 15%, ramp 25%..85%.
    pub const DEFAULT: BlurProfile = BlurProfile {
        max_blur: DEFAULT_MAX_BLUR,
        clear_until: DEFAULT_CLEAR_UNTIL,
        blur_start: DEFAULT_BLUR_START,
        end_y: DEFAULT_END_Y,
        lead_in: DEFAULT_LEAD_IN,
    };

    /// Create a validated profile with no lead-in.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first violated constraint.
    pub fn new(
        max_blur: f32,
        clear_until: f32,
        blur_start: f32,
        end_y: f32,
    ) -> Result<Self, ConfigError> {
        let profile = Self {
            max_blur,
            clear_until,
            blur_start,
            end_y,
            lead_in: DEFAULT_LEAD_IN,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Return a copy that reaches `lead_in` weight at `blur_start`.
    ///
    /// Between `clear_until` and `blur_start` the weight rises linearly from
    /// 0 to `lead_in`; the main ramp then covers the rest up to 1.
    pub fn with_lead_in(self, lead_in: f32) -> Result<Self, ConfigError> {
        let profile = Self { lead_in, ..self };
        profile.validate()?;
        Ok(profile)
    }

    /// Check every invariant of the profile.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_blur.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "max_blur",
                value: self.max_blur,
            });
        }
        if self.max_blur <= 0.0 {
            return Err(ConfigError::NonPositiveMaxBlur(self.max_blur));
        }

        for (name, value) in [
            ("clear_until", self.clear_until),
            ("blur_start", self.blur_start),
            ("end_y", self.end_y),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::FractionOutOfRange { name, value });
            }
        }

        if self.clear_until > self.blur_start {
            return Err(ConfigError::ClearAfterStart {
                clear_until: self.clear_until,
                blur_start: self.blur_start,
            });
        }
        if self.end_y <= self.blur_start {
            return Err(ConfigError::DegenerateRamp {
                blur_start: self.blur_start,
                end_y: self.end_y,
            });
        }
        if !(0.0..1.0).contains(&self.lead_in) {
            return Err(ConfigError::LeadInOutOfRange(self.lead_in));
        }
        Ok(())
    }

    /// Maximum blur radius in pixels.
    pub fn max_blur(&self) -> f32 {
        self.max_blur
    }

    /// End of the fully sharp region.
    pub fn clear_until(&self) -> f32 {
        self.clear_until
    }

    /// Start of the main ramp.
    pub fn blur_start(&self) -> f32 {
        self.blur_start
    }

    /// Start of the fully blurred region.
    pub fn end_y(&self) -> f32 {
        self.end_y
    }

    /// Weight reached at `blur_start`.
    pub fn lead_in(&self) -> f32 {
        self.lead_in
    }
}

impl Default for BlurProfile {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything the pipeline needs besides the image.
///
/// Missing fields take their defaults when deserialized, so a partial
/// settings object (e.g. `{ "max_blur": 30.0 }`) is valid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurSettings {
    /// Ramp geometry and maximum radius.
    #[serde(flatten)]
    pub profile: BlurProfile,
    /// Axis along which blur increases. Ignored for mask-based blur.
    pub direction: Direction,
    /// Curve applied to the main ramp.
    pub easing: Easing,
    /// Blur primitive used for the layers.
    pub algorithm: BlurAlgorithm,
    /// Number of blurred layers between radius 0 and `max_blur`.
    pub layer_count: usize,
    /// How transparency is treated.
    pub alpha: AlphaHandling,
    /// Generate layers on the rayon thread pool when the `parallel`
    /// feature is enabled.
    pub parallel: bool,
}

impl Default for BlurSettings {
    fn default() -> Self {
        Self {
            profile: BlurProfile::DEFAULT,
            direction: Direction::default(),
            easing: Easing::default(),
            algorithm: BlurAlgorithm::default(),
            layer_count: DEFAULT_LAYER_COUNT,
            alpha: AlphaHandling::default(),
            parallel: true,
        }
    }
}

impl BlurSettings {
    /// Settings with the given profile and defaults for everything else.
    pub fn with_profile(profile: BlurProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    /// Check the settings that are not covered by [`BlurProfile`] itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.profile.validate()?;
        if self.layer_count == 0 {
            return Err(ConfigError::ZeroLayers);
        }
        Ok(())
    }
}
