//! Easing curves that shape the blur ramp.
//!
//! An easing maps the linear ramp position `u` (0.0 at `blur_start`,
//! 1.0 at `end_y`) to the fraction of the ramp that has been covered.
//! Every built-in curve maps 0 to 0 and 1 to 1 and never decreases in between.

use serde::{Deserialize, Serialize};

/// Transition curve applied to the blur ramp.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Straight ramp.
    #[default]
    Linear,
    /// Quadratic, slow start.
    EaseIn,
    /// Quadratic, slow finish.
    EaseOut,
    /// Quadratic, slow start and finish.
    EaseInOut,
    /// Hermite `3u² - 2u³`.
    Smoothstep,
    /// Perlin's `6u⁵ - 15u⁴ + 10u³`.
    Smootherstep,
    /// `(2^(10u) - 1) / 1023`, stays near zero for most of the ramp.
    Exponential,
    /// Quarter cosine wave, `1 - cos(u·π/2)`.
    Sine,
    /// Caller-supplied curve. The result is clamped to 0.0..=1.0 but is
    /// otherwise trusted, including monotonicity.
    #[serde(skip)]
    Custom(fn(f32) -> f32),
}

impl Easing {
    /// Evaluate the curve at `u` (clamped to 0.0..=1.0 first).
    pub fn apply(self, u: f32) -> f32 {
        let u = if u.is_nan() { 0.0 } else { u.clamp(0.0, 1.0) };
        let eased = match self {
            Easing::Linear => u,
            Easing::EaseIn => u * u,
            Easing::EaseOut => 1.0 - (1.0 - u) * (1.0 - u),
            Easing::EaseInOut => {
                if u < 0.5 {
                    2.0 * u * u
                } else {
                    let v = -2.0 * u + 2.0;
                    1.0 - v * v / 2.0
                }
            }
            Easing::Smoothstep => u * u * (3.0 - 2.0 * u),
            Easing::Smootherstep => smootherstep(u),
            Easing::Exponential => (2.0_f32.powf(10.0 * u) - 1.0) / 1023.0,
            Easing::Sine => 1.0 - (u * std::f32::consts::FRAC_PI_2).cos(),
            Easing::Custom(f) => f(u),
        };
        if eased.is_nan() {
            0.0
        } else {
            eased.clamp(0.0, 1.0)
        }
    }

    /// Whether this is a caller-supplied curve.
    pub fn is_custom(self) -> bool {
        matches!(self, Easing::Custom(_))
    }
}

/// Smootherstep interpolation function.
///
/// Returns values from 0.0 to 1.0 with zero velocity and acceleration at boundaries,
/// producing smooth, natural-looking transitions without visible banding.
///
/// Formula: `6t^5 - 15t^4 + 10t^3`
#[inline]
pub fn smootherstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}
