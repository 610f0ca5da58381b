//! Per-pixel blur weights.
//!
//! This module turns a [`BlurProfile`] and a [`Direction`] (or a caller-supplied
//! mask) into a [`WeightField`]: one value per pixel from 0.0 (sharp) to 1.0
//! (blurred at `max_blur`).
//!
//! ## Algorithm
//!
//! For named directions each pixel is mapped to a normalized position `t`
//! along the blur axis, and `t` is passed through [`blur_weight`]. Custom masks
//! are validated and used as-is.

mod direction;

pub use direction::Direction;

use crate::error::ConfigError;
use crate::profile::{BlurProfile, Easing};

/// Blur intensity at normalized position `t`.
///
/// Returns 0.0 before `clear_until`, rises linearly to `lead_in` at
/// `blur_start`, follows `easing` from there to 1.0 at `end_y`, and stays at
/// 1.0 afterwards. `t` is clamped to 0.0..=1.0 first; NaN counts as 0.0.
///
/// # Example
/// ```
/// use progressive_blur_core::{blur_weight, BlurProfile, Easing};
///
/// let profile = BlurProfile::default();
/// assert_eq!(blur_weight(0.1, &profile, Easing::Linear), 0.0);
/// assert_eq!(blur_weight(0.9, &profile, Easing::Linear), 1.0);
/// ```
pub fn blur_weight(t: f32, profile: &BlurProfile, easing: Easing) -> f32 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

    if t < profile.clear_until() {
        return 0.0;
    }
    if t >= profile.end_y() {
        return 1.0;
    }

    let lead_in = profile.lead_in();
    if t < profile.blur_start() {
        // clear_until <= t < blur_start, so the span is non-zero here
        let span = profile.blur_start() - profile.clear_until();
        return lead_in * (t - profile.clear_until()) / span;
    }

    let u = (t - profile.blur_start()) / (profile.end_y() - profile.blur_start());
    (lead_in + (1.0 - lead_in) * easing.apply(u)).clamp(0.0, 1.0)
}

/// Blur intensity for every pixel of an image, row-major.
///
/// Values are always within 0.0..=1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightField {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl WeightField {
    /// Wrap caller-supplied weights.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MaskLength`] if `values` does not hold exactly
    /// `width * height` entries, [`ConfigError::MaskValueOutOfRange`] for the
    /// first value outside 0.0..=1.0.
    pub fn new(width: u32, height: u32, values: Vec<f32>) -> Result<Self, ConfigError> {
        let expected = (width as usize) * (height as usize);
        if values.len() != expected {
            return Err(ConfigError::MaskLength {
                width,
                height,
                expected,
                actual: values.len(),
            });
        }

        if let Some(idx) = values.iter().position(|v| !(0.0..=1.0).contains(v)) {
            return Err(ConfigError::MaskValueOutOfRange {
                x: (idx % width as usize) as u32,
                y: (idx / width as usize) as u32,
                value: values[idx],
            });
        }

        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// Build a mask by evaluating `f(x, y)` for every pixel.
    ///
    /// # Example
    /// ```
    /// use progressive_blur_core::WeightField;
    ///
    /// // Diagonal gradient, sharp in the top-left corner
    /// let (w, h) = (64, 48);
    /// let mask = WeightField::from_fn(w, h, |x, y| {
    ///     ((x + y) as f32 / (w + h) as f32).min(1.0)
    /// })
    /// .unwrap();
    /// assert_eq!(mask.get(0, 0), 0.0);
    /// ```
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self, ConfigError>
    where
        F: FnMut(u32, u32) -> f32,
    {
        let mut values = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                values.push(f(x, y));
            }
        }
        Self::new(width, height, values)
    }

    /// Build a mask from an 8-bit grayscale image (0 = sharp, 255 = full blur).
    pub fn from_luma(mask: &image::GrayImage) -> Self {
        let (width, height) = mask.dimensions();
        let values = mask.as_raw().iter().map(|&v| v as f32 / 255.0).collect();
        Self {
            width,
            height,
            values,
        }
    }

    /// Compute the field for a named direction.
    ///
    /// Linear directions evaluate the weight function once per row or column
    /// and replicate it; radial directions evaluate it per pixel.
    pub fn from_direction(
        width: u32,
        height: u32,
        direction: Direction,
        profile: &BlurProfile,
        easing: Easing,
    ) -> Self {
        let (w, h) = (width as usize, height as usize);
        let mut values = Vec::with_capacity(w * h);

        if direction.is_vertical() {
            for y in 0..height {
                let weight = blur_weight(direction.position(0, y, width, height), profile, easing);
                values.extend(std::iter::repeat(weight).take(w));
            }
        } else if direction.is_horizontal() {
            let row: Vec<f32> = (0..width)
                .map(|x| blur_weight(direction.position(x, 0, width, height), profile, easing))
                .collect();
            for _ in 0..height {
                values.extend_from_slice(&row);
            }
        } else {
            for y in 0..height {
                for x in 0..width {
                    let t = direction.position(x, y, width, height);
                    values.push(blur_weight(t, profile, easing));
                }
            }
        }

        Self {
            width,
            height,
            values,
        }
    }

    /// Field width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Field height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// All weights, row-major.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Weight at pixel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the field.
    pub fn get(&self, x: u32, y: u32) -> f32 {
        assert!(x < self.width && y < self.height, "weight field index out of bounds");
        self.values[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Fail unless the field covers a `width` x `height` image exactly.
    pub fn ensure_size(&self, width: u32, height: u32) -> Result<(), ConfigError> {
        if self.width != width || self.height != height {
            return Err(ConfigError::MaskSizeMismatch {
                mask_width: self.width,
                mask_height: self.height,
                image_width: width,
                image_height: height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(clear: f32, start: f32, end: f32) -> BlurProfile {
        BlurProfile::new(50.0, clear, start, end).unwrap()
    }

    #[test]
    fn test_weight_regions() {
        let p = BlurProfile::default();

        assert_eq!(blur_weight(0.0, &p, Easing::Linear), 0.0);
        assert_eq!(blur_weight(0.14, &p, Easing::Linear), 0.0);
        // No lead-in: still sharp until blur_start
        assert_eq!(blur_weight(0.2, &p, Easing::Linear), 0.0);
        assert_eq!(blur_weight(0.25, &p, Easing::Linear), 0.0);
        assert!((blur_weight(0.55, &p, Easing::Linear) - 0.5).abs() < 1e-5);
        assert_eq!(blur_weight(0.85, &p, Easing::Linear), 1.0);
        assert_eq!(blur_weight(1.0, &p, Easing::Linear), 1.0);
    }

    #[test]
    fn test_weight_out_of_range_input() {
        let p = BlurProfile::default();
        assert_eq!(blur_weight(-2.0, &p, Easing::Linear), 0.0);
        assert_eq!(blur_weight(7.5, &p, Easing::Linear), 1.0);
        assert_eq!(blur_weight(f32::NAN, &p, Easing::Linear), 0.0);
        assert_eq!(blur_weight(f32::INFINITY, &p, Easing::Linear), 1.0);
    }

    #[test]
    fn test_weight_lead_in() {
        let p = BlurProfile::default().with_lead_in(0.3).unwrap();

        assert_eq!(blur_weight(0.15, &p, Easing::Linear), 0.0);
        assert!((blur_weight(0.2, &p, Easing::Linear) - 0.15).abs() < 1e-5);
        assert!((blur_weight(0.25, &p, Easing::Linear) - 0.3).abs() < 1e-5);
        assert!((blur_weight(0.55, &p, Easing::Linear) - 0.65).abs() < 1e-5);
        assert_eq!(blur_weight(0.85, &p, Easing::Linear), 1.0);
    }

    #[test]
    fn test_weight_lead_in_with_empty_lead_zone() {
        // clear_until == blur_start: no division by zero
        let p = profile(0.4, 0.4, 0.8).with_lead_in(0.5).unwrap();
        assert_eq!(blur_weight(0.39, &p, Easing::Linear), 0.0);
        assert!((blur_weight(0.4, &p, Easing::Linear) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_weight_easing_changes_ramp_only() {
        let p = BlurProfile::default();
        let linear = blur_weight(0.4, &p, Easing::Linear);
        let eased = blur_weight(0.4, &p, Easing::EaseIn);
        assert!(eased < linear);

        assert_eq!(blur_weight(0.1, &p, Easing::EaseOut), 0.0);
        assert_eq!(blur_weight(0.9, &p, Easing::EaseIn), 1.0);
    }

    #[test]
    fn test_field_from_direction_shape() {
        let field = WeightField::from_direction(
            40,
            30,
            Direction::LeftToRight,
            &BlurProfile::default(),
            Easing::Linear,
        );
        assert_eq!(field.width(), 40);
        assert_eq!(field.height(), 30);
        assert_eq!(field.values().len(), 1200);
    }

    #[test]
    fn test_field_top_to_bottom_rows() {
        let p = BlurProfile::default();
        let field = WeightField::from_direction(10, 100, Direction::TopToBottom, &p, Easing::Linear);

        for y in 0..15 {
            assert_eq!(field.get(4, y), 0.0, "row {} should be sharp", y);
        }
        for y in 85..100 {
            assert_eq!(field.get(4, y), 1.0, "row {} should be fully blurred", y);
        }
        // Rows are uniform
        for x in 0..10 {
            assert_eq!(field.get(x, 50), field.get(0, 50));
        }
    }

    #[test]
    fn test_field_matches_per_pixel_evaluation() {
        let p = profile(0.1, 0.2, 0.9);
        for direction in Direction::ALL {
            let field = WeightField::from_direction(17, 11, direction, &p, Easing::Sine);
            for y in 0..11 {
                for x in 0..17 {
                    let expected = blur_weight(direction.position(x, y, 17, 11), &p, Easing::Sine);
                    assert_eq!(field.get(x, y), expected, "{:?} at ({}, {})", direction, x, y);
                }
            }
        }
    }

    #[test]
    fn test_field_radial_center_and_corner() {
        let p = BlurProfile::default();
        let field =
            WeightField::from_direction(200, 200, Direction::CenterToEdges, &p, Easing::Linear);
        assert_eq!(field.get(100, 100), blur_weight(0.0, &p, Easing::Linear));
        assert_eq!(field.get(0, 0), blur_weight(1.0, &p, Easing::Linear));
    }

    #[test]
    fn test_mask_length_checked() {
        let err = WeightField::new(4, 4, vec![0.5; 15]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MaskLength {
                width: 4,
                height: 4,
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn test_mask_values_checked() {
        let mut values = vec![0.0; 12];
        values[7] = 1.2;
        let err = WeightField::new(4, 3, values).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MaskValueOutOfRange {
                x: 3,
                y: 1,
                value: 1.2
            }
        );

        let mut values = vec![0.0; 12];
        values[0] = f32::NAN;
        assert!(WeightField::new(4, 3, values).is_err());
    }

    #[test]
    fn test_mask_from_fn() {
        let mask = WeightField::from_fn(3, 2, |x, y| (x + y) as f32 / 4.0).unwrap();
        assert_eq!(mask.values(), &[0.0, 0.25, 0.5, 0.25, 0.5, 0.75]);

        // Values are validated, not clamped
        assert!(WeightField::from_fn(3, 2, |x, _| x as f32).is_err());
    }

    #[test]
    fn test_mask_from_luma() {
        let img = image::GrayImage::from_raw(2, 1, vec![0, 255]).unwrap();
        let mask = WeightField::from_luma(&img);
        assert_eq!(mask.values(), &[0.0, 1.0]);
    }

    #[test]
    fn test_ensure_size() {
        let mask = WeightField::new(2, 2, vec![0.0; 4]).unwrap();
        assert!(mask.ensure_size(2, 2).is_ok());
        assert_eq!(
            mask.ensure_size(3, 2).unwrap_err(),
            ConfigError::MaskSizeMismatch {
                mask_width: 2,
                mask_height: 2,
                image_width: 3,
                image_height: 2
            }
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
