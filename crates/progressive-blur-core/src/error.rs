//! Error types for the progressive blur pipeline.

use thiserror::Error;

/// Invalid blur parameters.
///
/// Always raised before any blur layer is computed. Parameters are never
/// clamped into range on the caller's behalf.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// `max_blur` is zero or negative.
    #[error("max_blur must be greater than 0, got {0}")]
    NonPositiveMaxBlur(f32),

    /// A parameter is NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },

    /// A fractional parameter lies outside 0.0..=1.0.
    #[error("{name} must be within 0.0..=1.0, got {value}")]
    FractionOutOfRange { name: &'static str, value: f32 },

    /// `clear_until` is after `blur_start`.
    #[error("clear_until ({clear_until}) must not exceed blur_start ({blur_start})")]
    ClearAfterStart { clear_until: f32, blur_start: f32 },

    /// The blur ramp has no length (`end_y <= blur_start`).
    #[error("end_y ({end_y}) must be greater than blur_start ({blur_start})")]
    DegenerateRamp { blur_start: f32, end_y: f32 },

    /// `lead_in` must leave room for the main ramp.
    #[error("lead_in must be within 0.0..1.0, got {0}")]
    LeadInOutOfRange(f32),

    /// At least one blurred layer is required.
    #[error("layer_count must be at least 1")]
    ZeroLayers,

    /// The weight mask does not cover the image exactly.
    #[error("mask is {mask_width}x{mask_height} but image is {image_width}x{image_height}")]
    MaskSizeMismatch {
        mask_width: u32,
        mask_height: u32,
        image_width: u32,
        image_height: u32,
    },

    /// The weight mask buffer does not hold one value per pixel.
    #[error("mask for {width}x{height} needs {expected} values, got {actual}")]
    MaskLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// A mask value lies outside 0.0..=1.0 (or is NaN).
    #[error("mask value at ({x}, {y}) must be within 0.0..=1.0, got {value}")]
    MaskValueOutOfRange { x: u32, y: u32, value: f32 },

    /// No preset with this name exists.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}

/// Failure reported by a [`BlurPrimitive`](crate::layers::BlurPrimitive).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct PrimitiveError(pub String);

/// Errors from the progressive blur operation.
#[derive(Debug, Error)]
pub enum BlurError {
    /// Invalid blur parameters or mask.
    #[error("invalid blur configuration: {0}")]
    Config(#[from] ConfigError),

    /// The image cannot be brought into the working representation.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// The blur primitive failed for one layer; the whole operation is aborted.
    #[error("blur layer {index} (radius {radius:.2}) failed: {source}")]
    LayerFailed {
        index: usize,
        radius: f32,
        #[source]
        source: PrimitiveError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NonPositiveMaxBlur(0.0);
        assert_eq!(err.to_string(), "max_blur must be greater than 0, got 0");

        let err = ConfigError::DegenerateRamp {
            blur_start: 0.4,
            end_y: 0.3,
        };
        assert_eq!(
            err.to_string(),
            "end_y (0.3) must be greater than blur_start (0.4)"
        );
    }

    #[test]
    fn test_blur_error_wraps_config() {
        let err: BlurError = ConfigError::ZeroLayers.into();
        assert!(matches!(err, BlurError::Config(ConfigError::ZeroLayers)));
        assert_eq!(
            err.to_string(),
            "invalid blur configuration: layer_count must be at least 1"
        );
    }

    #[test]
    fn test_layer_failed_names_radius() {
        let err = BlurError::LayerFailed {
            index: 3,
            radius: 18.75,
            source: PrimitiveError("out of memory".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "blur layer 3 (radius 18.75) failed: out of memory"
        );
    }
}
