//! Progressive Blur Core - spatially varying blur for raster images
//!
//! This crate blurs an image so that blur intensity ramps from fully sharp in
//! one region to a maximum radius in another, with a smooth transition in
//! between. The ramp follows a named direction (top to bottom, radial, ...)
//! or a caller-supplied per-pixel mask.
//!
//! # Pipeline
//!
//! 1. [`normalize`] expands the input to premultiplied 16-bit RGBA
//! 2. [`weight`] assigns each pixel a blur weight in 0.0..=1.0
//! 3. [`layers`] blurs the whole image at a fixed set of radii
//! 4. [`composite`] interpolates each pixel between the two bracketing layers
//! 5. [`normalize`] narrows the result back to the caller's color mode
//!
//! # Examples
//!
//! ```ignore
//! use progressive_blur_core::{apply_progressive_blur, codec, BlurSettings};
//!
//! let image = codec::decode(&std::fs::read("photo.jpg").unwrap()).unwrap();
//! let blurred = apply_progressive_blur(&image, &BlurSettings::default()).unwrap();
//! let png = codec::encode(&blurred, codec::OutputFormat::Png).unwrap();
//! ```

pub mod codec;
pub mod composite;
pub mod error;
pub mod layers;
pub mod luminance;
pub mod normalize;
pub mod pipeline;
pub mod profile;
pub mod raster;
pub mod weight;

pub use composite::AlphaHandling;
pub use error::{BlurError, ConfigError, PrimitiveError};
pub use layers::{BlurAlgorithm, BlurPrimitive, ImageBlur, MAX_RADIUS};
pub use pipeline::{apply_mask_based_blur, apply_preset, apply_progressive_blur, apply_with_primitive};
pub use profile::{
    BlurProfile, BlurSettings, Easing, Preset, DEFAULT_BLUR_START, DEFAULT_CLEAR_UNTIL,
    DEFAULT_END_Y, DEFAULT_LAYER_COUNT, DEFAULT_LEAD_IN, DEFAULT_MAX_BLUR,
};
pub use raster::{ColorMode, RasterImage};
pub use weight::{blur_weight, Direction, WeightField};
