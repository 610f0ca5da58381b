//! Encoded image input and output.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG and WebP bytes into a [`RasterImage`](crate::RasterImage)
//! - Encoding a result back to JPEG, PNG or lossless WebP
//! - Downscaling large images before blurring
//!
//! JPEG input has its EXIF orientation applied on decode, so the first row
//! of the decoded image is the visual top.

mod decode;
mod encode;
mod resize;

pub use decode::{decode, get_orientation, Orientation};
pub use encode::{encode, OutputFormat};
pub use resize::resize_to_fit;

use crate::error::BlurError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for decoding, encoding and resizing.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The bytes are not a JPEG, PNG or WebP file, or the format name is unknown.
    #[error("Invalid or unsupported image format")]
    UnsupportedFormat,

    /// The file is corrupted or incomplete.
    #[error("Decoding failed: {0}")]
    Decode(String),

    /// The encoder rejected the image.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// The decoded or resized pixels could not be represented.
    #[error(transparent)]
    Image(#[from] BlurError),
}

/// Filter type for resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}
