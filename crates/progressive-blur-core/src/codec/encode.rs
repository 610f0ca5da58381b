//! Encoding for export.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use super::CodecError;
use crate::raster::RasterImage;

/// Default JPEG quality when none is given.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Target file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "format")]
pub enum OutputFormat {
    /// Lossy JPEG. Quality is clamped to 1..=100; alpha is dropped.
    Jpeg { quality: u8 },
    /// Lossless PNG.
    Png,
    /// Lossless WebP.
    #[serde(rename = "webp")]
    WebP,
}

impl OutputFormat {
    /// Parse a format name such as `"jpeg"`, `"jpg"`, `"png"` or `"webp"`.
    ///
    /// `quality` only matters for JPEG.
    pub fn from_name(name: &str, quality: Option<u8>) -> Result<Self, CodecError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg {
                quality: quality.unwrap_or(DEFAULT_JPEG_QUALITY),
            }),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            _ => Err(CodecError::UnsupportedFormat),
        }
    }

    /// MIME type of the encoded bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }
}

/// Encode an image.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 80-90: Good quality, recommended for most uses
/// * 60-80: Medium quality, acceptable for web/social media
/// * Below 60: Low quality, visible artifacts
///
/// # Errors
///
/// Returns `CodecError::Encode` for empty images or when the encoder fails.
pub fn encode(image: &RasterImage, format: OutputFormat) -> Result<Vec<u8>, CodecError> {
    if image.is_empty() {
        return Err(CodecError::Encode(format!(
            "image must be non-empty, got {}x{}",
            image.width, image.height
        )));
    }

    let img = image.to_dynamic()?;
    let (width, height) = (img.width(), img.height());
    let mut buffer = Cursor::new(Vec::new());

    let result = match format {
        OutputFormat::Jpeg { quality } => {
            let img = drop_alpha(img);
            let quality = quality.clamp(1, 100);
            JpegEncoder::new_with_quality(&mut buffer, quality).write_image(
                img.as_bytes(),
                width,
                height,
                ExtendedColorType::from(img.color()),
            )
        }
        OutputFormat::Png => PngEncoder::new(&mut buffer).write_image(
            img.as_bytes(),
            width,
            height,
            ExtendedColorType::from(img.color()),
        ),
        OutputFormat::WebP => {
            // The WebP encoder only takes RGB(A)
            let img = if img.color().has_alpha() {
                DynamicImage::ImageRgba8(img.into_rgba8())
            } else {
                DynamicImage::ImageRgb8(img.into_rgb8())
            };
            WebPEncoder::new_lossless(&mut buffer).write_image(
                img.as_bytes(),
                width,
                height,
                ExtendedColorType::from(img.color()),
            )
        }
    };
    result.map_err(|e| CodecError::Encode(e.to_string()))?;

    let bytes = buffer.into_inner();
    tracing::debug!(format = format.mime_type(), len = bytes.len(), "encoded image");
    Ok(bytes)
}

/// JPEG has no alpha channel; flatten to gray or RGB.
fn drop_alpha(img: DynamicImage) -> DynamicImage {
    let color = img.color();
    if !color.has_alpha() {
        return img;
    }
    tracing::warn!(?color, "JPEG output drops the alpha channel");
    if color.has_color() {
        DynamicImage::ImageRgb8(img.into_rgb8())
    } else {
        DynamicImage::ImageLuma8(img.into_luma8())
    }
}
