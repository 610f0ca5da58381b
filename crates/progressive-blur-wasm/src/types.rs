//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core types,
//! handling the conversion between Rust and JavaScript data representations.

use progressive_blur_core::codec::FilterType;
use progressive_blur_core::{ColorMode, RasterImage};
use wasm_bindgen::prelude::*;

/// An 8-bit image wrapper for JavaScript.
///
/// Pixels are row-major with `channels` bytes per pixel:
/// 1 = gray, 2 = gray + alpha, 3 = RGB, 4 = RGBA.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`. For performance-critical code, consider
/// keeping the image in WASM memory and only extracting pixels when needed.
#[wasm_bindgen]
pub struct JsRasterImage {
    inner: RasterImage,
}

#[wasm_bindgen]
impl JsRasterImage {
    /// Create an image from dimensions, channel count and pixel data.
    ///
    /// Fails if `channels` is not 1-4 or the buffer length does not match.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: u32,
        height: u32,
        channels: u8,
        pixels: Vec<u8>,
    ) -> Result<JsRasterImage, JsValue> {
        let mode = ColorMode::from_channels(channels as usize).ok_or_else(|| {
            JsValue::from_str(&format!("channels must be 1-4, got {}", channels))
        })?;
        let img = RasterImage::new(width, height, mode, pixels)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::from_raster(img)
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Bytes per pixel (1-4)
    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> u8 {
        self.inner.channels() as u8
    }

    /// Get the number of bytes in the pixel buffer
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Returns pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsRasterImage {
    /// Wrap a core image; palette images are expanded to RGB or RGBA first.
    ///
    /// Fails if a palette image refers to a missing palette entry.
    pub(crate) fn from_raster(img: RasterImage) -> Result<Self, JsValue> {
        let inner = if img.mode == ColorMode::Indexed {
            img.to_dynamic()
                .and_then(RasterImage::from_dynamic)
                .map_err(|e| JsValue::from_str(&e.to_string()))?
        } else {
            img
        };
        Ok(Self { inner })
    }

    pub(crate) fn as_raster(&self) -> &RasterImage {
        &self.inner
    }
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear (good balance of speed and quality)
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear, // Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(width: u32, height: u32) -> JsRasterImage {
        JsRasterImage::from_raster(
            RasterImage::new(
                width,
                height,
                ColorMode::Rgb,
                vec![0u8; (width * height * 3) as usize],
            )
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_js_raster_image_accessors() {
        let img = rgb(100, 50);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.channels(), 3);
        assert_eq!(img.byte_length(), 15000);
    }

    #[test]
    fn test_js_raster_image_pixels() {
        let pixels = vec![255u8, 128, 64, 32, 16, 8, 4, 2]; // 2 RGBA pixels
        let img = JsRasterImage::from_raster(
            RasterImage::new(2, 1, ColorMode::Rgba, pixels.clone()).unwrap(),
        )
        .unwrap();
        assert_eq!(img.channels(), 4);
        assert_eq!(img.pixels(), pixels);
    }

    #[test]
    fn test_from_raster_expands_palette() {
        let indexed =
            RasterImage::indexed(2, 1, vec![1, 0], vec![[1, 2, 3, 255], [4, 5, 6, 255]]).unwrap();
        let img = JsRasterImage::from_raster(indexed).unwrap();
        assert_eq!(img.channels(), 3);
        assert_eq!(img.pixels(), vec![4, 5, 6, 1, 2, 3]);
        assert_eq!(img.as_raster().mode, ColorMode::Rgb);
    }

    #[test]
    fn test_filter_from_u8() {
        assert!(matches!(filter_from_u8(0), FilterType::Nearest));
        assert!(matches!(filter_from_u8(1), FilterType::Bilinear));
        assert!(matches!(filter_from_u8(2), FilterType::Lanczos3));
        // Unknown values default to Bilinear
        assert!(matches!(filter_from_u8(3), FilterType::Bilinear));
        assert!(matches!(filter_from_u8(255), FilterType::Bilinear));
    }
}
