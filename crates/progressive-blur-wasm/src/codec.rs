//! Decode, encode and resize WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, resize_to_fit, apply_preset, encode_image } from '@progressive-blur/wasm';
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const preview = resize_to_fit(image, 1920, 1080, 2); // Lanczos3 filter
//! const blurred = apply_preset(preview, 'standard');
//! const jpeg = encode_image(blurred, 'jpeg', 85);
//! ```

use crate::types::{filter_from_u8, JsRasterImage};
use progressive_blur_core::codec::{self, OutputFormat};
use wasm_bindgen::prelude::*;

/// Decode JPEG, PNG or WebP bytes.
///
/// JPEG EXIF orientation is applied. Alpha is kept when present.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRasterImage, JsValue> {
    codec::decode(bytes)
        .map_err(|e| JsValue::from_str(&e.to_string()))
        .and_then(JsRasterImage::from_raster)
}

/// Encode an image.
///
/// # Arguments
///
/// * `image` - The image to encode
/// * `format` - `"jpeg"`, `"png"` or `"webp"`
/// * `quality` - JPEG quality 1-100 (default 90); ignored for other formats
#[wasm_bindgen]
pub fn encode_image(
    image: &JsRasterImage,
    format: &str,
    quality: Option<u8>,
) -> Result<Vec<u8>, JsValue> {
    let format =
        OutputFormat::from_name(format, quality).map_err(|e| JsValue::from_str(&e.to_string()))?;
    codec::encode(image.as_raster(), format).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Shrink an image to fit inside `max_width` x `max_height`.
///
/// Preserves aspect ratio and never upscales.
///
/// # Arguments
///
/// * `filter` - Resize algorithm: 0=Nearest (fastest), 1=Bilinear (default), 2=Lanczos3 (best quality)
#[wasm_bindgen]
pub fn resize_to_fit(
    image: &JsRasterImage,
    max_width: u32,
    max_height: u32,
    filter: u8,
) -> Result<JsRasterImage, JsValue> {
    codec::resize_to_fit(image.as_raster(), max_width, max_height, filter_from_u8(filter))
        .map_err(|e| JsValue::from_str(&e.to_string()))
        .and_then(JsRasterImage::from_raster)
}
