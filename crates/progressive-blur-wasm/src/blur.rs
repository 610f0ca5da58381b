//! Progressive blur WASM bindings.
//!
//! Settings are passed as plain JavaScript objects and deserialized with
//! serde_wasm_bindgen. Every field is optional; missing fields take the
//! library defaults.
//!
//! # Example
//!
//! ```typescript
//! import { apply_progressive_blur, apply_preset, JsRasterImage } from '@progressive-blur/wasm';
//!
//! const image = new JsRasterImage(width, height, 4, rgbaBytes);
//! const soft = apply_progressive_blur(image, { max_blur: 30, direction: 'bottom_to_top' });
//! const vignette = apply_preset(image, 'vignette');
//! ```

use crate::types::JsRasterImage;
use progressive_blur_core::{BlurSettings, ConfigError, Preset, WeightField};
use wasm_bindgen::prelude::*;

/// Deserialize a settings object; `undefined` and `null` mean defaults.
fn settings_from_js(value: JsValue) -> Result<BlurSettings, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(BlurSettings::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Blur an image progressively along a direction.
///
/// # Arguments
///
/// * `image` - The source image
/// * `settings` - Optional settings object, e.g.
///   `{ max_blur: 50, clear_until: 0.15, blur_start: 0.25, end_y: 0.85,
///      direction: "top_to_bottom", easing: "linear", algorithm: "gaussian",
///      layer_count: 8, alpha: "preserve" }`
///
/// # Errors
///
/// Returns an error string for invalid settings or malformed images.
#[wasm_bindgen]
pub fn apply_progressive_blur(
    image: &JsRasterImage,
    settings: JsValue,
) -> Result<JsRasterImage, JsValue> {
    let settings = settings_from_js(settings)?;
    progressive_blur_core::apply_progressive_blur(image.as_raster(), &settings)
        .map_err(|e| JsValue::from_str(&e.to_string()))
        .and_then(JsRasterImage::from_raster)
}

/// Blur an image with a named preset (`subtle`, `standard`, `dramatic`,
/// `vignette`).
#[wasm_bindgen]
pub fn apply_preset(image: &JsRasterImage, name: &str) -> Result<JsRasterImage, JsValue> {
    let preset: Preset = name.parse().map_err(|e: ConfigError| JsValue::from_str(&e.to_string()))?;
    progressive_blur_core::apply_preset(image.as_raster(), preset)
        .map_err(|e| JsValue::from_str(&e.to_string()))
        .and_then(JsRasterImage::from_raster)
}

/// Blur an image with one weight per pixel.
///
/// # Arguments
///
/// * `image` - The source image
/// * `mask` - `Float32Array` of `width * height` weights in 0.0..=1.0,
///   row-major (0 = sharp, 1 = `max_blur`)
/// * `settings` - Optional settings object; direction and ramp fields are ignored
#[wasm_bindgen]
pub fn apply_mask_based_blur(
    image: &JsRasterImage,
    mask: Vec<f32>,
    settings: JsValue,
) -> Result<JsRasterImage, JsValue> {
    let settings = settings_from_js(settings)?;
    let mask = WeightField::new(image.width(), image.height(), mask)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    progressive_blur_core::apply_mask_based_blur(image.as_raster(), &mask, &settings)
        .map_err(|e| JsValue::from_str(&e.to_string()))
        .and_then(JsRasterImage::from_raster)
}

/// Names accepted by [`apply_preset`].
#[wasm_bindgen]
pub fn preset_names() -> js_sys::Array {
    Preset::ALL
        .iter()
        .map(|p| JsValue::from_str(p.name()))
        .collect()
}
