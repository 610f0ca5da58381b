//! Progressive Blur WASM - WebAssembly bindings for progressive-blur-core
//!
//! This crate exposes the progressive blur pipeline to JavaScript/TypeScript
//! applications. Layers are generated sequentially since threads are not
//! available in the browser.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `blur` - Progressive, preset and mask-based blur
//! - `codec` - Decode, encode and resize
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, apply_preset, encode_image } from '@progressive-blur/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const blurred = apply_preset(image, 'standard');
//! const png = encode_image(blurred, 'png');
//! ```

use wasm_bindgen::prelude::*;

mod blur;
mod codec;
mod types;

// Re-export public types
pub use blur::{apply_mask_based_blur, apply_preset, apply_progressive_blur, preset_names};
pub use codec::{decode_image, encode_image, resize_to_fit};
pub use types::JsRasterImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
