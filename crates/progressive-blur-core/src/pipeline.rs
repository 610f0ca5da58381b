//! Top-level blur operations.
//!
//! Every entry point validates its configuration before any layer is blurred,
//! then runs the same stages:
//!
//! 1. expand the input to straight RGBA and premultiply it
//! 2. build the layer stack
//! 3. composite each pixel from its weight
//! 4. narrow the result back to the output mode

use crate::composite::{composite, AlphaHandling};
use crate::error::BlurError;
use crate::layers::{generate_layers, BlurPrimitive, ImageBlur};
use crate::normalize::{expand, flatten, output_mode, premultiply, restore};
use crate::profile::{BlurSettings, Preset};
use crate::raster::RasterImage;
use crate::weight::WeightField;
use image::RgbaImage;

/// Blur `image` progressively along `settings.direction`.
///
/// The output has the same dimensions as the input and the color mode given
/// by [`output_mode`](crate::normalize::output_mode).
///
/// # Errors
///
/// [`BlurError::Config`] for invalid settings, [`BlurError::UnsupportedInput`]
/// for malformed images and [`BlurError::LayerFailed`] if a blur fails.
#[tracing::instrument(
    skip_all,
    fields(
        width = image.width,
        height = image.height,
        direction = ?settings.direction,
        layers = settings.layer_count,
    )
)]
pub fn apply_progressive_blur(
    image: &RasterImage,
    settings: &BlurSettings,
) -> Result<RasterImage, BlurError> {
    settings.validate()?;
    image.validate()?;

    let field = WeightField::from_direction(
        image.width,
        image.height,
        settings.direction,
        &settings.profile,
        settings.easing,
    );
    tracing::debug!("weight field ready");

    render(image, &field, settings, &ImageBlur::new(settings.algorithm))
}

/// Blur `image` with a caller-supplied weight per pixel.
///
/// `settings.direction` and the ramp fractions are ignored; `max_blur`,
/// layer count, algorithm and alpha handling still apply.
#[tracing::instrument(
    skip_all,
    fields(width = image.width, height = image.height, layers = settings.layer_count)
)]
pub fn apply_mask_based_blur(
    image: &RasterImage,
    mask: &WeightField,
    settings: &BlurSettings,
) -> Result<RasterImage, BlurError> {
    apply_with_primitive(image, mask, settings, &ImageBlur::new(settings.algorithm))
}

/// Blur `image` with one of the named presets.
#[tracing::instrument(skip(image), fields(width = image.width, height = image.height))]
pub fn apply_preset(image: &RasterImage, preset: Preset) -> Result<RasterImage, BlurError> {
    apply_progressive_blur(image, &preset.settings())
}

/// Like [`apply_mask_based_blur`], with a custom [`BlurPrimitive`] in place
/// of `settings.algorithm`.
pub fn apply_with_primitive(
    image: &RasterImage,
    mask: &WeightField,
    settings: &BlurSettings,
    primitive: &dyn BlurPrimitive,
) -> Result<RasterImage, BlurError> {
    settings.validate()?;
    image.validate()?;
    mask.ensure_size(image.width, image.height)?;
    render(image, mask, settings, primitive)
}

/// Run the stages on validated input.
fn render(
    image: &RasterImage,
    field: &WeightField,
    settings: &BlurSettings,
    primitive: &dyn BlurPrimitive,
) -> Result<RasterImage, BlurError> {
    let mode = output_mode(image, settings.alpha);

    if image.is_empty() {
        return restore(RgbaImage::new(image.width, image.height), mode);
    }

    let mut sharp = expand(image)?;
    if settings.alpha == AlphaHandling::Discard {
        flatten(&mut sharp);
    }

    if field.values().iter().all(|&w| w <= 0.0) {
        tracing::debug!("weight field is empty, skipping blur");
        return restore(sharp, mode);
    }

    let layers = generate_layers(
        premultiply(&sharp),
        settings.profile.max_blur(),
        settings.layer_count,
        primitive,
        settings.parallel,
    )?;
    tracing::debug!(count = layers.len(), "layers generated");

    let blended = composite(&sharp, &layers, field, settings.alpha, settings.parallel)?;
    tracing::debug!("composite done");

    restore(blended, mode)
}
