//! Pre-blurred layer stack.
//!
//! The compositor never blurs per pixel. Instead the whole image is blurred
//! at a fixed set of radii up front, and each pixel interpolates between the
//! two layers that bracket its target radius.
//!
//! Layer radii are `max_blur * i / count` for `i` in `1..=count`; the
//! unblurred source sits in front of them at radius 0.

use crate::error::{BlurError, PrimitiveError};
use crate::normalize::WorkingImage;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Largest radius [`ImageBlur`] accepts, in pixels.
///
/// Larger radii are reported as a [`PrimitiveError`] instead of being
/// attempted, since the Gaussian kernel grows with the radius.
pub const MAX_RADIUS: f32 = 2048.0;

/// Blur primitive used to build each layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlurAlgorithm {
    /// Gaussian blur with sigma equal to the radius.
    #[default]
    Gaussian,
    /// Separable box filter of width `2 * ceil(radius) + 1`.
    Box,
    /// Horizontal box filter of width `2 * ceil(radius) + 1`.
    Motion,
}

/// A whole-image blur at a given radius.
///
/// Implementations must be deterministic and return an image with the same
/// dimensions as the input.
pub trait BlurPrimitive: Sync {
    /// Blur `image` with the given radius in pixels (always > 0).
    fn blur(&self, image: &WorkingImage, radius: f32) -> Result<WorkingImage, PrimitiveError>;
}

/// [`BlurPrimitive`] backed by the `image` and `imageproc` filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageBlur {
    algorithm: BlurAlgorithm,
}

impl ImageBlur {
    pub fn new(algorithm: BlurAlgorithm) -> Self {
        Self { algorithm }
    }
}

impl BlurPrimitive for ImageBlur {
    fn blur(&self, image: &WorkingImage, radius: f32) -> Result<WorkingImage, PrimitiveError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(PrimitiveError(format!("invalid radius {}", radius)));
        }
        if radius > MAX_RADIUS {
            return Err(PrimitiveError(format!(
                "radius {} exceeds the limit of {}",
                radius, MAX_RADIUS
            )));
        }

        let blurred = match self.algorithm {
            BlurAlgorithm::Gaussian => image::imageops::blur(image, radius),
            BlurAlgorithm::Box => {
                let kernel = box_kernel(radius)?;
                imageproc::filter::separable_filter_equal(image, &kernel)
            }
            BlurAlgorithm::Motion => {
                let kernel = box_kernel(radius)?;
                imageproc::filter::horizontal_filter(image, &kernel)
            }
        };
        Ok(blurred)
    }
}

/// Normalized uniform kernel covering `radius` pixels on each side.
fn box_kernel(radius: f32) -> Result<Vec<f32>, PrimitiveError> {
    let width = (radius.ceil() as usize)
        .checked_mul(2)
        .and_then(|w| w.checked_add(1))
        .ok_or_else(|| PrimitiveError(format!("box kernel too wide for radius {}", radius)))?;
    Ok(vec![1.0 / width as f32; width])
}

/// One entry of a [`BlurLayerSet`].
#[derive(Debug, Clone)]
pub struct BlurLayer {
    /// Blur radius in pixels; 0 for the source.
    pub radius: f32,
    /// Premultiplied pixels.
    pub image: WorkingImage,
}

/// Blurred copies of one image, ordered by strictly increasing radius.
///
/// The first layer is always the unblurred source at radius 0 and the last
/// one sits at the maximum blur radius.
#[derive(Debug, Clone)]
pub struct BlurLayerSet {
    layers: Vec<BlurLayer>,
}

impl BlurLayerSet {
    /// All layers, source first.
    pub fn layers(&self) -> &[BlurLayer] {
        &self.layers
    }

    /// Number of layers including the source.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always false; a set holds at least the source.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Largest radius in the set.
    pub fn max_radius(&self) -> f32 {
        self.layers.last().map_or(0.0, |l| l.radius)
    }

    /// Find the layers around `radius`.
    ///
    /// Returns `(lower, upper, frac)` such that the target is
    /// `lerp(layers[lower], layers[upper], frac)`. Radii past either end
    /// clamp to the first or last layer with `frac = 0`.
    pub fn bracket(&self, radius: f32) -> (usize, usize, f32) {
        let last = self.layers.len().saturating_sub(1);
        if radius.is_nan() || radius <= 0.0 {
            return (0, 0, 0.0);
        }
        if radius >= self.max_radius() {
            return (last, last, 0.0);
        }

        // First layer with a radius above the target; never 0 here.
        let upper = self.layers.partition_point(|l| l.radius <= radius);
        let lower = upper - 1;
        let (r0, r1) = (self.layers[lower].radius, self.layers[upper].radius);
        let frac = ((radius - r0) / (r1 - r0)).clamp(0.0, 1.0);
        (lower, upper, frac)
    }
}

/// Radii of the blurred layers, excluding the radius-0 source.
///
/// The last radius is exactly `max_blur`.
pub fn layer_radii(max_blur: f32, count: usize) -> Vec<f32> {
    let mut radii: Vec<f32> = (1..=count)
        .map(|i| max_blur * i as f32 / count as f32)
        .collect();
    if let Some(last) = radii.last_mut() {
        *last = max_blur;
    }
    radii
}

/// Blur `source` at every radius in `layer_radii(max_blur, count)`.
///
/// With the `parallel` feature and `parallel = true` the layers are built on
/// the rayon thread pool; the result is identical either way.
///
/// # Errors
///
/// [`BlurError::LayerFailed`] for the first layer whose primitive failed or
/// returned an image of the wrong size.
#[tracing::instrument(skip(source, primitive), fields(width = source.width(), height = source.height()))]
pub fn generate_layers(
    source: WorkingImage,
    max_blur: f32,
    count: usize,
    primitive: &dyn BlurPrimitive,
    parallel: bool,
) -> Result<BlurLayerSet, BlurError> {
    let radii = layer_radii(max_blur, count);
    let dims = source.dimensions();

    let build = |index: usize, radius: f32| -> Result<BlurLayer, BlurError> {
        let fail = |err: PrimitiveError| BlurError::LayerFailed {
            index,
            radius,
            source: err,
        };
        let image = primitive.blur(&source, radius).map_err(fail)?;
        if image.dimensions() != dims {
            return Err(fail(PrimitiveError(format!(
                "expected {}x{}, got {}x{}",
                dims.0,
                dims.1,
                image.width(),
                image.height()
            ))));
        }
        tracing::debug!(index, radius, "blur layer ready");
        Ok(BlurLayer { radius, image })
    };

    #[cfg(feature = "parallel")]
    let blurred: Result<Vec<BlurLayer>, BlurError> = if parallel {
        radii
            .par_iter()
            .enumerate()
            .map(|(i, &r)| build(i + 1, r))
            .collect()
    } else {
        radii.iter().enumerate().map(|(i, &r)| build(i + 1, r)).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let blurred: Result<Vec<BlurLayer>, BlurError> = {
        let _ = parallel;
        radii.iter().enumerate().map(|(i, &r)| build(i + 1, r)).collect()
    };

    let mut layers = Vec::with_capacity(count + 1);
    layers.push(BlurLayer {
        radius: 0.0,
        image: source,
    });
    layers.extend(blurred?);

    Ok(BlurLayerSet { layers })
}
