//! Per-pixel blending of the layer stack.
//!
//! Each pixel's weight `w` is turned into a target radius `w * max_radius`.
//! The two layers around that radius are linearly interpolated in
//! premultiplied space, then the result is unpremultiplied and rounded back
//! to 8 bits. Pixels with weight 0 are copied from the source untouched.

use crate::error::BlurError;
use crate::layers::BlurLayerSet;
use crate::weight::WeightField;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How transparency is treated when compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaHandling {
    /// Blur color only; every pixel keeps its source alpha.
    #[default]
    Preserve,
    /// Blur alpha together with color.
    Blend,
    /// Treat the image as opaque and return it without alpha.
    Discard,
}

/// Blend `layers` according to `field`.
///
/// `sharp` is the straight-alpha source the layer stack was built from; it
/// supplies exact output for weight-0 pixels and the alpha for
/// [`AlphaHandling::Preserve`].
///
/// # Errors
///
/// [`ConfigError::MaskSizeMismatch`](crate::error::ConfigError::MaskSizeMismatch)
/// if the field does not match the image, [`BlurError::UnsupportedInput`] if
/// the layers were built from an image of another size.
pub fn composite(
    sharp: &RgbaImage,
    layers: &BlurLayerSet,
    field: &WeightField,
    alpha: AlphaHandling,
    parallel: bool,
) -> Result<RgbaImage, BlurError> {
    let (width, height) = sharp.dimensions();
    field.ensure_size(width, height)?;
    if let Some(layer) = layers
        .layers()
        .iter()
        .find(|l| l.image.dimensions() != (width, height))
    {
        return Err(BlurError::UnsupportedInput(format!(
            "layer at radius {} is {}x{} but image is {}x{}",
            layer.radius,
            layer.image.width(),
            layer.image.height(),
            width,
            height
        )));
    }

    let max_radius = layers.max_radius();
    let planes: Vec<&[u16]> = layers
        .layers()
        .iter()
        .map(|l| l.image.as_raw().as_slice())
        .collect();
    let src = sharp.as_raw().as_slice();
    let weights = field.values();

    let blend = |i: usize, out: &mut [u8]| {
        let base = i * 4;
        let source = [src[base], src[base + 1], src[base + 2], src[base + 3]];
        let w = weights[i];
        if w <= 0.0 {
            out.copy_from_slice(&source);
            if alpha == AlphaHandling::Discard {
                out[3] = 255;
            }
            return;
        }

        let (lo, hi, frac) = layers.bracket(w * max_radius);
        let (a, b) = (&planes[lo][base..base + 4], &planes[hi][base..base + 4]);
        let mut premul = [0.0f32; 4];
        for c in 0..4 {
            premul[c] = a[c] as f32 + (b[c] as f32 - a[c] as f32) * frac;
        }

        out.copy_from_slice(&unpremultiply(premul, source, alpha));
    };

    let mut out = RgbaImage::new(width, height);
    for_each_pixel(&mut out, parallel, blend);
    Ok(out)
}

#[cfg(feature = "parallel")]
fn for_each_pixel<F>(pixels: &mut [u8], parallel: bool, f: F)
where
    F: Fn(usize, &mut [u8]) + Send + Sync,
{
    if parallel {
        pixels
            .par_chunks_mut(4)
            .enumerate()
            .for_each(|(i, px)| f(i, px));
    } else {
        pixels.chunks_mut(4).enumerate().for_each(|(i, px)| f(i, px));
    }
}

#[cfg(not(feature = "parallel"))]
fn for_each_pixel<F>(pixels: &mut [u8], _parallel: bool, f: F)
where
    F: Fn(usize, &mut [u8]),
{
    pixels.chunks_mut(4).enumerate().for_each(|(i, px)| f(i, px));
}

/// Convert a premultiplied 16-bit sample back to straight 8-bit RGBA.
///
/// Where the blurred alpha is zero there is no color to recover, so the
/// source color is kept.
#[inline]
fn unpremultiply(premul: [f32; 4], source: [u8; 4], alpha: AlphaHandling) -> [u8; 4] {
    let pa = premul[3];
    let mut out = [0u8; 4];
    for c in 0..3 {
        out[c] = if pa >= 1.0 {
            to_u8(premul[c] / pa * 255.0)
        } else {
            source[c]
        };
    }
    out[3] = match alpha {
        AlphaHandling::Preserve => source[3],
        AlphaHandling::Blend => to_u8(pa / 257.0),
        AlphaHandling::Discard => 255,
    };
    out
}

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::layers::{generate_layers, ImageBlur};
    use crate::normalize::premultiply;

    /// Left half white, right half black, fully opaque.
    fn split(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, _| {
            if x < w / 2 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 255])
            }
        })
    }

    fn layers_for(img: &RgbaImage, max_blur: f32, count: usize) -> BlurLayerSet {
        generate_layers(premultiply(img), max_blur, count, &ImageBlur::default(), false).unwrap()
    }

    fn uniform(img: &RgbaImage, w: f32) -> WeightField {
        WeightField::from_fn(img.width(), img.height(), |_, _| w).unwrap()
    }

    #[test]
    fn test_zero_weight_is_identity() {
        let img = split(16, 8);
        let set = layers_for(&img, 5.0, 4);
        let out = composite(&img, &set, &uniform(&img, 0.0), AlphaHandling::Preserve, false)
            .unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_full_weight_matches_last_layer() {
        let img = split(16, 8);
        let set = layers_for(&img, 5.0, 4);
        let out = composite(&img, &set, &uniform(&img, 1.0), AlphaHandling::Preserve, false)
            .unwrap();
        let last = &set.layers()[set.len() - 1].image;
        for (o, l) in out.pixels().zip(last.pixels()) {
            for c in 0..3 {
                let expected = (l[c] as f32 / l[3] as f32 * 255.0).round() as i32;
                assert!((o[c] as i32 - expected).abs() <= 1);
            }
        }
    }

    #[test]
    fn test_weight_increases_blur() {
        let img = split(32, 4);
        let set = layers_for(&img, 6.0, 6);
        let edge = |w: f32| {
            let out = composite(&img, &set, &uniform(&img, w), AlphaHandling::Preserve, false)
                .unwrap();
            out.get_pixel(15, 2)[0]
        };
        // The last white column darkens as more black bleeds in
        assert_eq!(edge(0.0), 255);
        assert!(edge(0.5) < 255);
        assert!(edge(1.0) <= edge(0.5));
    }

    #[test]
    fn test_uniform_image_unchanged_at_any_weight() {
        let img = RgbaImage::from_pixel(10, 10, image::Rgba([200, 40, 90, 255]));
        let set = layers_for(&img, 8.0, 4);
        for w in [0.1, 0.37, 0.5, 1.0] {
            let out = composite(&img, &set, &uniform(&img, w), AlphaHandling::Preserve, false)
                .unwrap();
            for p in out.pixels() {
                assert!((p[0] as i32 - 200).abs() <= 1);
                assert!((p[1] as i32 - 40).abs() <= 1);
                assert!((p[2] as i32 - 90).abs() <= 1);
                assert_eq!(p[3], 255);
            }
        }
    }

    #[test]
    fn test_preserve_keeps_transparent_pixels_transparent() {
        let img = RgbaImage::from_fn(12, 12, |x, _| {
            if x < 6 {
                image::Rgba([255, 0, 0, 0])
            } else {
                image::Rgba([0, 0, 255, 255])
            }
        });
        let set = layers_for(&img, 4.0, 4);
        let out = composite(&img, &set, &uniform(&img, 1.0), AlphaHandling::Preserve, false)
            .unwrap();
        for (o, s) in out.pixels().zip(img.pixels()) {
            assert_eq!(o[3], s[3]);
        }
        // Fully transparent neighbors contribute no red
        assert_eq!(out.get_pixel(6, 6)[0], 0);
    }

    #[test]
    fn test_blend_spreads_alpha() {
        let img = RgbaImage::from_fn(12, 4, |x, _| {
            let a = if x < 6 { 0 } else { 255 };
            image::Rgba([0, 255, 0, a])
        });
        let set = layers_for(&img, 3.0, 3);
        let out = composite(&img, &set, &uniform(&img, 1.0), AlphaHandling::Blend, false)
            .unwrap();
        let a = out.get_pixel(5, 2)[3];
        assert!(a > 0 && a < 255, "alpha should be blurred, got {}", a);
        assert_eq!(out.get_pixel(5, 2)[1], 255);
    }

    #[test]
    fn test_discard_sets_opaque() {
        let img = RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 100]));
        let set = layers_for(&img, 2.0, 2);
        for w in [0.0, 0.5] {
            let out = composite(&img, &set, &uniform(&img, w), AlphaHandling::Discard, false)
                .unwrap();
            assert!(out.pixels().all(|p| p[3] == 255));
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let img = split(20, 10);
        let set = layers_for(&img, 5.0, 5);
        let field = WeightField::from_fn(20, 10, |_, y| y as f32 / 9.0).unwrap();
        let a = composite(&img, &set, &field, AlphaHandling::Preserve, true).unwrap();
        let b = composite(&img, &set, &field, AlphaHandling::Preserve, false).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_size_mismatch() {
        let img = split(8, 8);
        let set = layers_for(&img, 2.0, 2);
        let field = WeightField::from_fn(8, 7, |_, _| 0.5).unwrap();
        let err = composite(&img, &set, &field, AlphaHandling::Preserve, false).unwrap_err();
        assert!(matches!(
            err,
            BlurError::Config(ConfigError::MaskSizeMismatch { .. })
        ));
    }

    #[test]
    fn test_layers_from_other_image_rejected() {
        let img = split(8, 8);
        let other = split(4, 4);
        let set = layers_for(&other, 2.0, 2);
        let err = composite(&img, &set, &uniform(&img, 1.0), AlphaHandling::Preserve, false)
            .unwrap_err();
        assert!(matches!(err, BlurError::UnsupportedInput(_)));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::layers::{generate_layers, ImageBlur};
    use crate::normalize::premultiply;
    use proptest::prelude::*;

    fn image_strategy() -> impl Strategy<Value = RgbaImage> {
        (2u32..10, 2u32..10).prop_flat_map(|(w, h)| {
            proptest::collection::vec(any::<u8>(), (w * h * 4) as usize)
                .prop_map(move |px| RgbaImage::from_raw(w, h, px).unwrap())
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Property: Pixels with weight 0 are returned bit-for-bit.
        #[test]
        fn prop_sharp_pixels_exact(img in image_strategy(), seed in any::<u32>()) {
            let set = generate_layers(premultiply(&img), 3.0, 3, &ImageBlur::default(), false).unwrap();
            let field = WeightField::from_fn(img.width(), img.height(), |x, y| {
                if (x + y + seed % 3) % 3 == 0 { 0.0 } else { 0.8 }
            })
            .unwrap();
            let out = composite(&img, &set, &field, AlphaHandling::Blend, false).unwrap();
            for y in 0..img.height() {
                for x in 0..img.width() {
                    if field.get(x, y) == 0.0 {
                        prop_assert_eq!(out.get_pixel(x, y), img.get_pixel(x, y));
                    }
                }
            }
        }

        /// Property: Preserve never changes alpha.
        #[test]
        fn prop_preserve_alpha(img in image_strategy(), w in 0.0f32..=1.0) {
            let set = generate_layers(premultiply(&img), 4.0, 2, &ImageBlur::default(), false).unwrap();
            let field = WeightField::from_fn(img.width(), img.height(), |_, _| w).unwrap();
            let out = composite(&img, &set, &field, AlphaHandling::Preserve, false).unwrap();
            for (o, s) in out.pixels().zip(img.pixels()) {
                prop_assert_eq!(o[3], s[3]);
            }
        }
    }
}
