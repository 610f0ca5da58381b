//! Conversion between caller color modes and the working representation.
//!
//! Every input is expanded to straight 8-bit RGBA, then premultiplied into
//! 16-bit RGBA for blurring. After compositing, the straight RGBA result is
//! narrowed back to the mode chosen by [`output_mode`].
//!
//! | Input       | Output (Preserve / Blend) | Output (Discard) |
//! |-------------|---------------------------|------------------|
//! | Gray        | Gray                      | Gray             |
//! | GrayAlpha   | GrayAlpha                 | Gray             |
//! | Rgb         | Rgb                       | Rgb              |
//! | Rgba        | Rgba                      | Rgb              |
//! | Indexed     | Rgba if translucent, else Rgb | Rgb          |

use crate::composite::AlphaHandling;
use crate::error::BlurError;
use crate::luminance::calculate_luminance_u8;
use crate::raster::{ColorMode, RasterImage};
use image::{ImageBuffer, Rgba, RgbaImage};

/// Premultiplied 16-bit RGBA image that blur layers are computed on.
pub type WorkingImage = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// Expand any supported mode to straight 8-bit RGBA.
///
/// Gray samples are replicated into all three color channels and missing
/// alpha becomes 255.
pub fn expand(image: &RasterImage) -> Result<RgbaImage, BlurError> {
    image.validate()?;

    let mut rgba = Vec::with_capacity(image.pixel_count() * 4);
    match image.mode {
        ColorMode::Gray => {
            for &v in &image.pixels {
                rgba.extend_from_slice(&[v, v, v, 255]);
            }
        }
        ColorMode::GrayAlpha => {
            for px in image.pixels.chunks_exact(2) {
                rgba.extend_from_slice(&[px[0], px[0], px[0], px[1]]);
            }
        }
        ColorMode::Rgb => {
            for px in image.pixels.chunks_exact(3) {
                rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
        }
        ColorMode::Rgba => rgba.extend_from_slice(&image.pixels),
        ColorMode::Indexed => {
            for &idx in &image.pixels {
                rgba.extend_from_slice(&image.palette[idx as usize]);
            }
        }
    }

    RgbaImage::from_raw(image.width, image.height, rgba).ok_or_else(|| {
        BlurError::UnsupportedInput(format!(
            "cannot expand {}x{} {:?} image",
            image.width, image.height, image.mode
        ))
    })
}

/// Premultiply straight 8-bit RGBA into the 16-bit working representation.
pub fn premultiply(rgba: &RgbaImage) -> WorkingImage {
    let mut out = WorkingImage::new(rgba.width(), rgba.height());
    for (src, dst) in rgba.pixels().zip(out.pixels_mut()) {
        let a = src[3] as u32;
        let scale = |c: u8| ((c as u32 * 257 * a + 127) / 255) as u16;
        *dst = Rgba([scale(src[0]), scale(src[1]), scale(src[2]), (a * 257) as u16]);
    }
    out
}

/// Force every pixel opaque, keeping the color stored under it.
pub fn flatten(rgba: &mut RgbaImage) {
    for px in rgba.pixels_mut() {
        px[3] = 255;
    }
}

/// Mode the blurred result is returned in.
pub fn output_mode(image: &RasterImage, alpha: AlphaHandling) -> ColorMode {
    let keep_alpha = alpha != AlphaHandling::Discard;
    match image.mode {
        ColorMode::Gray => ColorMode::Gray,
        ColorMode::Rgb => ColorMode::Rgb,
        ColorMode::GrayAlpha if keep_alpha => ColorMode::GrayAlpha,
        ColorMode::GrayAlpha => ColorMode::Gray,
        ColorMode::Rgba if keep_alpha => ColorMode::Rgba,
        ColorMode::Rgba => ColorMode::Rgb,
        ColorMode::Indexed if keep_alpha && image.has_translucent_palette() => ColorMode::Rgba,
        ColorMode::Indexed => ColorMode::Rgb,
    }
}

/// Narrow straight 8-bit RGBA down to `mode`.
///
/// RGB collapses to gray through BT.709 luminance. `mode` must be a direct
/// color mode.
pub fn restore(rgba: RgbaImage, mode: ColorMode) -> Result<RasterImage, BlurError> {
    let (width, height) = rgba.dimensions();
    let pixels = match mode {
        ColorMode::Rgba => rgba.into_raw(),
        ColorMode::Rgb => rgba
            .pixels()
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect(),
        ColorMode::GrayAlpha => rgba
            .pixels()
            .flat_map(|p| [calculate_luminance_u8(p[0], p[1], p[2]), p[3]])
            .collect(),
        ColorMode::Gray => rgba
            .pixels()
            .map(|p| calculate_luminance_u8(p[0], p[1], p[2]))
            .collect(),
        ColorMode::Indexed => {
            return Err(BlurError::UnsupportedInput(
                "cannot restore to an indexed image".to_string(),
            ))
        }
    };
    RasterImage::new(width, height, mode, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_gray() {
        let img = RasterImage::new(2, 1, ColorMode::Gray, vec![10, 200]).unwrap();
        let rgba = expand(&img).unwrap();
        assert_eq!(rgba.into_raw(), vec![10, 10, 10, 255, 200, 200, 200, 255]);
    }

    #[test]
    fn test_expand_gray_alpha() {
        let img = RasterImage::new(1, 1, ColorMode::GrayAlpha, vec![77, 5]).unwrap();
        assert_eq!(expand(&img).unwrap().into_raw(), vec![77, 77, 77, 5]);
    }

    #[test]
    fn test_expand_rgb_and_indexed() {
        let img = RasterImage::new(1, 1, ColorMode::Rgb, vec![1, 2, 3]).unwrap();
        assert_eq!(expand(&img).unwrap().into_raw(), vec![1, 2, 3, 255]);

        let img = RasterImage::indexed(2, 1, vec![1, 0], vec![[4, 5, 6, 7], [8, 9, 10, 11]])
            .unwrap();
        assert_eq!(
            expand(&img).unwrap().into_raw(),
            vec![8, 9, 10, 11, 4, 5, 6, 7]
        );
    }

    #[test]
    fn test_expand_rejects_malformed() {
        let img = RasterImage {
            width: 2,
            height: 2,
            mode: ColorMode::Rgb,
            pixels: vec![0; 5],
            palette: Vec::new(),
        };
        assert!(matches!(expand(&img), Err(BlurError::UnsupportedInput(_))));
    }

    #[test]
    fn test_premultiply_opaque_is_exact() {
        let rgba = RgbaImage::from_raw(1, 1, vec![255, 128, 0, 255]).unwrap();
        let work = premultiply(&rgba);
        assert_eq!(work.get_pixel(0, 0).0, [65535, 128 * 257, 0, 65535]);
    }

    #[test]
    fn test_premultiply_transparent_is_zero() {
        let rgba = RgbaImage::from_raw(1, 1, vec![255, 255, 255, 0]).unwrap();
        assert_eq!(premultiply(&rgba).get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_premultiply_half_alpha() {
        let rgba = RgbaImage::from_raw(1, 1, vec![255, 0, 0, 128]).unwrap();
        let px = premultiply(&rgba).get_pixel(0, 0).0;
        assert_eq!(px[3], 128 * 257);
        assert_eq!(px[0], 128 * 257);
    }

    #[test]
    fn test_flatten_keeps_hidden_color() {
        let mut rgba = RgbaImage::from_raw(2, 1, vec![255, 0, 0, 0, 1, 2, 3, 90]).unwrap();
        flatten(&mut rgba);
        assert_eq!(rgba.into_raw(), vec![255, 0, 0, 255, 1, 2, 3, 255]);
    }

    #[test]
    fn test_output_mode_table() {
        let gray = RasterImage::new(1, 1, ColorMode::Gray, vec![0]).unwrap();
        let ga = RasterImage::new(1, 1, ColorMode::GrayAlpha, vec![0, 0]).unwrap();
        let rgba = RasterImage::new(1, 1, ColorMode::Rgba, vec![0; 4]).unwrap();
        let opaque_pal = RasterImage::indexed(1, 1, vec![0], vec![[0, 0, 0, 255]]).unwrap();
        let clear_pal = RasterImage::indexed(1, 1, vec![0], vec![[0, 0, 0, 0]]).unwrap();

        assert_eq!(output_mode(&gray, AlphaHandling::Preserve), ColorMode::Gray);
        assert_eq!(output_mode(&ga, AlphaHandling::Blend), ColorMode::GrayAlpha);
        assert_eq!(output_mode(&ga, AlphaHandling::Discard), ColorMode::Gray);
        assert_eq!(output_mode(&rgba, AlphaHandling::Preserve), ColorMode::Rgba);
        assert_eq!(output_mode(&rgba, AlphaHandling::Discard), ColorMode::Rgb);
        assert_eq!(output_mode(&opaque_pal, AlphaHandling::Preserve), ColorMode::Rgb);
        assert_eq!(output_mode(&clear_pal, AlphaHandling::Preserve), ColorMode::Rgba);
        assert_eq!(output_mode(&clear_pal, AlphaHandling::Discard), ColorMode::Rgb);
    }

    #[test]
    fn test_restore_modes() {
        let rgba = RgbaImage::from_raw(1, 1, vec![90, 90, 90, 40]).unwrap();
        let gray = restore(rgba.clone(), ColorMode::Gray).unwrap();
        assert_eq!(gray.pixels, vec![90]);
        let ga = restore(rgba.clone(), ColorMode::GrayAlpha).unwrap();
        assert_eq!(ga.pixels, vec![90, 40]);
        let rgb = restore(rgba.clone(), ColorMode::Rgb).unwrap();
        assert_eq!(rgb.pixels, vec![90, 90, 90]);
        assert!(restore(rgba, ColorMode::Indexed).is_err());
    }
}
