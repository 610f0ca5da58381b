//! Downscaling before blur.
//!
//! Blur cost grows with pixel count and radius, so large photos are usually
//! shrunk to display size first.

use super::{CodecError, FilterType};
use crate::error::BlurError;
use crate::raster::RasterImage;

/// Shrink `image` to fit inside `max_width` x `max_height`, preserving the
/// aspect ratio.
///
/// Images that already fit are returned unchanged; this never upscales.
/// Palette images are expanded to RGB(A) when they have to be resized.
///
/// # Errors
///
/// Returns `CodecError::Image` if either bound is zero.
pub fn resize_to_fit(
    image: &RasterImage,
    max_width: u32,
    max_height: u32,
    filter: FilterType,
) -> Result<RasterImage, CodecError> {
    if max_width == 0 || max_height == 0 {
        return Err(BlurError::UnsupportedInput(format!(
            "resize bounds must be non-zero, got {}x{}",
            max_width, max_height
        ))
        .into());
    }

    // If already fits, just clone
    if image.width <= max_width && image.height <= max_height {
        return Ok(image.clone());
    }

    let (new_width, new_height) =
        calculate_fit_dimensions(image.width, image.height, max_width, max_height);

    let resized = image
        .to_dynamic()?
        .resize_exact(new_width, new_height, filter.to_image_filter());

    tracing::debug!(
        from_width = image.width,
        from_height = image.height,
        new_width,
        new_height,
        "resized image"
    );
    Ok(RasterImage::from_dynamic(resized)?)
}

/// Calculate dimensions to fit within the bounds while preserving aspect ratio.
fn calculate_fit_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let scale = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let new_width = ((width as f64 * scale).round() as u32).clamp(1, max_width);
    let new_height = ((height as f64 * scale).round() as u32).clamp(1, max_height);
    (new_width, new_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::ColorMode;

    fn create_test_image(width: u32, height: u32) -> RasterImage {
        // Create a simple gradient image for testing
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8); // R
                pixels.push(((y * 255) / height.max(1)) as u8); // G
                pixels.push(128); // B
            }
        }
        RasterImage::new(width, height, ColorMode::Rgb, pixels).unwrap()
    }

    #[test]
    fn test_resize_to_fit_landscape() {
        let img = create_test_image(600, 400);
        let resized = resize_to_fit(&img, 192, 108, FilterType::Lanczos3).unwrap();

        // Height is the binding constraint: 400 * 0.27 = 108, 600 * 0.27 = 162
        assert_eq!((resized.width, resized.height), (162, 108));
        assert_eq!(resized.mode, ColorMode::Rgb);
        assert_eq!(resized.pixels.len(), 162 * 108 * 3);
    }

    #[test]
    fn test_resize_to_fit_portrait() {
        let img = create_test_image(400, 600);
        let resized = resize_to_fit(&img, 200, 200, FilterType::Bilinear).unwrap();
        assert_eq!(resized.width, 133);
        assert_eq!(resized.height, 200);
    }

    #[test]
    fn test_resize_to_fit_already_small() {
        let img = create_test_image(100, 50);
        let resized = resize_to_fit(&img, 1920, 1080, FilterType::Lanczos3).unwrap();
        assert_eq!(resized, img);
    }

    #[test]
    fn test_resize_to_fit_keeps_alpha() {
        let img = RasterImage::filled(40, 20, ColorMode::Rgba, &[1, 2, 3, 4]).unwrap();
        let resized = resize_to_fit(&img, 10, 10, FilterType::Nearest).unwrap();
        assert_eq!(resized.mode, ColorMode::Rgba);
        assert_eq!((resized.width, resized.height), (10, 5));
        assert_eq!(resized.pixel(0, 0), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_resize_to_fit_zero_bounds() {
        let img = create_test_image(10, 10);
        assert!(matches!(
            resize_to_fit(&img, 0, 10, FilterType::Bilinear),
            Err(CodecError::Image(_))
        ));
    }

    #[test]
    fn test_extreme_aspect_ratio() {
        assert_eq!(calculate_fit_dimensions(10000, 10, 100, 100), (100, 1));
        assert_eq!(calculate_fit_dimensions(10, 10000, 100, 100), (1, 100));
    }
}
