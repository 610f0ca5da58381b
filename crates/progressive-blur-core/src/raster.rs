//! Image buffer type shared by every pipeline stage.

use crate::error::BlurError;
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};

/// Sample layout of a [`RasterImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// One luminance sample per pixel.
    Gray,
    /// Luminance and alpha.
    GrayAlpha,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha (straight, not premultiplied).
    Rgba,
    /// One palette index per pixel; colors live in [`RasterImage::palette`].
    Indexed,
}

impl ColorMode {
    /// Bytes per pixel in [`RasterImage::pixels`].
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Gray | ColorMode::Indexed => 1,
            ColorMode::GrayAlpha => 2,
            ColorMode::Rgb => 3,
            ColorMode::Rgba => 4,
        }
    }

    /// Whether the mode carries an alpha sample.
    pub fn has_alpha(self) -> bool {
        matches!(self, ColorMode::GrayAlpha | ColorMode::Rgba)
    }

    /// Map a channel count to a direct (non-palette) mode.
    pub fn from_channels(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(ColorMode::Gray),
            2 => Some(ColorMode::GrayAlpha),
            3 => Some(ColorMode::Rgb),
            4 => Some(ColorMode::Rgba),
            _ => None,
        }
    }
}

/// An 8-bit raster image.
///
/// Pixels are stored row-major, `mode.channels()` bytes per pixel.
/// For [`ColorMode::Indexed`] each byte indexes into `palette`; for every
/// other mode `palette` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Sample layout.
    pub mode: ColorMode,
    /// Pixel samples, row-major.
    pub pixels: Vec<u8>,
    /// RGBA palette entries, only used by [`ColorMode::Indexed`].
    pub palette: Vec<[u8; 4]>,
}

impl RasterImage {
    /// Create an image in a direct color mode.
    ///
    /// # Errors
    ///
    /// [`BlurError::UnsupportedInput`] if `mode` is `Indexed` (use
    /// [`RasterImage::indexed`]) or if the buffer length does not match.
    pub fn new(width: u32, height: u32, mode: ColorMode, pixels: Vec<u8>) -> Result<Self, BlurError> {
        if mode == ColorMode::Indexed {
            return Err(BlurError::UnsupportedInput(
                "indexed images need a palette".to_string(),
            ));
        }
        let image = Self {
            width,
            height,
            mode,
            pixels,
            palette: Vec::new(),
        };
        image.validate()?;
        Ok(image)
    }

    /// Create a palette image.
    ///
    /// # Errors
    ///
    /// [`BlurError::UnsupportedInput`] if the buffer length does not match or
    /// an index points past the end of the palette.
    pub fn indexed(
        width: u32,
        height: u32,
        indices: Vec<u8>,
        palette: Vec<[u8; 4]>,
    ) -> Result<Self, BlurError> {
        let image = Self {
            width,
            height,
            mode: ColorMode::Indexed,
            pixels: indices,
            palette,
        };
        image.validate()?;
        Ok(image)
    }

    /// Create a uniformly filled image in a direct color mode.
    pub fn filled(width: u32, height: u32, mode: ColorMode, sample: &[u8]) -> Result<Self, BlurError> {
        if sample.len() != mode.channels() {
            return Err(BlurError::UnsupportedInput(format!(
                "fill sample has {} channels, {:?} needs {}",
                sample.len(),
                mode,
                mode.channels()
            )));
        }
        let pixels = sample.repeat((width as usize) * (height as usize));
        Self::new(width, height, mode, pixels)
    }

    /// Check the buffer against the dimensions, mode and palette.
    pub fn validate(&self) -> Result<(), BlurError> {
        let expected = self.pixel_count() * self.mode.channels();
        if self.pixels.len() != expected {
            return Err(BlurError::UnsupportedInput(format!(
                "pixel buffer for {}x{} {:?} needs {} bytes, got {}",
                self.width,
                self.height,
                self.mode,
                expected,
                self.pixels.len()
            )));
        }

        if self.mode == ColorMode::Indexed {
            if let Some(&bad) = self
                .pixels
                .iter()
                .find(|&&idx| idx as usize >= self.palette.len())
            {
                return Err(BlurError::UnsupportedInput(format!(
                    "palette index {} out of range for {} entries",
                    bad,
                    self.palette.len()
                )));
            }
        } else if !self.palette.is_empty() {
            return Err(BlurError::UnsupportedInput(format!(
                "{:?} images must not carry a palette",
                self.mode
            )));
        }
        Ok(())
    }

    /// Take ownership of an 8-bit `image` crate buffer.
    ///
    /// # Errors
    ///
    /// 16-bit and floating point images are rejected with
    /// [`BlurError::UnsupportedInput`]; convert them explicitly first.
    pub fn from_dynamic(img: DynamicImage) -> Result<Self, BlurError> {
        let (width, height) = (img.width(), img.height());
        let (mode, pixels) = match img {
            DynamicImage::ImageLuma8(buf) => (ColorMode::Gray, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (ColorMode::GrayAlpha, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (ColorMode::Rgb, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (ColorMode::Rgba, buf.into_raw()),
            other => {
                return Err(BlurError::UnsupportedInput(format!(
                    "{:?} samples are not supported",
                    other.color()
                )))
            }
        };
        Self::new(width, height, mode, pixels)
    }

    /// Convert to an `image` crate buffer.
    ///
    /// Palette images are expanded to RGB, or RGBA when any palette entry is
    /// translucent.
    pub fn to_dynamic(&self) -> Result<DynamicImage, BlurError> {
        let (w, h) = (self.width, self.height);
        let mismatch = || {
            BlurError::UnsupportedInput(format!(
                "pixel buffer does not match {}x{} {:?}",
                w, h, self.mode
            ))
        };

        let img = match self.mode {
            ColorMode::Gray => DynamicImage::ImageLuma8(
                GrayImage::from_raw(w, h, self.pixels.clone()).ok_or_else(mismatch)?,
            ),
            ColorMode::GrayAlpha => DynamicImage::ImageLumaA8(
                GrayAlphaImage::from_raw(w, h, self.pixels.clone()).ok_or_else(mismatch)?,
            ),
            ColorMode::Rgb => DynamicImage::ImageRgb8(
                RgbImage::from_raw(w, h, self.pixels.clone()).ok_or_else(mismatch)?,
            ),
            ColorMode::Rgba => DynamicImage::ImageRgba8(
                RgbaImage::from_raw(w, h, self.pixels.clone()).ok_or_else(mismatch)?,
            ),
            ColorMode::Indexed => {
                self.validate()?;
                let rgba: Vec<u8> = self
                    .pixels
                    .iter()
                    .flat_map(|&idx| self.palette[idx as usize])
                    .collect();
                let rgba = RgbaImage::from_raw(w, h, rgba).ok_or_else(mismatch)?;
                if self.has_translucent_palette() {
                    DynamicImage::ImageRgba8(rgba)
                } else {
                    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).into_rgb8())
                }
            }
        };
        Ok(img)
    }

    /// Whether any palette entry has alpha below 255.
    pub fn has_translucent_palette(&self) -> bool {
        self.palette.iter().any(|entry| entry[3] < 255)
    }

    /// Bytes per pixel.
    pub fn channels(&self) -> usize {
        self.mode.channels()
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Check if this is an empty image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Samples of pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels();
        let idx = ((y as usize) * (self.width as usize) + x as usize) * c;
        &self.pixels[idx..idx + c]
    }
}
