//! Minimal RGBA raster shared by every pipeline stage.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::domain::errors::UpscaleError;

/// Interleaved samples per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// An 8-bit RGBA image. Stages take one raster and return a new one.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

impl RasterImage {
    /// Wraps raw samples, checking that they match the dimensions.
    ///
    /// # Errors
    /// Returns `Pipeline` when a dimension is zero or the buffer length is wrong.
    pub fn new(width: u32, height: u32, samples: Vec<u8>) -> Result<Self, UpscaleError> {
        if width == 0 || height == 0 {
            return Err(UpscaleError::pipeline(format!(
                "raster has empty dimensions {width}x{height}"
            )));
        }
        let expected = width as usize * height as usize * CHANNELS;
        if samples.len() != expected {
            return Err(UpscaleError::pipeline(format!(
                "raster buffer holds {} bytes, expected {expected}",
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Creates a fully transparent raster.
    #[must_use]
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            samples: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    #[must_use]
    pub fn from_rgba(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            samples: image.into_raw(),
        }
    }

    /// Converts back into an `image` buffer.
    ///
    /// # Errors
    /// Returns `Pipeline` if the buffer does not match the dimensions.
    pub fn into_rgba(self) -> Result<RgbaImage, UpscaleError> {
        RgbaImage::from_raw(self.width, self.height, self.samples)
            .ok_or_else(|| UpscaleError::pipeline("raster buffer does not match dimensions"))
    }

    /// Decodes any supported format (first frame for animations).
    ///
    /// # Errors
    /// Returns `Pipeline` when the bytes are not a decodable image.
    pub fn decode(bytes: &[u8]) -> Result<Self, UpscaleError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| UpscaleError::pipeline(format!("failed to decode image: {e}")))?;
        let raster = Self::from_rgba(image.to_rgba8());
        if raster.width == 0 || raster.height == 0 {
            return Err(UpscaleError::pipeline("decoded image is empty"));
        }
        Ok(raster)
    }

    /// Encodes as an RGBA PNG.
    ///
    /// # Errors
    /// Returns `Pipeline` if the encoder fails.
    pub fn encode_png(&self) -> Result<Vec<u8>, UpscaleError> {
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(&self.samples, self.width, self.height, ExtendedColorType::Rgba8)
            .map_err(|e| UpscaleError::pipeline(format!("failed to encode png: {e}")))?;
        Ok(out)
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Returns the pixel at `(x, y)`.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.samples[i],
            self.samples[i + 1],
            self.samples[i + 2],
            self.samples[i + 3],
        ]
    }

    pub(crate) fn set_pixel(&mut self, x: u32, y: u32, pixel: [u8; 4]) {
        let i = self.index(x, y);
        self.samples[i..i + CHANNELS].copy_from_slice(&pixel);
    }

    const fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
