//! Static enhancement pipeline and the port adapter that picks a path.

use tracing::{debug, warn};

use super::animated::enhance_animated;
use super::convolve::{EDGE_KERNEL, blend, convolve3x3};
use super::raster::RasterImage;
use super::resize::pad_fit;
use super::sharpen::{SharpenParams, sharpen};
use crate::domain::entities::{EnhancedImage, EnhancementOptions, OutputFormat, ScaleFactor};
use crate::domain::errors::UpscaleError;
use crate::domain::ports::ImageEnhancerPort;

/// Side of every delivered image.
pub const TARGET_SIZE: u32 = 512;

/// Weight of the edge-enhanced variant in the final blend.
pub const BLEND_FACTOR: f32 = 0.3;

/// Resize, sharpen, edge-blend and resize again; always yields a 512×512 PNG.
///
/// # Errors
/// Returns `Pipeline` if the source cannot be decoded or any stage fails.
pub fn enhance_static(source: &[u8], scale: ScaleFactor) -> Result<EnhancedImage, UpscaleError> {
    let raster = RasterImage::decode(source)?;
    let side = raster
        .width()
        .saturating_mul(scale.as_u32())
        .min(TARGET_SIZE);
    debug!(
        width = raster.width(),
        height = raster.height(),
        side,
        "Running static pipeline"
    );

    let primary = pad_fit(&raster, side)?;
    let sharpened = sharpen(&primary, &SharpenParams::STATIC);
    let edges = convolve3x3(&sharpened, &EDGE_KERNEL);
    let blended = blend(&sharpened, &edges, BLEND_FACTOR)?;
    let output = pad_fit(&blended, TARGET_SIZE)?;

    Ok(EnhancedImage::new(
        output.encode_png()?,
        OutputFormat::Png,
        output.width(),
        output.height(),
    ))
}

/// Filter-based image enhancer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageEnhancer;

impl ImageEnhancer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ImageEnhancerPort for ImageEnhancer {
    fn enhance(
        &self,
        source: &[u8],
        options: EnhancementOptions,
    ) -> Result<EnhancedImage, UpscaleError> {
        if !options.animated {
            return enhance_static(source, options.scale);
        }

        match enhance_animated(source) {
            Ok(image) => Ok(image),
            Err(e) => {
                warn!(error = %e, "Animated processing failed, falling back to static pipeline");
                enhance_static(source, options.scale).map(EnhancedImage::into_fallback)
            }
        }
    }
}
