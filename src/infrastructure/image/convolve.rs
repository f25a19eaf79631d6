//! 3×3 convolution and per-pixel blending.

use super::raster::RasterImage;
use crate::domain::errors::UpscaleError;

/// Edge enhancement kernel, row-major.
pub const EDGE_KERNEL: [i32; 9] = [-1, -1, -1, -1, 9, -1, -1, -1, -1];

/// Convolves the color channels with a 3×3 kernel (scale 1, offset 0).
///
/// Edges are sampled by clamping; alpha is copied.
#[must_use]
pub fn convolve3x3(source: &RasterImage, kernel: &[i32; 9]) -> RasterImage {
    let width = source.width();
    let height = source.height();
    let mut out = source.clone();

    for y in 0..height {
        for x in 0..width {
            let mut sums = [0i32; 3];
            for (k, weight) in kernel.iter().enumerate() {
                let sx = (x as i64 + (k % 3) as i64 - 1).clamp(0, i64::from(width) - 1) as u32;
                let sy = (y as i64 + (k / 3) as i64 - 1).clamp(0, i64::from(height) - 1) as u32;
                let pixel = source.pixel(sx, sy);
                for (sum, channel) in sums.iter_mut().zip(pixel) {
                    *sum += weight * i32::from(channel);
                }
            }
            let alpha = source.pixel(x, y)[3];
            let [r, g, b] = sums.map(|s| s.clamp(0, 255) as u8);
            out.set_pixel(x, y, [r, g, b, alpha]);
        }
    }
    out
}

/// Blends `edge` into `original` by `factor` on R, G and B; alpha comes from `original`.
///
/// # Errors
/// Returns `Pipeline` if the rasters differ in size.
pub fn blend(
    original: &RasterImage,
    edge: &RasterImage,
    factor: f32,
) -> Result<RasterImage, UpscaleError> {
    if (original.width(), original.height()) != (edge.width(), edge.height()) {
        return Err(UpscaleError::pipeline(format!(
            "cannot blend {}x{} with {}x{}",
            original.width(),
            original.height(),
            edge.width(),
            edge.height()
        )));
    }

    let samples = original
        .samples()
        .chunks_exact(4)
        .zip(edge.samples().chunks_exact(4))
        .flat_map(|(o, e)| {
            let mix = |i: usize| {
                (f32::from(o[i]) * (1.0 - factor) + f32::from(e[i]) * factor)
                    .round()
                    .clamp(0.0, 255.0) as u8
            };
            [mix(0), mix(1), mix(2), o[3]]
        })
        .collect();

    RasterImage::new(original.width(), original.height(), samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, pixel: [u8; 4]) -> RasterImage {
        RasterImage::new(width, height, pixel.repeat((width * height) as usize)).unwrap()
    }

    #[test]
    fn test_blend_thirty_percent() {
        let original = solid(1, 1, [10, 20, 30, 255]);
        let edge = solid(1, 1, [110, 120, 130, 255]);

        let out = blend(&original, &edge, 0.3).unwrap();

        assert_eq!(out.pixel(0, 0), [40, 50, 60, 255]);
    }

    #[test]
    fn test_blend_keeps_original_alpha() {
        let original = solid(1, 1, [0, 0, 0, 17]);
        let edge = solid(1, 1, [255, 255, 255, 255]);

        let out = blend(&original, &edge, 0.3).unwrap();

        assert_eq!(out.pixel(0, 0), [77, 77, 77, 17]);
    }

    #[test]
    fn test_blend_rejects_size_mismatch() {
        assert!(blend(&solid(2, 2, [0; 4]), &solid(1, 1, [0; 4]), 0.3).is_err());
    }

    #[test]
    fn test_uniform_region_is_identity() {
        let source = solid(3, 3, [100, 150, 200, 255]);
        assert_eq!(convolve3x3(&source, &EDGE_KERNEL), source);
    }

    #[test]
    fn test_convolution_clamps_to_byte_range() {
        let mut source = solid(3, 3, [0, 0, 0, 255]);
        source.set_pixel(1, 1, [200, 200, 200, 90]);

        let out = convolve3x3(&source, &EDGE_KERNEL);

        assert_eq!(out.pixel(1, 1), [255, 255, 255, 90]);
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 255]);
    }
}
