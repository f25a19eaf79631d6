//! Aspect-preserving resize onto a transparent square canvas.

use image::imageops::{self, FilterType};
use image::{Rgba, Rgba32FImage};

use super::raster::RasterImage;
use crate::domain::errors::UpscaleError;

/// Resizes `source` with Lanczos3 to fit a `side`×`side` canvas, centered and never cropped.
///
/// Resampling runs on premultiplied alpha so fully transparent pixels contribute no color.
///
/// # Errors
/// Returns `Pipeline` if `side` is zero.
pub fn pad_fit(source: &RasterImage, side: u32) -> Result<RasterImage, UpscaleError> {
    if side == 0 {
        return Err(UpscaleError::pipeline("target canvas side is zero"));
    }

    let (width, height) = fitted_dimensions(source.width(), source.height(), side);
    let resized = imageops::resize(&premultiply(source), width, height, FilterType::Lanczos3);

    let mut canvas = RasterImage::transparent(side, side);
    let offset_x = (side - width) / 2;
    let offset_y = (side - height) / 2;
    for (x, y, pixel) in resized.enumerate_pixels() {
        canvas.set_pixel(offset_x + x, offset_y + y, unpremultiply(*pixel));
    }
    Ok(canvas)
}

/// Largest dimensions with the source aspect ratio that fit inside `side`.
#[must_use]
pub fn fitted_dimensions(width: u32, height: u32, side: u32) -> (u32, u32) {
    let scale = f64::from(side) / f64::from(width.max(height));
    let fit = |d: u32| ((f64::from(d) * scale).round() as u32).clamp(1, side);
    (fit(width), fit(height))
}

fn premultiply(source: &RasterImage) -> Rgba32FImage {
    Rgba32FImage::from_fn(source.width(), source.height(), |x, y| {
        let [r, g, b, a] = source.pixel(x, y);
        let alpha = f32::from(a) / 255.0;
        Rgba([
            f32::from(r) / 255.0 * alpha,
            f32::from(g) / 255.0 * alpha,
            f32::from(b) / 255.0 * alpha,
            alpha,
        ])
    })
}

fn unpremultiply(Rgba([r, g, b, a]): Rgba<f32>) -> [u8; 4] {
    let alpha = a.clamp(0.0, 1.0);
    if alpha <= f32::EPSILON {
        return [0, 0, 0, 0];
    }
    let channel = |c: f32| ((c / alpha).clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(r), channel(g), channel(b), (alpha * 255.0).round() as u8]
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(128, 128, 512, (512, 512) ; "square")]
    #[test_case(128, 64, 512, (512, 256) ; "wide")]
    #[test_case(10, 40, 100, (25, 100) ; "tall")]
    #[test_case(1000, 1, 512, (512, 1) ; "sliver_keeps_one_pixel")]
    fn test_fitted_dimensions(width: u32, height: u32, side: u32, expected: (u32, u32)) {
        assert_eq!(fitted_dimensions(width, height, side), expected);
    }

    #[test]
    fn test_wide_image_is_letterboxed() {
        let mut source = RasterImage::transparent(8, 4);
        for y in 0..4 {
            for x in 0..8 {
                source.set_pixel(x, y, [255, 0, 0, 255]);
            }
        }

        let out = pad_fit(&source, 16).unwrap();

        assert_eq!((out.width(), out.height()), (16, 16));
        assert_eq!(out.pixel(8, 0), [0, 0, 0, 0]);
        assert_eq!(out.pixel(8, 15), [0, 0, 0, 0]);
        assert_eq!(out.pixel(8, 8), [255, 0, 0, 255]);
    }

    #[test]
    fn test_transparent_pixels_do_not_bleed_color() {
        let mut source = RasterImage::transparent(4, 4);
        source.set_pixel(0, 0, [0, 255, 0, 255]);
        for y in 0..4 {
            for x in 0..4 {
                if (x, y) != (0, 0) {
                    source.set_pixel(x, y, [255, 0, 255, 0]);
                }
            }
        }

        let out = pad_fit(&source, 16).unwrap();

        let [r, g, _, a] = out.pixel(1, 1);
        assert!(a > 0);
        assert!(g > r, "green should dominate, got r={r} g={g}");
    }

    #[test]
    fn test_zero_side_is_rejected() {
        let source = RasterImage::transparent(2, 2);
        assert!(pad_fit(&source, 0).is_err());
    }
}
