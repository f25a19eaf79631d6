//! Luminance unsharp masking with separate gains for flat and jagged areas.

use super::raster::RasterImage;

/// Sharpening parameters. Lightness values are on a 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharpenParams {
    /// Gaussian sigma of the blur.
    pub sigma: f32,
    /// Gain applied to detail up to `x1`.
    pub m1: f32,
    /// Gain applied to detail beyond `x1`.
    pub m2: f32,
    /// Threshold between flat and jagged detail.
    pub x1: f32,
    /// Maximum brightening.
    pub y2: f32,
    /// Maximum darkening.
    pub y3: f32,
}

impl SharpenParams {
    /// Pass used by the static pipeline.
    pub const STATIC: Self = Self {
        sigma: 1.5,
        m1: 1.0,
        m2: 0.5,
        x1: 2.0,
        y2: 10.0,
        y3: 20.0,
    };

    /// Lighter pass used on animation frames.
    pub const ANIMATED: Self = Self {
        sigma: 1.0,
        m1: 0.8,
        m2: 0.3,
        x1: 2.0,
        y2: 8.0,
        y3: 15.0,
    };

    /// Maps a detail value (lightness minus blurred lightness) to the applied delta.
    #[must_use]
    pub fn boost(&self, detail: f32) -> f32 {
        let magnitude = detail.abs();
        let gained = if magnitude <= self.x1 {
            self.m1 * magnitude
        } else {
            self.m1 * self.x1 + self.m2 * (magnitude - self.x1)
        };
        let signed = gained.copysign(detail);
        signed.clamp(-self.y3, self.y2)
    }
}

/// Sharpens the luminance of `source`; alpha is left untouched.
#[must_use]
pub fn sharpen(source: &RasterImage, params: &SharpenParams) -> RasterImage {
    let width = source.width() as usize;
    let height = source.height() as usize;
    let lightness: Vec<f32> = source.samples().chunks_exact(4).map(lightness).collect();
    let blurred = gaussian_blur(&lightness, width, height, params.sigma);

    let mut out = source.clone();
    for y in 0..source.height() {
        for x in 0..source.width() {
            let i = y as usize * width + x as usize;
            let delta = params.boost(lightness[i] - blurred[i]) * 255.0 / 100.0;
            let [r, g, b, a] = source.pixel(x, y);
            let apply = |c: u8| (f32::from(c) + delta).round().clamp(0.0, 255.0) as u8;
            out.set_pixel(x, y, [apply(r), apply(g), apply(b), a]);
        }
    }
    out
}

fn lightness(pixel: &[u8]) -> f32 {
    let luma = 0.2126 * f32::from(pixel[0]) + 0.7152 * f32::from(pixel[1]) + 0.0722 * f32::from(pixel[2]);
    luma * 100.0 / 255.0
}

fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil().max(1.0) as i32;
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Separable Gaussian blur of a single-channel plane, sampling edges by clamping.
fn gaussian_blur(plane: &[f32], width: usize, height: usize, sigma: f32) -> Vec<f32> {
    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;
    let clamp = |v: isize, max: usize| v.clamp(0, max as isize - 1) as usize;

    let mut horizontal = vec![0.0; plane.len()];
    for y in 0..height {
        for x in 0..width {
            horizontal[y * width + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, w)| w * plane[y * width + clamp(x as isize + k as isize - radius, width)])
                .sum();
        }
    }

    let mut vertical = vec![0.0; plane.len()];
    for y in 0..height {
        for x in 0..width {
            vertical[y * width + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, w)| {
                    w * horizontal[clamp(y as isize + k as isize - radius, height) * width + x]
                })
                .sum();
        }
    }
    vertical
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(1.0, 1.0 ; "flat_area_uses_m1")]
    #[test_case(6.0, 4.0 ; "jagged_area_uses_m2")]
    #[test_case(-6.0, -4.0 ; "negative_detail_is_symmetric")]
    #[test_case(40.0, 10.0 ; "brightening_clamped_to_y2")]
    #[test_case(-60.0, -20.0 ; "darkening_clamped_to_y3")]
    fn test_static_boost(detail: f32, expected: f32) {
        let boosted = SharpenParams::STATIC.boost(detail);
        assert!((boosted - expected).abs() < 1e-5, "got {boosted}");
    }

    #[test]
    fn test_kernel_is_normalized() {
        let kernel = gaussian_kernel(1.5);
        assert_eq!(kernel.len(), 11);
        assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_uniform_image_is_unchanged() {
        let samples = [90u8, 120, 150, 200].repeat(36);
        let source = RasterImage::new(6, 6, samples).unwrap();

        let out = sharpen(&source, &SharpenParams::STATIC);

        assert_eq!(out, source);
    }

    #[test]
    fn test_edge_contrast_increases_and_alpha_is_kept() {
        let mut samples = Vec::new();
        for _y in 0..4 {
            for x in 0..8 {
                let v = if x < 4 { 60 } else { 180 };
                samples.extend_from_slice(&[v, v, v, 128]);
            }
        }
        let source = RasterImage::new(8, 4, samples).unwrap();

        let out = sharpen(&source, &SharpenParams::STATIC);

        assert!(out.pixel(3, 2)[0] < 60);
        assert!(out.pixel(4, 2)[0] > 180);
        assert_eq!(out.pixel(3, 2)[3], 128);
    }
}
