//! Frame-by-frame processing of animated GIF emoji.

use std::io::Cursor;

use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::{AnimationDecoder, Frame};
use tracing::debug;

use super::pipeline::TARGET_SIZE;
use super::raster::RasterImage;
use super::resize::pad_fit;
use super::sharpen::{SharpenParams, sharpen};
use crate::domain::entities::{EnhancedImage, OutputFormat};
use crate::domain::errors::UpscaleError;

const ENCODER_SPEED: i32 = 10;

/// Resizes and lightly sharpens every frame, re-encoding as a looping GIF.
///
/// Frame delays are preserved. No edge or blend stage runs here.
///
/// # Errors
/// Returns `Pipeline` if the GIF cannot be decoded, has no frames or fails to encode.
pub fn enhance_animated(source: &[u8]) -> Result<EnhancedImage, UpscaleError> {
    let decoder = GifDecoder::new(Cursor::new(source))
        .map_err(|e| UpscaleError::pipeline(format!("gif decode error: {e}")))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| UpscaleError::pipeline(format!("gif frame error: {e}")))?;
    if frames.is_empty() {
        return Err(UpscaleError::pipeline("animation has no frames"));
    }
    debug!(frames = frames.len(), "Processing animated emoji");

    let encode_err = |e: image::ImageError| UpscaleError::pipeline(format!("gif encode error: {e}"));
    let mut output = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut output, ENCODER_SPEED);
        encoder.set_repeat(Repeat::Infinite).map_err(encode_err)?;

        for frame in frames {
            let delay = frame.delay();
            let raster = RasterImage::from_rgba(frame.into_buffer());
            let resized = pad_fit(&raster, TARGET_SIZE)?;
            let buffer = sharpen(&resized, &SharpenParams::ANIMATED).into_rgba()?;
            encoder
                .encode_frame(Frame::from_parts(buffer, 0, 0, delay))
                .map_err(encode_err)?;
        }
    }

    Ok(EnhancedImage::new(
        output,
        OutputFormat::Gif,
        TARGET_SIZE,
        TARGET_SIZE,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Delay, Rgba, RgbaImage};
    use std::time::Duration;

    fn gif(frame_count: u8) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut out);
            encoder.set_repeat(Repeat::Infinite).unwrap();
            for i in 0..frame_count {
                let buffer = RgbaImage::from_pixel(16, 16, Rgba([i * 60, 100, 200, 255]));
                let delay = Delay::from_numer_denom_ms(50, 1);
                encoder
                    .encode_frame(Frame::from_parts(buffer, 0, 0, delay))
                    .unwrap();
            }
        }
        out
    }

    #[test]
    fn test_every_frame_is_resized_and_delay_kept() {
        let image = enhance_animated(&gif(3)).unwrap();

        assert_eq!(image.format(), OutputFormat::Gif);
        let frames = GifDecoder::new(Cursor::new(image.bytes()))
            .unwrap()
            .into_frames()
            .collect_frames()
            .unwrap();
        assert_eq!(frames.len(), 3);
        for frame in &frames {
            assert_eq!(frame.buffer().dimensions(), (512, 512));
            assert_eq!(Duration::from(frame.delay()), Duration::from_millis(50));
        }
    }

    #[test]
    fn test_non_gif_is_rejected() {
        let result = enhance_animated(b"\x89PNG not really");
        assert!(matches!(result, Err(UpscaleError::Pipeline { .. })));
    }
}
