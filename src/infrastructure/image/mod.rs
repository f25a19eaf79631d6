//! Image download and enhancement.
//!
//! The static path resizes, sharpens and edge-blends a raster before a final
//! 512×512 resize. Animated GIFs are processed frame by frame and fall back to
//! the static path when they cannot be handled.

pub mod animated;
pub mod convolve;
pub mod fetcher;
pub mod pipeline;
pub mod raster;
pub mod resize;
pub mod sharpen;

pub use fetcher::HttpAssetFetcher;
pub use pipeline::{ImageEnhancer, TARGET_SIZE, enhance_static};
pub use raster::RasterImage;
