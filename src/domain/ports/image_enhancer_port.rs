//! Image enhancement port.

use crate::domain::entities::{EnhancedImage, EnhancementOptions};
use crate::domain::errors::UpscaleError;

/// Port for the CPU-bound enhancement pipeline.
///
/// Implementations are synchronous; callers move work off the async runtime.
pub trait ImageEnhancerPort: Send + Sync {
    /// Decodes, enhances and re-encodes a source image.
    fn enhance(
        &self,
        source: &[u8],
        options: EnhancementOptions,
    ) -> Result<EnhancedImage, UpscaleError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::entities::OutputFormat;
    use std::sync::Mutex;

    /// Mock enhancer echoing a fixed result and recording the options it saw.
    pub struct MockImageEnhancer {
        response: Result<EnhancedImage, UpscaleError>,
        calls: Mutex<Vec<EnhancementOptions>>,
    }

    impl MockImageEnhancer {
        pub fn returning(format: OutputFormat) -> Self {
            Self {
                response: Ok(EnhancedImage::new(vec![0xAB; 16], format, 512, 512)),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                response: Err(UpscaleError::pipeline(message)),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<EnhancementOptions> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ImageEnhancerPort for MockImageEnhancer {
        fn enhance(
            &self,
            _source: &[u8],
            options: EnhancementOptions,
        ) -> Result<EnhancedImage, UpscaleError> {
            self.calls.lock().unwrap().push(options);
            self.response.clone()
        }
    }
}
