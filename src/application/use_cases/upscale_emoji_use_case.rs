//! Fetch, enhance and name one emoji.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::{EmojiReference, EnhancementOptions, FileAttachment, ScaleFactor};
use crate::domain::errors::UpscaleError;
use crate::domain::ports::{AssetFetcherPort, ImageEnhancerPort};

/// Shared core of every trigger: download the asset and run the pipeline on it.
#[derive(Clone)]
pub struct UpscaleEmojiUseCase {
    fetcher: Arc<dyn AssetFetcherPort>,
    enhancer: Arc<dyn ImageEnhancerPort>,
}

impl UpscaleEmojiUseCase {
    #[must_use]
    pub const fn new(
        fetcher: Arc<dyn AssetFetcherPort>,
        enhancer: Arc<dyn ImageEnhancerPort>,
    ) -> Self {
        Self { fetcher, enhancer }
    }

    /// Produces the upscaled attachment for `emoji`.
    ///
    /// # Errors
    /// Returns `Fetch` when the download fails and `Pipeline` when enhancement fails.
    pub async fn execute(
        &self,
        emoji: &EmojiReference,
        scale: ScaleFactor,
    ) -> Result<FileAttachment, UpscaleError> {
        debug!(emoji = %emoji, url = emoji.source_url(), "Fetching emoji asset");
        let source = self.fetcher.fetch(emoji.source_url()).await?;

        let options = EnhancementOptions::new(scale, emoji.is_animated());
        let enhancer = Arc::clone(&self.enhancer);
        let image = tokio::task::spawn_blocking(move || enhancer.enhance(&source, options))
            .await
            .map_err(|e| UpscaleError::pipeline(format!("enhancement task failed: {e}")))??;

        info!(
            emoji = emoji.display_name(),
            scale = %scale,
            format = image.format().extension(),
            fell_back = image.fell_back(),
            bytes = image.bytes().len(),
            "Emoji upscaled"
        );

        Ok(FileAttachment::upscaled(emoji, image))
    }
}
