//! Outgoing file attachment.

use super::{EmojiReference, EnhancedImage, OutputFormat};

/// A named file uploaded alongside a message.
#[derive(Clone, PartialEq, Eq)]
pub struct FileAttachment {
    filename: String,
    bytes: Vec<u8>,
    content_type: &'static str,
}

impl FileAttachment {
    /// Creates an attachment.
    #[must_use]
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>, content_type: &'static str) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            content_type,
        }
    }

    /// Names an enhanced image after its source emoji: `{name}_upscaled.{ext}`.
    #[must_use]
    pub fn upscaled(emoji: &EmojiReference, image: EnhancedImage) -> Self {
        let format = image.format();
        Self::new(
            Self::upscaled_filename(emoji.display_name(), format),
            image.into_bytes(),
            format.content_type(),
        )
    }

    /// Returns the file name used for an upscaled emoji.
    #[must_use]
    pub fn upscaled_filename(display_name: &str, format: OutputFormat) -> String {
        format!("{display_name}_upscaled.{}", format.extension())
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// Returns the `attachment://` URL embeds use to reference this file.
    #[must_use]
    pub fn attachment_url(&self) -> String {
        format!("attachment://{}", self.filename)
    }
}

impl std::fmt::Debug for FileAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAttachment")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}
