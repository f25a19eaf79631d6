//! Enhancement options and results.

/// Upscale factor accepted by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScaleFactor {
    /// Two times.
    X2,
    /// Four times.
    #[default]
    X4,
    /// Eight times.
    X8,
}

impl ScaleFactor {
    /// All accepted factors, smallest first.
    pub const ALL: [Self; 3] = [Self::X2, Self::X4, Self::X8];

    /// Converts a raw integer, rejecting anything outside {2, 4, 8}.
    #[must_use]
    pub const fn from_i64(value: i64) -> Option<Self> {
        match value {
            2 => Some(Self::X2),
            4 => Some(Self::X4),
            8 => Some(Self::X8),
            _ => None,
        }
    }

    /// Returns the multiplier.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        match self {
            Self::X2 => 2,
            Self::X4 => 4,
            Self::X8 => 8,
        }
    }
}

impl std::fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// Per-invocation pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnhancementOptions {
    /// Upscale factor.
    pub scale: ScaleFactor,
    /// Whether the source is a multi-frame asset.
    pub animated: bool,
}

impl EnhancementOptions {
    /// Creates options.
    #[must_use]
    pub const fn new(scale: ScaleFactor, animated: bool) -> Self {
        Self { scale, animated }
    }
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossless static raster.
    Png,
    /// Multi-frame animation.
    Gif,
}

impl OutputFormat {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }

    /// MIME type.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }
}

/// The single encoded output of one pipeline run.
#[derive(Clone, PartialEq, Eq)]
pub struct EnhancedImage {
    bytes: Vec<u8>,
    format: OutputFormat,
    width: u32,
    height: u32,
    fell_back: bool,
}

impl EnhancedImage {
    /// Creates a result.
    #[must_use]
    pub const fn new(bytes: Vec<u8>, format: OutputFormat, width: u32, height: u32) -> Self {
        Self {
            bytes,
            format,
            width,
            height,
            fell_back: false,
        }
    }

    /// Marks the result as produced by the static fallback of the animated path.
    #[must_use]
    pub const fn into_fallback(mut self) -> Self {
        self.fell_back = true;
        self
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the result and returns the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    #[must_use]
    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns whether the animated path failed and the static pipeline ran instead.
    #[must_use]
    pub const fn fell_back(&self) -> bool {
        self.fell_back
    }
}

impl std::fmt::Debug for EnhancedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnhancedImage")
            .field("len", &self.bytes.len())
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("fell_back", &self.fell_back)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(2, Some(ScaleFactor::X2) ; "two")]
    #[test_case(4, Some(ScaleFactor::X4) ; "four")]
    #[test_case(8, Some(ScaleFactor::X8) ; "eight")]
    #[test_case(3, None ; "three_rejected")]
    #[test_case(16, None ; "sixteen_rejected")]
    #[test_case(-4, None ; "negative_rejected")]
    fn test_scale_from_i64(value: i64, expected: Option<ScaleFactor>) {
        assert_eq!(ScaleFactor::from_i64(value), expected);
    }

    #[test]
    fn test_default_scale_is_four() {
        assert_eq!(ScaleFactor::default().as_u32(), 4);
        assert_eq!(EnhancementOptions::default().scale, ScaleFactor::X4);
    }

    #[test]
    fn test_fallback_flag() {
        let image = EnhancedImage::new(vec![1, 2, 3], OutputFormat::Png, 512, 512);
        assert!(!image.fell_back());
        assert!(image.into_fallback().fell_back());
    }
}
