//! Errors raised while turning an emoji reference into an upscaled image.

use thiserror::Error;

/// Upscale error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum UpscaleError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("failed to fetch emoji asset: {message}")]
    Fetch { message: String },

    #[error("image pipeline failed: {message}")]
    Pipeline { message: String },
}

impl UpscaleError {
    /// Creates invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates fetch error.
    #[must_use]
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Creates pipeline error.
    #[must_use]
    pub fn pipeline(message: impl Into<String>) -> Self {
        Self::Pipeline {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            UpscaleError::fetch("status 404").to_string(),
            "failed to fetch emoji asset: status 404"
        );
    }
}
