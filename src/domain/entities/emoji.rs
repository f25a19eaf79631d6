//! Custom emoji reference value object.

use super::EmojiId;

/// Base URL of the emoji CDN.
pub const EMOJI_CDN_BASE: &str = "https://cdn.discordapp.com/emojis";

/// Pixel size requested from the CDN.
pub const EMOJI_CDN_SIZE: u32 = 128;

/// A custom emoji found in text, e.g. `<:blob:123>` or `<a:party:456>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiReference {
    raw_token: String,
    display_name: String,
    id: EmojiId,
    animated: bool,
    source_url: String,
}

impl EmojiReference {
    /// Creates a reference and derives its CDN download URL.
    #[must_use]
    pub fn new(
        raw_token: impl Into<String>,
        display_name: impl Into<String>,
        id: EmojiId,
        animated: bool,
    ) -> Self {
        Self {
            raw_token: raw_token.into(),
            display_name: display_name.into(),
            id,
            animated,
            source_url: Self::cdn_url(id, animated),
        }
    }

    /// Builds the CDN URL for an emoji asset.
    #[must_use]
    pub fn cdn_url(id: EmojiId, animated: bool) -> String {
        let extension = if animated { "gif" } else { "png" };
        format!("{EMOJI_CDN_BASE}/{id}.{extension}?size={EMOJI_CDN_SIZE}")
    }

    /// Returns the token exactly as it appeared in the text.
    #[must_use]
    pub fn raw_token(&self) -> &str {
        &self.raw_token
    }

    /// Returns the emoji name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the emoji asset id.
    #[must_use]
    pub const fn id(&self) -> EmojiId {
        self.id
    }

    /// Returns whether the emoji is animated.
    #[must_use]
    pub const fn is_animated(&self) -> bool {
        self.animated
    }

    /// Returns the CDN download URL.
    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }
}

impl std::fmt::Display for EmojiReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_url() {
        let emoji = EmojiReference::new("<:blob:123>", "blob", EmojiId(123), false);
        assert_eq!(
            emoji.source_url(),
            "https://cdn.discordapp.com/emojis/123.png?size=128"
        );
    }

    #[test]
    fn test_animated_url() {
        let emoji = EmojiReference::new("<a:party:456>", "party", EmojiId(456), true);
        assert_eq!(
            emoji.source_url(),
            "https://cdn.discordapp.com/emojis/456.gif?size=128"
        );
        assert!(emoji.is_animated());
        assert_eq!(emoji.to_string(), "<a:party:456>");
    }
}
