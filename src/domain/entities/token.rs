//! Bot token value object.

use std::fmt;

/// Discord bot token with validation and masking.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    value: String,
}

impl AuthToken {
    const BOT_PREFIX: &'static str = "Bot ";

    /// Creates a token, accepting an optional `Bot ` prefix.
    ///
    /// Returns `None` unless the value has three non-empty dot-separated parts.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        let trimmed = trimmed.strip_prefix(Self::BOT_PREFIX).unwrap_or(trimmed).trim();

        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() != 3 || parts.iter().any(|part| part.is_empty()) {
            return None;
        }

        Some(Self {
            value: trimmed.to_string(),
        })
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the `Authorization` header value for REST calls.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("{}{}", Self::BOT_PREFIX, self.value)
    }

    /// Returns masked token for display.
    #[must_use]
    pub fn masked(&self) -> String {
        if self.value.len() <= 10 {
            return "*".repeat(self.value.len());
        }

        let visible_prefix = &self.value[..4];
        let visible_suffix = &self.value[self.value.len() - 4..];
        format!("{visible_prefix}...{visible_suffix}")
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const VALID: &str = "MTIzNDU2Nzg5MDEyMzQ1Njc4OQ.GhIjKl.YYYYYYYYYYYYYYYYYYYYYYYYYYYY";

    #[test]
    fn test_valid_token_creation() {
        let token = AuthToken::new(VALID);
        assert_eq!(token.map(|t| t.as_str().to_string()), Some(VALID.to_string()));
    }

    #[test]
    fn test_bot_prefix_is_stripped() {
        let token = AuthToken::new(format!("  Bot {VALID}\n"));
        assert_eq!(
            token.map(|t| t.authorization_header()),
            Some(format!("Bot {VALID}"))
        );
    }

    #[test_case("" ; "empty")]
    #[test_case("short" ; "single_part")]
    #[test_case("a.b" ; "two_parts")]
    #[test_case("a..c" ; "empty_middle")]
    #[test_case("a.b.c.d" ; "four_parts")]
    fn test_invalid_tokens(value: &str) {
        assert!(AuthToken::new(value).is_none());
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let token = AuthToken::new(VALID).expect("valid token");
        let debug_output = format!("{token:?}");
        let display_output = token.to_string();

        assert!(!debug_output.contains(VALID));
        assert!(!display_output.contains(VALID));
        assert!(display_output.contains("..."));
    }
}
