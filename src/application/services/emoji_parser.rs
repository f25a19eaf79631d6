use crate::domain::entities::{EmojiId, EmojiReference};
use crate::domain::errors::UpscaleError;

/// Finds custom emoji tokens of the form `<:name:id>` and `<a:name:id>`.
pub struct EmojiParser;

impl EmojiParser {
    /// Returns every custom emoji in `text`, in order of appearance.
    ///
    /// Duplicates are kept. Text without tokens yields an empty vector.
    #[must_use]
    pub fn extract_emojis(text: &str) -> Vec<EmojiReference> {
        let mut emojis = Vec::new();
        let mut cursor = 0;

        while let Some(offset) = text[cursor..].find('<') {
            let start = cursor + offset;
            match Self::parse_token(text, start) {
                Some((emoji, end)) => {
                    emojis.push(emoji);
                    cursor = end;
                }
                None => cursor = start + 1,
            }
        }

        emojis
    }

    /// Returns whether `input`, ignoring surrounding whitespace, is exactly one token.
    #[must_use]
    pub fn is_custom_emoji(input: &str) -> bool {
        Self::parse_exact(input).is_ok()
    }

    /// Parses `input` as exactly one token, ignoring surrounding whitespace.
    ///
    /// # Errors
    /// Returns `InvalidInput` for anything else, including unicode emoji.
    pub fn parse_exact(input: &str) -> Result<EmojiReference, UpscaleError> {
        let trimmed = input.trim();
        match Self::parse_token(trimmed, 0) {
            Some((emoji, end)) if end == trimmed.len() => Ok(emoji),
            _ => Err(UpscaleError::invalid_input(format!(
                "{trimmed:?} is not a custom emoji"
            ))),
        }
    }

    /// Returns the first custom emoji in `text`.
    #[must_use]
    pub fn first_emoji(text: &str) -> Option<EmojiReference> {
        Self::extract_emojis(text).into_iter().next()
    }

    /// Parses a token starting at the `<` at byte `start`, returning it and the end offset.
    fn parse_token(text: &str, start: usize) -> Option<(EmojiReference, usize)> {
        let bytes = text.as_bytes();
        let mut pos = start;

        if bytes.get(pos) != Some(&b'<') {
            return None;
        }
        pos += 1;

        let animated = bytes.get(pos) == Some(&b'a');
        if animated {
            pos += 1;
        }

        if bytes.get(pos) != Some(&b':') {
            return None;
        }
        pos += 1;

        let name_start = pos;
        while bytes
            .get(pos)
            .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
        {
            pos += 1;
        }
        if pos == name_start || bytes.get(pos) != Some(&b':') {
            return None;
        }
        let name = &text[name_start..pos];
        pos += 1;

        let id_start = pos;
        while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
            pos += 1;
        }
        if pos == id_start || bytes.get(pos) != Some(&b'>') {
            return None;
        }
        let id = EmojiId::parse(&text[id_start..pos])?;
        pos += 1;

        let emoji = EmojiReference::new(&text[start..pos], name, id, animated);
        Some((emoji, pos))
    }
}
