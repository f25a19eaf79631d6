//! Application services.

mod emoji_parser;

pub use emoji_parser::EmojiParser;
