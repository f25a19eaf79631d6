//! Snowflake identifiers.

use serde::{Deserialize, Serialize};

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the underlying u64 value.
            #[must_use]
            pub const fn as_u64(self) -> u64 {
                self.0
            }

            /// Parses a snowflake from its decimal string form.
            #[must_use]
            pub fn parse(value: &str) -> Option<Self> {
                value.parse::<u64>().ok().map(Self)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

snowflake_id!(
    /// Unique identifier for a Discord application.
    ApplicationId
);
snowflake_id!(
    /// Unique identifier for a Discord channel.
    ChannelId
);
snowflake_id!(
    /// Unique identifier for a custom emoji asset.
    EmojiId
);
snowflake_id!(
    /// Unique identifier for a Discord guild.
    GuildId
);
snowflake_id!(
    /// Unique identifier for an interaction.
    InteractionId
);
snowflake_id!(
    /// Unique identifier for a Discord message.
    MessageId
);
snowflake_id!(
    /// Unique identifier for a Discord user.
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snowflake() {
        assert_eq!(ChannelId::parse("123456789"), Some(ChannelId(123_456_789)));
        assert_eq!(MessageId::parse("not-a-number"), None);
        assert_eq!(UserId::parse(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(EmojiId(42).to_string(), "42");
    }
}
