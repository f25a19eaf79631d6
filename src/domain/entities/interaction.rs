//! Inbound interactions.

use super::{ApplicationId, ChannelId, InteractionId, UserId};

/// Interaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Ping,
    ApplicationCommand,
    Other(u8),
}

impl From<u8> for InteractionKind {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Ping,
            2 => Self::ApplicationCommand,
            other => Self::Other(other),
        }
    }
}

/// A typed command option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    String(String),
    Integer(i64),
}

/// Invoked command name and its options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandData {
    pub name: String,
    pub options: Vec<(String, OptionValue)>,
}

impl CommandData {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_option(mut self, name: impl Into<String>, value: OptionValue) -> Self {
        self.options.push((name.into(), value));
        self
    }

    /// Returns a string option by name.
    #[must_use]
    pub fn string_option(&self, name: &str) -> Option<&str> {
        self.options.iter().find_map(|(key, value)| match value {
            OptionValue::String(s) if key == name => Some(s.as_str()),
            _ => None,
        })
    }

    /// Returns an integer option by name.
    #[must_use]
    pub fn integer_option(&self, name: &str) -> Option<i64> {
        self.options.iter().find_map(|(key, value)| match value {
            OptionValue::Integer(i) if key == name => Some(*i),
            _ => None,
        })
    }
}

/// Handle needed to answer an interaction.
#[derive(Clone, PartialEq, Eq)]
pub struct InteractionRef {
    pub id: InteractionId,
    pub application_id: ApplicationId,
    pub token: String,
}

impl std::fmt::Debug for InteractionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionRef")
            .field("id", &self.id)
            .field("application_id", &self.application_id)
            .finish_non_exhaustive()
    }
}

/// An interaction delivered over the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub reference: InteractionRef,
    pub kind: InteractionKind,
    pub data: Option<CommandData>,
    pub channel_id: Option<ChannelId>,
    pub user_id: Option<UserId>,
}

impl Interaction {
    /// Returns the command name for application command interactions.
    #[must_use]
    pub fn command_name(&self) -> Option<&str> {
        match self.kind {
            InteractionKind::ApplicationCommand => self.data.as_ref().map(|d| d.name.as_str()),
            _ => None,
        }
    }
}
