//! Application (slash) command definitions.

use serde::Serialize;

/// Option value types understood by the command API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOptionKind {
    String,
    Integer,
}

impl CommandOptionKind {
    /// Returns the numeric option type used on the wire.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::String => 3,
            Self::Integer => 4,
        }
    }
}

impl Serialize for CommandOptionKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// A fixed choice for an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandChoice {
    pub name: String,
    pub value: i64,
}

/// One option of an application command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOption {
    #[serde(rename = "type")]
    pub kind: CommandOptionKind,
    pub name: String,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<CommandChoice>,
}

impl CommandOption {
    #[must_use]
    pub fn new(
        kind: CommandOptionKind,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            description: description.into(),
            required: false,
            choices: Vec::new(),
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_choice(mut self, name: impl Into<String>, value: i64) -> Self {
        self.choices.push(CommandChoice {
            name: name.into(),
            value,
        });
        self
    }
}

/// A chat-input application command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationCommand {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

impl ApplicationCommand {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }
}
