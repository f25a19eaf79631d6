//! Slash command definitions registered on every READY.

use crate::domain::entities::{ApplicationCommand, CommandOption, CommandOptionKind, ScaleFactor};

pub const UPSCALE_COMMAND: &str = "upscale";

/// Definition of `/upscale`.
#[must_use]
pub fn upscale_command() -> ApplicationCommand {
    let scale = ScaleFactor::ALL.iter().fold(
        CommandOption::new(
            CommandOptionKind::Integer,
            "scale",
            "Upscale factor (2, 4, or 8)",
        ),
        |option, factor| option.with_choice(format!("{factor}x"), i64::from(factor.as_u32())),
    );

    ApplicationCommand::new(
        UPSCALE_COMMAND,
        "Upscale a custom emoji to make it larger and sharper",
    )
    .with_option(
        CommandOption::new(
            CommandOptionKind::String,
            "emoji",
            "The custom emoji to upscale",
        )
        .required(),
    )
    .with_option(scale)
}

/// Every command the bot owns.
#[must_use]
pub fn all_commands() -> Vec<ApplicationCommand> {
    vec![upscale_command()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upscale_command_payload() {
        let value = serde_json::to_value(upscale_command()).unwrap();

        assert_eq!(
            value,
            json!({
                "name": "upscale",
                "description": "Upscale a custom emoji to make it larger and sharper",
                "options": [
                    {
                        "type": 3,
                        "name": "emoji",
                        "description": "The custom emoji to upscale",
                        "required": true
                    },
                    {
                        "type": 4,
                        "name": "scale",
                        "description": "Upscale factor (2, 4, or 8)",
                        "required": false,
                        "choices": [
                            {"name": "2x", "value": 2},
                            {"name": "4x", "value": 4},
                            {"name": "8x", "value": 8}
                        ]
                    }
                ]
            })
        );
    }
}
