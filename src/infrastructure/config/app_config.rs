//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::args::CliArgs;
use crate::application::PassiveSettings;

pub(crate) const APP_NAME: &str = "emoji-upscaler";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "emoji-upscaler";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Bot configuration, read from `config.toml` and overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path. Logs go to stderr when unset.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Upscale the first custom emoji of every message.
    #[serde(default = "default_true")]
    pub auto_upscale: bool,

    /// Delete the triggering message after posting the result.
    #[serde(default = "default_true")]
    pub delete_trigger_message: bool,

    /// Tell the channel when a passive upscale fails.
    #[serde(default)]
    pub notify_passive_failures: bool,

    /// Reaction that requests an upscale of the reacted message.
    #[serde(default = "default_reaction_emoji")]
    pub reaction_emoji: String,

    /// Message prefix that always requests an upscale.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,

    /// Timeout for CDN and REST requests.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Reconnect to the gateway after recoverable disconnects.
    #[serde(default = "default_true")]
    pub gateway_reconnect: bool,

    /// Consecutive failed gateway reconnects before giving up.
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
}

fn default_true() -> bool {
    true
}

fn default_reaction_emoji() -> String {
    "🔍".to_string()
}

fn default_command_prefix() -> String {
    "!upscale".to_string()
}

const fn default_http_timeout_secs() -> u64 {
    30
}

const fn default_max_reconnect_attempts() -> u32 {
    10
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(auto_upscale) = args.auto_upscale {
            self.auto_upscale = auto_upscale;
        }
        if let Some(delete) = args.delete_trigger_message {
            self.delete_trigger_message = delete;
        }
        if let Some(notify) = args.notify_passive_failures {
            self.notify_passive_failures = notify;
        }
        if let Some(timeout) = args.http_timeout_secs {
            self.http_timeout_secs = timeout;
        }
    }

    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Returns the switches used by message and reaction triggers.
    #[must_use]
    pub fn passive_settings(&self) -> PassiveSettings {
        PassiveSettings {
            auto_upscale: self.auto_upscale,
            command_prefix: self.command_prefix.clone(),
            reaction_emoji: self.reaction_emoji.clone(),
            delete_trigger_message: self.delete_trigger_message,
            notify_failures: self.notify_passive_failures,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            auto_upscale: true,
            delete_trigger_message: true,
            notify_passive_failures: false,
            reaction_emoji: default_reaction_emoji(),
            command_prefix: default_command_prefix(),
            http_timeout_secs: default_http_timeout_secs(),
            gateway_reconnect: true,
            max_reconnect_attempts: default_max_reconnect_attempts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"
            auto_upscale = false
            reaction_emoji = "🔎"
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(!config.auto_upscale);
        assert_eq!(config.reaction_emoji, "🔎");
        assert!(config.delete_trigger_message);
        assert_eq!(config.command_prefix, "!upscale");
        assert_eq!(config.http_timeout_secs, 30);
        assert!(config.gateway_reconnect);
        assert_eq!(config.max_reconnect_attempts, 10);
    }

    #[test]
    fn test_parse_gateway_settings() {
        let config: AppConfig = toml::from_str(
            r#"
            gateway_reconnect = false
            max_reconnect_attempts = 3
        "#,
        )
        .unwrap();

        assert!(!config.gateway_reconnect);
        assert_eq!(config.max_reconnect_attempts, 3);
    }

    #[test]
    fn test_empty_config_matches_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(!config.notify_passive_failures);
    }

    #[test]
    fn test_args_override_config() {
        let mut config = AppConfig::default();
        let args = CliArgs::parse_from([
            "emoji-upscaler",
            "--token",
            "a.b.c",
            "--log-level",
            "warn",
            "--auto-upscale",
            "false",
            "--notify-passive-failures",
            "true",
        ]);

        config.merge_with_args(&args);

        assert_eq!(config.log_level, LogLevel::Warn);
        assert!(!config.auto_upscale);
        assert!(config.notify_passive_failures);
        assert!(config.delete_trigger_message);

        let settings = config.passive_settings();
        assert!(!settings.auto_upscale);
        assert!(settings.notify_failures);
    }
}
