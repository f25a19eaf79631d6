use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "emoji-upscaler",
    version,
    about = "A Discord bot that upscales custom emojis",
    long_about = None
)]
pub struct CliArgs {
    /// Bot token.
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Upscale custom emojis in every message.
    #[arg(long)]
    pub auto_upscale: Option<bool>,

    /// Delete the triggering message after posting.
    #[arg(long)]
    pub delete_trigger_message: Option<bool>,

    /// Post a message when a passive upscale fails.
    #[arg(long)]
    pub notify_passive_failures: Option<bool>,

    /// HTTP request timeout in seconds.
    #[arg(long)]
    pub http_timeout_secs: Option<u64>,
}
