use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use emoji_upscaler::domain::entities::AuthToken;
use emoji_upscaler::infrastructure::{
    AppConfig, CliArgs, ConfigStore, DiscordClient, GatewayClient, GatewayClientConfig,
    HttpAssetFetcher, ImageEnhancer,
};
use emoji_upscaler::presentation::{BotExit, UpscaleBot};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let store = ConfigStore::new()?;
    let mut config = store.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn resolve_token(args: &CliArgs) -> Result<AuthToken> {
    let raw = args
        .token
        .as_deref()
        .ok_or_else(|| eyre!("no bot token: set DISCORD_TOKEN or pass --token"))?;

    AuthToken::new(raw).ok_or_else(|| eyre!("DISCORD_TOKEN is not a valid bot token"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let env_file = dotenvy::dotenv().ok();
    let args = CliArgs::parse();
    let config = load_config(&args)?;

    init_logging(&config)?;

    info!(version = emoji_upscaler::VERSION, "Starting emoji-upscaler");
    if let Some(path) = env_file {
        debug!(path = %path.display(), "Loaded environment file");
    }

    let token = resolve_token(&args)?;
    debug!(token = %token, "Using bot token");

    let rest = Arc::new(DiscordClient::new(&token, config.http_timeout())?);
    let fetcher = Arc::new(HttpAssetFetcher::new(config.http_timeout())?);
    let bot = UpscaleBot::new(
        rest,
        fetcher,
        Arc::new(ImageEnhancer::new()),
        config.passive_settings(),
    );

    let gateway_config = GatewayClientConfig::new()
        .with_auto_reconnect(config.gateway_reconnect)
        .with_max_reconnect_attempts(config.max_reconnect_attempts);
    let mut gateway = GatewayClient::new(gateway_config);
    let events = gateway.connect(&token)?;

    let exit = bot.run(events, shutdown_signal()).await;
    gateway.disconnect().await;
    info!(?exit, "Bot stopped");

    match exit {
        BotExit::Shutdown => Ok(()),
        BotExit::GatewayClosed => Err(eyre!("gateway connection closed")),
    }
}
