//! Routes gateway events to the upscale use cases.

use std::future::Future;
use std::sync::{Arc, OnceLock};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::commands::{UPSCALE_COMMAND, all_commands};
use crate::application::use_cases::{
    PassiveSettings, PassiveUpscaleUseCase, UpscaleCommandUseCase, UpscaleEmojiUseCase,
};
use crate::domain::entities::{ApplicationId, UserId};
use crate::domain::ports::{AssetFetcherPort, DiscordRestPort, ImageEnhancerPort};
use crate::infrastructure::discord::{DispatchEvent, GatewayEventKind};

/// Why [`UpscaleBot::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotExit {
    /// The shutdown signal fired.
    Shutdown,
    /// The gateway stopped producing events.
    GatewayClosed,
}

/// Authenticated bot session shared by every spawned handler.
#[derive(Clone)]
pub struct UpscaleBot {
    rest: Arc<dyn DiscordRestPort>,
    command: UpscaleCommandUseCase,
    passive: PassiveUpscaleUseCase,
    own_user_id: Arc<OnceLock<UserId>>,
}

impl UpscaleBot {
    #[must_use]
    pub fn new(
        rest: Arc<dyn DiscordRestPort>,
        fetcher: Arc<dyn AssetFetcherPort>,
        enhancer: Arc<dyn ImageEnhancerPort>,
        settings: PassiveSettings,
    ) -> Self {
        let upscale = UpscaleEmojiUseCase::new(fetcher, enhancer);

        Self {
            command: UpscaleCommandUseCase::new(rest.clone(), upscale.clone()),
            passive: PassiveUpscaleUseCase::new(rest.clone(), upscale, settings),
            rest,
            own_user_id: Arc::default(),
        }
    }

    /// Consumes gateway events until `shutdown` resolves or the stream ends.
    pub async fn run(
        &self,
        mut events: mpsc::UnboundedReceiver<GatewayEventKind>,
        shutdown: impl Future<Output = ()>,
    ) -> BotExit {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown requested");
                    return BotExit::Shutdown;
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        warn!("Gateway event stream closed");
                        return BotExit::GatewayClosed;
                    };
                    self.handle_event(event);
                }
            }
        }
    }

    /// Handles one gateway event, spawning a task when work is needed.
    pub fn handle_event(&self, event: GatewayEventKind) -> Option<JoinHandle<()>> {
        match event {
            GatewayEventKind::Connected { session_id } => {
                info!(session_id = %session_id, "Gateway connected");
                None
            }
            GatewayEventKind::Resumed => {
                info!("Gateway session resumed");
                None
            }
            GatewayEventKind::Disconnected { reason, can_resume } => {
                warn!(reason = %reason, can_resume, "Gateway disconnected");
                None
            }
            GatewayEventKind::Reconnecting { attempt } => {
                info!(attempt, "Gateway reconnecting");
                None
            }
            GatewayEventKind::Error {
                message,
                recoverable,
            } => {
                error!(message = %message, recoverable, "Gateway error");
                None
            }
            GatewayEventKind::Dispatch(dispatch) => self.handle_dispatch(dispatch),
        }
    }

    fn handle_dispatch(&self, event: DispatchEvent) -> Option<JoinHandle<()>> {
        match event {
            DispatchEvent::Ready {
                user_id,
                application_id,
                ..
            } => {
                info!(user_id = %user_id, "Logged in");
                let _ = self.own_user_id.set(user_id);
                Some(self.spawn_command_registration(application_id))
            }
            DispatchEvent::MessageCreate { message } => {
                let passive = self.passive.clone();
                Some(tokio::spawn(async move {
                    match passive.on_message(&message).await {
                        Ok(outcome) => debug!(?outcome, message_id = %message.id, "Message handled"),
                        Err(e) => error!(error = %e, message_id = %message.id, "Message handling failed"),
                    }
                }))
            }
            DispatchEvent::MessageReactionAdd { mut reaction } => {
                // DM reactions carry no member, so the bot flag alone misses our own.
                if self.own_user_id.get() == Some(&reaction.user_id) {
                    reaction.user_is_bot = true;
                }
                let passive = self.passive.clone();
                Some(tokio::spawn(async move {
                    match passive.on_reaction(&reaction).await {
                        Ok(outcome) => debug!(?outcome, message_id = %reaction.message_id, "Reaction handled"),
                        Err(e) => error!(error = %e, message_id = %reaction.message_id, "Reaction handling failed"),
                    }
                }))
            }
            DispatchEvent::InteractionCreate { interaction } => {
                if interaction.command_name() != Some(UPSCALE_COMMAND) {
                    debug!(kind = ?interaction.kind, "Ignoring interaction");
                    return None;
                }
                let command = self.command.clone();
                Some(tokio::spawn(async move {
                    match command.execute(&interaction).await {
                        Ok(outcome) => debug!(?outcome, "Command handled"),
                        Err(e) => error!(error = %e, "Command handling failed"),
                    }
                }))
            }
            DispatchEvent::Unknown { event_type } => {
                debug!(event = %event_type, "Ignoring dispatch");
                None
            }
        }
    }

    fn spawn_command_registration(&self, application_id: ApplicationId) -> JoinHandle<()> {
        let rest = self.rest.clone();
        tokio::spawn(async move {
            let commands = all_commands();
            match rest.register_commands(application_id, &commands).await {
                Ok(()) => info!(count = commands.len(), "Registered slash commands"),
                Err(e) => error!(error = %e, "Failed to register slash commands"),
            }
        })
    }
}
