use crate::domain::entities::{ApplicationId, Interaction, Message, ReactionAdd, UserId};

/// Events emitted by the gateway client.
#[derive(Debug, Clone)]
pub enum GatewayEventKind {
    Connected {
        session_id: String,
    },
    Resumed,
    Disconnected {
        reason: String,
        can_resume: bool,
    },
    Reconnecting {
        attempt: u32,
    },
    Dispatch(DispatchEvent),
    Error {
        message: String,
        recoverable: bool,
    },
}

/// Dispatch events the bot reacts to.
#[derive(Debug, Clone)]
pub enum DispatchEvent {
    Ready {
        session_id: String,
        resume_gateway_url: Option<String>,
        user_id: UserId,
        application_id: ApplicationId,
    },
    MessageCreate {
        message: Message,
    },
    MessageReactionAdd {
        reaction: ReactionAdd,
    },
    InteractionCreate {
        interaction: Interaction,
    },
    Unknown {
        event_type: String,
    },
}

impl DispatchEvent {
    #[must_use]
    pub fn event_name(&self) -> &str {
        match self {
            Self::Ready { .. } => "READY",
            Self::MessageCreate { .. } => "MESSAGE_CREATE",
            Self::MessageReactionAdd { .. } => "MESSAGE_REACTION_ADD",
            Self::InteractionCreate { .. } => "INTERACTION_CREATE",
            Self::Unknown { event_type } => event_type,
        }
    }
}
