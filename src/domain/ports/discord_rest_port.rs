//! Discord REST port for interaction responses and channel messages.

use async_trait::async_trait;

use crate::domain::entities::{
    ApplicationCommand, ApplicationId, ChannelId, Embed, FileAttachment, InteractionRef, Message,
    MessageId,
};
use crate::domain::errors::DiscordError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageRequest {
    pub channel_id: ChannelId,
    pub content: Option<String>,
    pub reply_to: Option<MessageId>,
    pub embeds: Vec<Embed>,
    pub attachment: Option<FileAttachment>,
}

impl SendMessageRequest {
    #[must_use]
    pub const fn new(channel_id: ChannelId) -> Self {
        Self {
            channel_id,
            content: None,
            reply_to: None,
            embeds: Vec::new(),
            attachment: None,
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub const fn with_reply(mut self, message_id: MessageId) -> Self {
        self.reply_to = Some(message_id);
        self
    }

    #[must_use]
    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: FileAttachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Replacement body for a deferred interaction response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditResponseRequest {
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
    pub attachment: Option<FileAttachment>,
}

impl EditResponseRequest {
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: FileAttachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Port for the Discord REST operations the bot performs.
#[async_trait]
pub trait DiscordRestPort: Send + Sync {
    /// Overwrites the global application commands.
    async fn register_commands(
        &self,
        application_id: ApplicationId,
        commands: &[ApplicationCommand],
    ) -> Result<(), DiscordError>;

    /// Acknowledges an interaction, promising a later edit.
    async fn defer_interaction(&self, interaction: &InteractionRef) -> Result<(), DiscordError>;

    /// Replies to an interaction immediately with text.
    async fn respond_to_interaction(
        &self,
        interaction: &InteractionRef,
        content: &str,
    ) -> Result<(), DiscordError>;

    /// Replaces the original (deferred) interaction response.
    async fn edit_original_response(
        &self,
        interaction: &InteractionRef,
        request: EditResponseRequest,
    ) -> Result<(), DiscordError>;

    /// Posts a message to a channel.
    async fn send_message(&self, request: SendMessageRequest) -> Result<MessageId, DiscordError>;

    /// Fetches a single message.
    async fn get_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<Message, DiscordError>;

    /// Deletes a message.
    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), DiscordError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// A REST call observed by [`MockDiscordRest`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RestCall {
        RegisterCommands(ApplicationId, Vec<String>),
        Defer,
        Respond(String),
        EditOriginal(EditResponseRequest),
        Send(SendMessageRequest),
        GetMessage(ChannelId, MessageId),
        Delete(ChannelId, MessageId),
    }

    /// Recording REST mock with configurable failures.
    #[derive(Default)]
    pub struct MockDiscordRest {
        calls: Mutex<Vec<RestCall>>,
        stored_message: Mutex<Option<Message>>,
        fail_register: bool,
        fail_delete: bool,
        fail_send: bool,
    }

    impl MockDiscordRest {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_message(self, message: Message) -> Self {
            *self.stored_message.lock().unwrap() = Some(message);
            self
        }

        pub fn failing_register(mut self) -> Self {
            self.fail_register = true;
            self
        }

        pub fn failing_delete(mut self) -> Self {
            self.fail_delete = true;
            self
        }

        pub fn failing_send(mut self) -> Self {
            self.fail_send = true;
            self
        }

        pub fn calls(&self) -> Vec<RestCall> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: RestCall) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl DiscordRestPort for MockDiscordRest {
        async fn register_commands(
            &self,
            application_id: ApplicationId,
            commands: &[ApplicationCommand],
        ) -> Result<(), DiscordError> {
            self.record(RestCall::RegisterCommands(
                application_id,
                commands.iter().map(|c| c.name.clone()).collect(),
            ));
            if self.fail_register {
                return Err(DiscordError::Unauthorized);
            }
            Ok(())
        }

        async fn defer_interaction(
            &self,
            _interaction: &InteractionRef,
        ) -> Result<(), DiscordError> {
            self.record(RestCall::Defer);
            Ok(())
        }

        async fn respond_to_interaction(
            &self,
            _interaction: &InteractionRef,
            content: &str,
        ) -> Result<(), DiscordError> {
            self.record(RestCall::Respond(content.to_string()));
            Ok(())
        }

        async fn edit_original_response(
            &self,
            _interaction: &InteractionRef,
            request: EditResponseRequest,
        ) -> Result<(), DiscordError> {
            self.record(RestCall::EditOriginal(request));
            Ok(())
        }

        async fn send_message(
            &self,
            request: SendMessageRequest,
        ) -> Result<MessageId, DiscordError> {
            self.record(RestCall::Send(request));
            if self.fail_send {
                return Err(DiscordError::forbidden("Missing Permissions"));
            }
            Ok(MessageId(999))
        }

        async fn get_message(
            &self,
            channel_id: ChannelId,
            message_id: MessageId,
        ) -> Result<Message, DiscordError> {
            self.record(RestCall::GetMessage(channel_id, message_id));
            self.stored_message
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| DiscordError::not_found("Unknown Message"))
        }

        async fn delete_message(
            &self,
            channel_id: ChannelId,
            message_id: MessageId,
        ) -> Result<(), DiscordError> {
            self.record(RestCall::Delete(channel_id, message_id));
            if self.fail_delete {
                return Err(DiscordError::forbidden("Missing Permissions"));
            }
            Ok(())
        }
    }
}
