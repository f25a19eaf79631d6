//! Discord REST client for bot operations.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode, header};
use tracing::{debug, warn};

use super::dto::{
    ErrorResponse, InteractionCallback, MessagePayload, MessageResponse, RateLimitResponse,
    parse_id,
};
use crate::domain::entities::{
    ApplicationCommand, ApplicationId, AuthToken, ChannelId, FileAttachment, InteractionRef,
    Message, MessageId,
};
use crate::domain::errors::DiscordError;
use crate::domain::ports::{DiscordRestPort, EditResponseRequest, SendMessageRequest};

const DISCORD_API_BASE: &str = "https://discord.com/api/v10";
const USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/emoji-upscaler/emoji-upscaler, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Discord REST client authenticated as a bot.
pub struct DiscordClient {
    client: Client,
    base_url: String,
    authorization: String,
}

impl DiscordClient {
    /// Creates new client with default base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(token: &AuthToken, timeout: Duration) -> Result<Self, DiscordError> {
        Self::with_base_url(token, timeout, DISCORD_API_BASE)
    }

    /// Creates client with custom base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(
        token: &AuthToken,
        timeout: Duration,
        base_url: impl Into<String>,
    ) -> Result<Self, DiscordError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| DiscordError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            authorization: token.authorization_header(),
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(header::AUTHORIZATION, &self.authorization)
    }

    async fn send(&self, route: &str, builder: RequestBuilder) -> Result<reqwest::Response, DiscordError> {
        debug!(route, "Sending Discord API request");

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, route, "Failed to reach Discord API");
            if e.is_timeout() {
                DiscordError::network("request timed out")
            } else if e.is_connect() {
                DiscordError::network("failed to connect to Discord")
            } else {
                DiscordError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::handle_error_response(status, response).await)
        }
    }

    async fn handle_error_response(status: StatusCode, response: reqwest::Response) -> DiscordError {
        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_ms = serde_json::from_str::<RateLimitResponse>(&body)
                .map(|r| seconds_to_millis(r.retry_after))
                .unwrap_or(5000);
            return DiscordError::RateLimited { retry_after_ms };
        }

        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or_else(|_| format!("HTTP {status}"));

        match status {
            StatusCode::UNAUTHORIZED => DiscordError::Unauthorized,
            StatusCode::FORBIDDEN => DiscordError::forbidden(message),
            StatusCode::NOT_FOUND => DiscordError::not_found(message),
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
                DiscordError::network("Discord API is temporarily unavailable")
            }
            _ => DiscordError::http(status.as_u16(), message),
        }
    }

    fn message_body(
        payload: &MessagePayload<'_>,
        attachment: Option<&FileAttachment>,
        builder: RequestBuilder,
    ) -> Result<RequestBuilder, DiscordError> {
        let Some(attachment) = attachment else {
            return Ok(builder.json(payload));
        };

        let json = serde_json::to_string(payload)
            .map_err(|e| DiscordError::unexpected(format!("failed to encode payload: {e}")))?;
        let file = Part::bytes(attachment.bytes().to_vec())
            .file_name(attachment.filename().to_string())
            .mime_str(attachment.content_type())
            .map_err(|e| DiscordError::unexpected(format!("invalid content type: {e}")))?;

        Ok(builder.multipart(Form::new().text("payload_json", json).part("files[0]", file)))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn seconds_to_millis(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1000.0).ceil() as u64
}

#[async_trait]
impl DiscordRestPort for DiscordClient {
    async fn register_commands(
        &self,
        application_id: ApplicationId,
        commands: &[ApplicationCommand],
    ) -> Result<(), DiscordError> {
        let route = format!("/applications/{application_id}/commands");
        let url = format!("{}{route}", self.base_url);

        self.send(&route, self.authorized(self.client.put(&url)).json(commands))
            .await?;
        Ok(())
    }

    async fn defer_interaction(&self, interaction: &InteractionRef) -> Result<(), DiscordError> {
        let url = format!(
            "{}/interactions/{}/{}/callback",
            self.base_url, interaction.id, interaction.token
        );

        self.send(
            "/interactions/callback",
            self.client.post(&url).json(&InteractionCallback::deferred()),
        )
        .await?;
        Ok(())
    }

    async fn respond_to_interaction(
        &self,
        interaction: &InteractionRef,
        content: &str,
    ) -> Result<(), DiscordError> {
        let url = format!(
            "{}/interactions/{}/{}/callback",
            self.base_url, interaction.id, interaction.token
        );

        self.send(
            "/interactions/callback",
            self.client
                .post(&url)
                .json(&InteractionCallback::message(content)),
        )
        .await?;
        Ok(())
    }

    async fn edit_original_response(
        &self,
        interaction: &InteractionRef,
        request: EditResponseRequest,
    ) -> Result<(), DiscordError> {
        let url = format!(
            "{}/webhooks/{}/{}/messages/@original",
            self.base_url, interaction.application_id, interaction.token
        );
        let payload = MessagePayload::new(
            request.content.as_deref(),
            &request.embeds,
            request.attachment.as_ref(),
        );
        let builder =
            Self::message_body(&payload, request.attachment.as_ref(), self.client.patch(&url))?;

        self.send("/webhooks/messages/@original", builder).await?;
        Ok(())
    }

    async fn send_message(&self, request: SendMessageRequest) -> Result<MessageId, DiscordError> {
        let route = format!("/channels/{}/messages", request.channel_id);
        let url = format!("{}{route}", self.base_url);
        let payload = MessagePayload::new(
            request.content.as_deref(),
            &request.embeds,
            request.attachment.as_ref(),
        )
        .replying_to(request.reply_to);
        let builder = Self::message_body(
            &payload,
            request.attachment.as_ref(),
            self.authorized(self.client.post(&url)),
        )?;

        let response = self.send(&route, builder).await?;
        let created: MessageResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse message response");
            DiscordError::invalid_response(format!("failed to parse response: {e}"))
        })?;

        parse_id(&created.id, "message id", MessageId::parse)
    }

    async fn get_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<Message, DiscordError> {
        let route = format!("/channels/{channel_id}/messages/{message_id}");
        let url = format!("{}{route}", self.base_url);

        let response = self
            .send(&route, self.authorized(self.client.get(&url)))
            .await?;
        let message: MessageResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse message response");
            DiscordError::invalid_response(format!("failed to parse response: {e}"))
        })?;

        message.into_domain()
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), DiscordError> {
        let route = format!("/channels/{channel_id}/messages/{message_id}");
        let url = format!("{}{route}", self.base_url);

        self.send(&route, self.authorized(self.client.delete(&url)))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Embed, InteractionId};
    use mockito::{Matcher, Server};

    const TOKEN: &str = "MTIzNDU2Nzg5MDEyMzQ1Njc4OQ.GhIjKl.YYYYYYYYYYYYYYYYYYYYYYYYYYYY";

    fn client(server: &Server) -> DiscordClient {
        let token = AuthToken::new(TOKEN).unwrap();
        DiscordClient::with_base_url(&token, Duration::from_secs(5), server.url()).unwrap()
    }

    fn interaction() -> InteractionRef {
        InteractionRef {
            id: InteractionId(11),
            application_id: ApplicationId(22),
            token: "itoken".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_commands_puts_with_bot_auth() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/applications/22/commands")
            .match_header("authorization", format!("Bot {TOKEN}").as_str())
            .match_body(Matcher::Regex(r#""name":"upscale""#.to_string()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let command = ApplicationCommand::new("upscale", "Upscale a custom emoji");
        client(&server)
            .register_commands(ApplicationId(22), &[command])
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_defer_sends_type_five() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/interactions/11/itoken/callback")
            .match_body(Matcher::Json(serde_json::json!({"type": 5})))
            .with_status(204)
            .create_async()
            .await;

        client(&server).defer_interaction(&interaction()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_respond_sends_content() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/interactions/11/itoken/callback")
            .match_body(Matcher::Json(
                serde_json::json!({"type": 4, "data": {"content": "nope"}}),
            ))
            .with_status(204)
            .create_async()
            .await;

        client(&server)
            .respond_to_interaction(&interaction(), "nope")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_edit_original_uploads_multipart() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/webhooks/22/itoken/messages/@original")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data; boundary=.*".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("name=\"payload_json\"".to_string()),
                Matcher::Regex("filename=\"blob_upscaled.png\"".to_string()),
                Matcher::Regex("attachment://blob_upscaled.png".to_string()),
            ]))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let request = EditResponseRequest::default()
            .with_embed(Embed::new().with_image("attachment://blob_upscaled.png"))
            .with_attachment(FileAttachment::new(
                "blob_upscaled.png",
                vec![1, 2, 3],
                "image/png",
            ));
        client(&server)
            .edit_original_response(&interaction(), request)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_message_returns_created_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/channels/5/messages")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "content": "hi",
                "message_reference": {"message_id": "6"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"77","channel_id":"5","author":{"id":"1","username":"bot","bot":true},"content":"hi"}"#,
            )
            .create_async()
            .await;

        let id = client(&server)
            .send_message(
                SendMessageRequest::new(ChannelId(5))
                    .with_content("hi")
                    .with_reply(MessageId(6)),
            )
            .await
            .unwrap();

        assert_eq!(id, MessageId(77));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_message_maps_author() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/channels/5/messages/6")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"6","channel_id":"5","guild_id":"9","author":{"id":"3","username":"alice"},"content":"<:blob:7>"}"#,
            )
            .create_async()
            .await;

        let message = client(&server)
            .get_message(ChannelId(5), MessageId(6))
            .await
            .unwrap();

        assert_eq!(message.author.username, "alice");
        assert_eq!(message.content, "<:blob:7>");
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/channels/5/messages/6")
            .with_status(403)
            .with_body(r#"{"message":"Missing Permissions","code":50013}"#)
            .create_async()
            .await;
        server
            .mock("DELETE", "/channels/5/messages/7")
            .with_status(429)
            .with_body(r#"{"message":"You are being rate limited.","retry_after":1.5,"global":false}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/channels/5/messages/8")
            .with_status(401)
            .create_async()
            .await;

        let client = client(&server);

        assert_eq!(
            client.delete_message(ChannelId(5), MessageId(6)).await,
            Err(DiscordError::forbidden("Missing Permissions"))
        );
        assert_eq!(
            client.delete_message(ChannelId(5), MessageId(7)).await,
            Err(DiscordError::RateLimited {
                retry_after_ms: 1500
            })
        );
        assert_eq!(
            client.get_message(ChannelId(5), MessageId(8)).await,
            Err(DiscordError::Unauthorized)
        );
    }

    #[test]
    fn test_seconds_to_millis() {
        assert_eq!(seconds_to_millis(0.25), 250);
        assert_eq!(seconds_to_millis(-1.0), 0);
    }
}
