use flate2::{Decompress, FlushDecompress, Status};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::constants::ZLIB_SUFFIX;
use super::error::{GatewayError, GatewayResult};
use super::events::DispatchEvent;
use super::payloads::{
    CommandDataPayload, GatewayMessage, HelloPayload, InteractionPayload, MemberPayload,
    ReactionPayload, ReadyPayload,
};
use crate::domain::entities::{
    ApplicationId, ChannelId, CommandData, EmojiId, GuildId, Interaction, InteractionId,
    InteractionKind, InteractionRef, MessageId, OptionValue, ReactionAdd, ReactionEmoji, UserId,
};
use crate::domain::errors::DiscordError;
use crate::infrastructure::discord::dto::{MessageResponse, parse_id};

const INITIAL_BUFFER_SIZE: usize = 32 * 1024;
const MAX_BUFFER_SIZE: usize = 16 * 1024 * 1024;

/// Inflates a `zlib-stream` transport.
///
/// All frames of one connection share a single inflate context. A message is
/// complete when the buffered input ends with [`ZLIB_SUFFIX`].
pub struct GatewayCodec {
    inflater: Decompress,
    compressed_buffer: Vec<u8>,
}

impl GatewayCodec {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inflater: Decompress::new(true),
            compressed_buffer: Vec::with_capacity(4096),
        }
    }

    /// Buffers a binary frame and returns the inflated JSON once complete.
    ///
    /// # Errors
    /// Returns error if inflation fails or the output is not UTF-8.
    pub fn decode_binary(&mut self, data: &[u8]) -> GatewayResult<Option<String>> {
        self.compressed_buffer.extend_from_slice(data);

        if !self.is_message_complete() {
            return Ok(None);
        }

        let result = self.decompress();
        self.compressed_buffer.clear();
        result.map(Some)
    }

    /// Discards the inflate context; call on every new connection.
    pub fn reset(&mut self) {
        self.inflater.reset(true);
        self.compressed_buffer.clear();
    }

    fn is_message_complete(&self) -> bool {
        self.compressed_buffer.ends_with(&ZLIB_SUFFIX)
    }

    fn decompress(&mut self) -> GatewayResult<String> {
        let mut output = Vec::with_capacity(INITIAL_BUFFER_SIZE);
        let mut offset = 0;

        loop {
            if output.len() == output.capacity() {
                if output.capacity() >= MAX_BUFFER_SIZE {
                    return Err(GatewayError::compression(
                        "decompressed data exceeds maximum size",
                    ));
                }
                output.reserve(output.capacity());
            }

            let in_before = self.inflater.total_in();
            let out_before = self.inflater.total_out();

            let status = self
                .inflater
                .decompress_vec(
                    &self.compressed_buffer[offset..],
                    &mut output,
                    FlushDecompress::Sync,
                )
                .map_err(|e| GatewayError::compression(e.to_string()))?;

            let consumed = usize::try_from(self.inflater.total_in() - in_before).unwrap_or(0);
            let produced = self.inflater.total_out() - out_before;
            offset += consumed;

            let has_room = output.len() < output.capacity();
            if status == Status::StreamEnd || (offset >= self.compressed_buffer.len() && has_room)
            {
                break;
            }
            if consumed == 0 && produced == 0 && has_room {
                return Err(GatewayError::compression("inflate made no progress"));
            }
        }

        String::from_utf8(output).map_err(|e| GatewayError::compression(e.to_string()))
    }
}

impl Default for GatewayCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns raw gateway JSON into typed events.
pub struct EventParser;

impl EventParser {
    /// # Errors
    /// Returns error if the envelope is not valid JSON.
    pub fn parse_message(json: &str) -> GatewayResult<GatewayMessage> {
        serde_json::from_str(json).map_err(|e| GatewayError::serialization(e.to_string()))
    }

    /// # Errors
    /// Returns error if the Hello data is malformed.
    pub fn parse_hello(data: Value) -> GatewayResult<HelloPayload> {
        decode(data)
    }

    /// Parses dispatch data for the event types the bot handles.
    ///
    /// # Errors
    /// Returns error if a known event carries malformed data.
    pub fn parse_dispatch(event_type: &str, data: Option<Value>) -> GatewayResult<DispatchEvent> {
        let data = data.unwrap_or(Value::Null);

        match event_type {
            "READY" => Self::parse_ready(data),
            "MESSAGE_CREATE" => {
                let message = decode::<MessageResponse>(data)?
                    .into_domain()
                    .map_err(invalid)?;
                Ok(DispatchEvent::MessageCreate { message })
            }
            "MESSAGE_REACTION_ADD" => Ok(DispatchEvent::MessageReactionAdd {
                reaction: Self::parse_reaction(decode(data)?).map_err(invalid)?,
            }),
            "INTERACTION_CREATE" => Ok(DispatchEvent::InteractionCreate {
                interaction: Self::parse_interaction(decode(data)?).map_err(invalid)?,
            }),
            other => Ok(DispatchEvent::Unknown {
                event_type: other.to_string(),
            }),
        }
    }

    fn parse_ready(data: Value) -> GatewayResult<DispatchEvent> {
        let ready: ReadyPayload = decode(data)?;

        Ok(DispatchEvent::Ready {
            user_id: parse_id(&ready.user.id, "user id", UserId::parse).map_err(invalid)?,
            application_id: parse_id(&ready.application.id, "application id", ApplicationId::parse)
                .map_err(invalid)?,
            session_id: ready.session_id,
            resume_gateway_url: ready.resume_gateway_url,
        })
    }

    fn parse_reaction(payload: ReactionPayload) -> Result<ReactionAdd, DiscordError> {
        Ok(ReactionAdd {
            user_id: parse_id(&payload.user_id, "user id", UserId::parse)?,
            channel_id: parse_id(&payload.channel_id, "channel id", ChannelId::parse)?,
            message_id: parse_id(&payload.message_id, "message id", MessageId::parse)?,
            guild_id: payload.guild_id.as_deref().and_then(GuildId::parse),
            emoji: ReactionEmoji {
                id: payload.emoji.id.as_deref().and_then(EmojiId::parse),
                name: payload.emoji.name,
                animated: payload.emoji.animated,
            },
            user_is_bot: member_is_bot(payload.member.as_ref()),
        })
    }

    fn parse_interaction(payload: InteractionPayload) -> Result<Interaction, DiscordError> {
        let user_id = payload
            .member
            .as_ref()
            .and_then(|m| m.user.as_ref())
            .or(payload.user.as_ref())
            .and_then(|u| UserId::parse(&u.id));

        Ok(Interaction {
            reference: InteractionRef {
                id: parse_id(&payload.id, "interaction id", InteractionId::parse)?,
                application_id: parse_id(
                    &payload.application_id,
                    "application id",
                    ApplicationId::parse,
                )?,
                token: payload.token,
            },
            kind: InteractionKind::from(payload.kind),
            data: payload.data.map(command_data),
            channel_id: payload.channel_id.as_deref().and_then(ChannelId::parse),
            user_id,
        })
    }
}

fn command_data(payload: CommandDataPayload) -> CommandData {
    payload
        .options
        .into_iter()
        .fold(CommandData::new(payload.name), |data, option| {
            let value = match option.value {
                Some(Value::String(s)) => OptionValue::String(s),
                Some(Value::Number(n)) => match n.as_i64() {
                    Some(i) => OptionValue::Integer(i),
                    None => return data,
                },
                _ => return data,
            };
            data.with_option(option.name, value)
        })
}

fn member_is_bot(member: Option<&MemberPayload>) -> bool {
    member
        .and_then(|m| m.user.as_ref())
        .is_some_and(|u| u.bot)
}

fn decode<T: DeserializeOwned>(data: Value) -> GatewayResult<T> {
    serde_json::from_value(data).map_err(|e| GatewayError::serialization(e.to_string()))
}

fn invalid(error: DiscordError) -> GatewayError {
    GatewayError::serialization(error.to_string())
}
