use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::constants::{
    CLIENT_PROPERTIES_BROWSER, CLIENT_PROPERTIES_DEVICE, CLIENT_PROPERTIES_OS, GatewayOpcode,
    LARGE_THRESHOLD,
};
use crate::infrastructure::discord::dto::UserResponse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayPayload {
    pub op: u8,
    pub d: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

impl GatewayPayload {
    fn new(opcode: GatewayOpcode, d: Value) -> Self {
        Self {
            op: opcode.as_u8(),
            d,
            s: None,
            t: None,
        }
    }

    #[must_use]
    pub fn heartbeat(sequence: Option<u64>) -> Self {
        Self::new(
            GatewayOpcode::Heartbeat,
            sequence.map_or(Value::Null, |s| Value::Number(s.into())),
        )
    }

    /// Builds an Identify payload.
    ///
    /// Transport compression is negotiated through the URL, so payload
    /// compression stays off.
    #[must_use]
    pub fn identify(token: &str, intents: u32) -> Self {
        let identify = IdentifyData {
            token,
            properties: IdentifyProperties {
                os: CLIENT_PROPERTIES_OS,
                browser: CLIENT_PROPERTIES_BROWSER,
                device: CLIENT_PROPERTIES_DEVICE,
            },
            compress: false,
            large_threshold: LARGE_THRESHOLD,
            intents,
        };

        Self::new(
            GatewayOpcode::Identify,
            serde_json::to_value(identify).unwrap_or(Value::Null),
        )
    }

    #[must_use]
    pub fn resume(token: &str, session_id: &str, sequence: u64) -> Self {
        let resume = ResumeData {
            token,
            session_id,
            seq: sequence,
        };

        Self::new(
            GatewayOpcode::Resume,
            serde_json::to_value(resume).unwrap_or(Value::Null),
        )
    }
}

#[derive(Debug, Serialize)]
struct IdentifyData<'a> {
    token: &'a str,
    properties: IdentifyProperties,
    compress: bool,
    large_threshold: u16,
    intents: u32,
}

#[derive(Debug, Serialize)]
struct IdentifyProperties {
    os: &'static str,
    browser: &'static str,
    device: &'static str,
}

#[derive(Debug, Serialize)]
struct ResumeData<'a> {
    token: &'a str,
    session_id: &'a str,
    seq: u64,
}

#[derive(Debug, Deserialize)]
pub struct GatewayMessage {
    pub op: u8,
    pub d: Option<Value>,
    pub s: Option<u64>,
    pub t: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HelloPayload {
    pub heartbeat_interval: u64,
}

#[derive(Debug, Deserialize)]
pub struct ReadyPayload {
    pub session_id: String,
    pub resume_gateway_url: Option<String>,
    pub user: UserResponse,
    pub application: ReadyApplication,
}

#[derive(Debug, Deserialize)]
pub struct ReadyApplication {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct MemberPayload {
    pub user: Option<UserResponse>,
}

#[derive(Debug, Deserialize)]
pub struct EmojiPayload {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub animated: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReactionPayload {
    pub user_id: String,
    pub channel_id: String,
    pub message_id: String,
    pub guild_id: Option<String>,
    pub emoji: EmojiPayload,
    pub member: Option<MemberPayload>,
}

#[derive(Debug, Deserialize)]
pub struct CommandOptionPayload {
    pub name: String,
    pub value: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct CommandDataPayload {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandOptionPayload>,
}

#[derive(Debug, Deserialize)]
pub struct InteractionPayload {
    pub id: String,
    pub application_id: String,
    #[serde(rename = "type")]
    pub kind: u8,
    pub token: String,
    pub data: Option<CommandDataPayload>,
    pub channel_id: Option<String>,
    pub member: Option<MemberPayload>,
    pub user: Option<UserResponse>,
}
