use thiserror::Error;

use super::constants::GatewayOpcode;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// What the reconnect loop does after a connection ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Reconnect and send Resume with the stored session.
    Resume,
    /// Reconnect with a fresh Identify.
    Reidentify,
    /// Give up; retrying with the same token and intents cannot succeed.
    Stop,
}

impl Recovery {
    /// Classifies a websocket close code sent by Discord.
    #[must_use]
    pub const fn for_close_code(code: u16) -> Self {
        match code {
            // authentication failed, invalid shard, sharding required,
            // invalid API version, invalid intents, disallowed intents
            4004 | 4010..=4014 => Self::Stop,
            // invalid seq, session timed out
            4007 | 4009 => Self::Reidentify,
            _ => Self::Resume,
        }
    }

    #[must_use]
    pub const fn reconnects(self) -> bool {
        !matches!(self, Self::Stop)
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("could not open gateway socket: {message}")]
    ConnectionFailed { message: String },

    #[error("gateway closed the socket ({code}): {reason}")]
    ConnectionClosed { code: u16, reason: String },

    #[error("websocket failure: {message}")]
    WebSocket { message: String },

    #[error("session invalidated (resumable: {resumable})")]
    SessionInvalidated { resumable: bool },

    #[error("heartbeat was not acknowledged")]
    HeartbeatTimeout,

    #[error("zlib-stream inflate failed: {message}")]
    CompressionError { message: String },

    #[error("malformed gateway payload: {message}")]
    SerializationError { message: String },

    #[error("unexpected gateway opcode {opcode:?}")]
    UnexpectedOpcode { opcode: Option<GatewayOpcode> },

    #[error("gateway protocol violation: {message}")]
    ProtocolError { message: String },

    #[error("timed out waiting for {operation}")]
    Timeout { operation: String },

    #[error("handshake has not completed")]
    NotConnected,

    #[error("gateway loop is already running")]
    AlreadyConnected,
}

impl GatewayError {
    #[must_use]
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn websocket(message: impl Into<String>) -> Self {
        Self::WebSocket {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn compression(message: impl Into<String>) -> Self {
        Self::CompressionError {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Decides how the session continues after this error ended a connection.
    #[must_use]
    pub const fn recovery(&self) -> Recovery {
        match self {
            Self::ConnectionClosed { code, .. } => Recovery::for_close_code(*code),
            Self::SessionInvalidated { resumable: true }
            | Self::WebSocket { .. }
            | Self::HeartbeatTimeout => Recovery::Resume,
            Self::SessionInvalidated { resumable: false }
            | Self::ConnectionFailed { .. }
            | Self::CompressionError { .. }
            | Self::Timeout { .. } => Recovery::Reidentify,
            Self::ProtocolError { .. }
            | Self::SerializationError { .. }
            | Self::UnexpectedOpcode { .. }
            | Self::NotConnected
            | Self::AlreadyConnected => Recovery::Stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn closed(code: u16) -> GatewayError {
        GatewayError::ConnectionClosed {
            code,
            reason: String::new(),
        }
    }

    #[test_case(1000, Recovery::Resume ; "normal closure")]
    #[test_case(1006, Recovery::Resume ; "abnormal closure")]
    #[test_case(4000, Recovery::Resume ; "reconnect opcode")]
    #[test_case(4007, Recovery::Reidentify ; "invalid sequence")]
    #[test_case(4009, Recovery::Reidentify ; "session timed out")]
    #[test_case(4004, Recovery::Stop ; "bad token")]
    #[test_case(4014, Recovery::Stop ; "disallowed intents")]
    fn test_close_code_recovery(code: u16, expected: Recovery) {
        assert_eq!(closed(code).recovery(), expected);
    }

    #[test]
    fn test_invalid_session_recovery() {
        assert_eq!(
            GatewayError::SessionInvalidated { resumable: false }.recovery(),
            Recovery::Reidentify
        );
        assert_eq!(
            GatewayError::SessionInvalidated { resumable: true }.recovery(),
            Recovery::Resume
        );
        assert!(!GatewayError::protocol("bad frame").recovery().reconnects());
        assert!(GatewayError::HeartbeatTimeout.recovery().reconnects());
    }
}
