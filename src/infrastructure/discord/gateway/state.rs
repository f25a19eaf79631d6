use std::time::Instant;

use tracing::trace;

/// Handshake progress of a single socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    WaitingForHello,
    Identifying,
    Resuming,
    Connected,
}

impl ConnectionState {
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::WaitingForHello => "waiting_for_hello",
            Self::Identifying => "identifying",
            Self::Resuming => "resuming",
            Self::Connected => "connected",
        }
    }
}

/// Heartbeat timing and handshake progress, reset for every socket.
#[derive(Debug, Default)]
pub struct GatewayState {
    connection: ConnectionState,
    heartbeat_interval_ms: Option<u64>,
    pending_heartbeat: Option<Instant>,
    latency_ms: Option<u64>,
}

impl GatewayState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            connection: ConnectionState::Disconnected,
            heartbeat_interval_ms: None,
            pending_heartbeat: None,
            latency_ms: None,
        }
    }

    #[must_use]
    pub const fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn transition_to(&mut self, next: ConnectionState) {
        trace!(
            from = self.connection.label(),
            to = next.label(),
            "Gateway state changed"
        );
        self.connection = next;
        if next == ConnectionState::Disconnected {
            self.pending_heartbeat = None;
        }
    }

    pub const fn set_heartbeat_interval(&mut self, interval_ms: u64) {
        self.heartbeat_interval_ms = Some(interval_ms);
    }

    #[must_use]
    pub const fn heartbeat_interval_ms(&self) -> Option<u64> {
        self.heartbeat_interval_ms
    }

    pub fn record_heartbeat_sent(&mut self) {
        self.pending_heartbeat = Some(Instant::now());
    }

    /// Measures round trip against the heartbeat that is still in flight.
    #[allow(clippy::cast_possible_truncation)]
    pub fn record_heartbeat_ack(&mut self) {
        if let Some(sent) = self.pending_heartbeat.take() {
            self.latency_ms = Some(sent.elapsed().as_millis() as u64);
        }
    }

    #[must_use]
    pub const fn latency_ms(&self) -> Option<u64> {
        self.latency_ms
    }
}
