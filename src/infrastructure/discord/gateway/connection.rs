use std::sync::atomic::Ordering;

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, trace, warn};

use super::codec::{EventParser, GatewayCodec};
use super::constants::{
    CONNECTION_TIMEOUT, GatewayIntents, GatewayOpcode, HELLO_TIMEOUT, IDENTIFY_TIMEOUT,
};
use super::error::{GatewayError, GatewayResult};
use super::events::{DispatchEvent, GatewayEventKind};
use super::heartbeat::{HeartbeatManager, SharedSequence, load_sequence};
use super::payloads::{GatewayMessage, GatewayPayload};
use super::session::SessionInfo;
use super::state::{ConnectionState, GatewayState};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = SplitSink<WsStream, WsMessage>;
type WsReader = SplitStream<WsStream>;

/// Transport for gateway frames.
#[async_trait]
pub trait GatewayConnection: Send + Sync {
    async fn connect(&mut self, url: &str) -> GatewayResult<()>;
    async fn disconnect(&mut self) -> GatewayResult<()>;
    async fn send(&mut self, payload: &GatewayPayload) -> GatewayResult<()>;
    async fn receive(&mut self) -> GatewayResult<Option<GatewayMessage>>;
    fn is_connected(&self) -> bool;
}

pub struct WebSocketConnection {
    writer: Option<WsWriter>,
    reader: Option<WsReader>,
    codec: GatewayCodec,
    connected: bool,
}

impl WebSocketConnection {
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: None,
            reader: None,
            codec: GatewayCodec::new(),
            connected: false,
        }
    }
}

impl Default for WebSocketConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GatewayConnection for WebSocketConnection {
    async fn connect(&mut self, url: &str) -> GatewayResult<()> {
        let (ws_stream, _) = timeout(CONNECTION_TIMEOUT, connect_async(url))
            .await
            .map_err(|_| GatewayError::timeout("connection"))?
            .map_err(|e| GatewayError::connection_failed(e.to_string()))?;

        let (writer, reader) = ws_stream.split();
        self.writer = Some(writer);
        self.reader = Some(reader);
        self.connected = true;
        self.codec.reset();

        Ok(())
    }

    async fn disconnect(&mut self) -> GatewayResult<()> {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.close().await;
        }
        self.reader = None;
        self.connected = false;
        self.codec.reset();
        debug!("WebSocket connection closed");
        Ok(())
    }

    async fn send(&mut self, payload: &GatewayPayload) -> GatewayResult<()> {
        let writer = self.writer.as_mut().ok_or(GatewayError::NotConnected)?;

        let json = serde_json::to_string(payload)
            .map_err(|e| GatewayError::serialization(e.to_string()))?;

        writer
            .send(WsMessage::Text(json.into()))
            .await
            .map_err(|e| GatewayError::websocket(e.to_string()))
    }

    async fn receive(&mut self) -> GatewayResult<Option<GatewayMessage>> {
        let reader = self.reader.as_mut().ok_or(GatewayError::NotConnected)?;

        loop {
            match reader.next().await {
                Some(Ok(WsMessage::Binary(data))) => {
                    if let Some(json) = self.codec.decode_binary(&data)? {
                        return EventParser::parse_message(&json).map(Some);
                    }
                }
                Some(Ok(WsMessage::Text(text))) => {
                    return EventParser::parse_message(text.as_str()).map(Some);
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    self.connected = false;
                    let (code, reason) = frame.map_or_else(
                        || (1000, "Normal closure".to_string()),
                        |f| (f.code.into(), f.reason.to_string()),
                    );
                    return Err(GatewayError::ConnectionClosed { code, reason });
                }
                Some(Ok(WsMessage::Ping(data))) => {
                    if let Some(writer) = self.writer.as_mut() {
                        let _ = writer.send(WsMessage::Pong(data)).await;
                    }
                }
                Some(Ok(WsMessage::Pong(_) | WsMessage::Frame(_))) => {}
                Some(Err(e)) => {
                    self.connected = false;
                    return Err(GatewayError::websocket(e.to_string()));
                }
                None => {
                    self.connected = false;
                    return Err(GatewayError::ConnectionClosed {
                        code: 1000,
                        reason: "Stream ended".to_string(),
                    });
                }
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Drives one gateway connection: handshake, heartbeats and dispatch.
pub struct GatewayConnectionHandler {
    connection: Box<dyn GatewayConnection>,
    state: GatewayState,
    session: SessionInfo,
    sequence: SharedSequence,
    token: String,
    intents: GatewayIntents,
    event_tx: mpsc::UnboundedSender<GatewayEventKind>,
}

impl GatewayConnectionHandler {
    pub fn new(
        connection: Box<dyn GatewayConnection>,
        token: String,
        intents: GatewayIntents,
        session: SessionInfo,
        event_tx: mpsc::UnboundedSender<GatewayEventKind>,
    ) -> Self {
        let sequence = SharedSequence::default();
        sequence.store(session.sequence().unwrap_or(0), Ordering::SeqCst);

        Self {
            connection,
            state: GatewayState::new(),
            session,
            sequence,
            token,
            intents,
            event_tx,
        }
    }

    /// Opens the socket and completes Identify or Resume.
    ///
    /// # Errors
    /// Returns error if the socket or handshake fails.
    pub async fn connect(&mut self) -> GatewayResult<()> {
        self.state.transition_to(ConnectionState::Connecting);

        let url = self.session.connect_url();
        self.connection.connect(&url).await?;

        self.state.transition_to(ConnectionState::WaitingForHello);
        self.await_hello().await?;

        if self.session.can_resume() {
            self.resume().await
        } else {
            self.identify().await
        }
    }

    async fn await_hello(&mut self) -> GatewayResult<()> {
        let message = timeout(HELLO_TIMEOUT, self.connection.receive())
            .await
            .map_err(|_| GatewayError::timeout("Hello"))??
            .ok_or_else(|| GatewayError::protocol("Expected Hello message"))?;

        let opcode = GatewayOpcode::from_u8(message.op);
        if opcode != Some(GatewayOpcode::Hello) {
            return Err(GatewayError::UnexpectedOpcode { opcode });
        }

        let data = message
            .d
            .ok_or_else(|| GatewayError::protocol("Hello missing data"))?;
        let hello = EventParser::parse_hello(data)?;
        self.state.set_heartbeat_interval(hello.heartbeat_interval);

        debug!(
            interval_ms = hello.heartbeat_interval,
            "Received Hello from gateway"
        );

        Ok(())
    }

    async fn identify(&mut self) -> GatewayResult<()> {
        self.state.transition_to(ConnectionState::Identifying);

        let payload = GatewayPayload::identify(&self.token, self.intents.as_u32());
        self.connection.send(&payload).await?;

        self.await_session_start("READY").await
    }

    async fn resume(&mut self) -> GatewayResult<()> {
        self.state.transition_to(ConnectionState::Resuming);

        let Some((session_id, sequence)) = self.session.resume_target() else {
            return Err(GatewayError::protocol("No session to resume"));
        };

        let payload = GatewayPayload::resume(&self.token, session_id, sequence);
        debug!(session_id = %session_id, sequence, "Sent Resume payload");
        self.connection.send(&payload).await?;

        self.await_session_start("RESUMED").await
    }

    /// Waits for READY or RESUMED, forwarding replayed dispatches meanwhile.
    async fn await_session_start(&mut self, expected: &str) -> GatewayResult<()> {
        timeout(IDENTIFY_TIMEOUT, self.next_session_start())
            .await
            .map_err(|_| GatewayError::timeout(expected))??;

        self.state.transition_to(ConnectionState::Connected);
        Ok(())
    }

    async fn next_session_start(&mut self) -> GatewayResult<()> {
        loop {
            let message = self
                .connection
                .receive()
                .await?
                .ok_or_else(|| GatewayError::protocol("Expected session start"))?;
            self.track_sequence(message.s);

            match GatewayOpcode::from_u8(message.op) {
                Some(GatewayOpcode::Dispatch) => match message.t.as_deref() {
                    Some("READY") => return self.handle_ready(message.d),
                    Some("RESUMED") => {
                        info!("Session resumed successfully");
                        let _ = self.event_tx.send(GatewayEventKind::Resumed);
                        return Ok(());
                    }
                    Some(event_type) => self.handle_dispatch(event_type, message.d),
                    None => {}
                },
                Some(GatewayOpcode::InvalidSession) => {
                    return Err(self.invalidate_session(message.d));
                }
                Some(GatewayOpcode::HeartbeatAck) => {}
                opcode => return Err(GatewayError::UnexpectedOpcode { opcode }),
            }
        }
    }

    fn handle_ready(&mut self, data: Option<serde_json::Value>) -> GatewayResult<()> {
        let dispatch = EventParser::parse_dispatch("READY", data)?;

        if let DispatchEvent::Ready {
            session_id,
            resume_gateway_url,
            ..
        } = &dispatch
        {
            self.session
                .set_session(session_id.clone(), resume_gateway_url.clone());
            info!(session_id = %session_id, "Gateway ready");

            let _ = self.event_tx.send(GatewayEventKind::Connected {
                session_id: session_id.clone(),
            });
        }

        let _ = self.event_tx.send(GatewayEventKind::Dispatch(dispatch));
        Ok(())
    }

    /// Runs until the socket fails or shutdown is signalled.
    ///
    /// # Errors
    /// Returns the error that ended the connection.
    pub async fn run(&mut self, shutdown: &mut watch::Receiver<bool>) -> GatewayResult<()> {
        if !self.state.connection().is_connected() {
            return Err(GatewayError::NotConnected);
        }
        let interval = self
            .state
            .heartbeat_interval_ms()
            .ok_or_else(|| GatewayError::protocol("Heartbeat interval unknown"))?;

        let heartbeat = HeartbeatManager::new(interval, self.sequence.clone());
        let (payload_tx, mut payload_rx) = mpsc::channel(4);
        let heartbeat_handle = heartbeat.start(payload_tx);

        let result = if *shutdown.borrow() {
            Ok(())
        } else {
            self.event_loop(&heartbeat, &mut payload_rx, shutdown).await
        };

        heartbeat.stop();
        heartbeat_handle.abort();
        let _ = self.connection.disconnect().await;
        self.state.transition_to(ConnectionState::Disconnected);

        result
    }

    async fn event_loop(
        &mut self,
        heartbeat: &HeartbeatManager,
        payload_rx: &mut mpsc::Receiver<GatewayPayload>,
        shutdown: &mut watch::Receiver<bool>,
    ) -> GatewayResult<()> {
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Gateway shutdown requested");
                        return Ok(());
                    }
                }

                payload = payload_rx.recv() => {
                    let Some(payload) = payload else {
                        return Err(GatewayError::HeartbeatTimeout);
                    };
                    self.connection.send(&payload).await?;
                    self.state.record_heartbeat_sent();
                }

                result = self.connection.receive() => {
                    if let Some(message) = result? {
                        self.handle_message(message, heartbeat).await?;
                    }
                }
            }
        }
    }

    async fn handle_message(
        &mut self,
        message: GatewayMessage,
        heartbeat: &HeartbeatManager,
    ) -> GatewayResult<()> {
        self.track_sequence(message.s);

        let opcode = GatewayOpcode::from_u8(message.op);
        match opcode {
            Some(GatewayOpcode::Dispatch) => {
                if let Some(event_type) = message.t.as_deref() {
                    trace!(event = event_type, "Raw dispatch received");
                    self.handle_dispatch(event_type, message.d);
                }
            }
            Some(GatewayOpcode::HeartbeatAck) => {
                heartbeat.acknowledge();
                self.state.record_heartbeat_ack();
                trace!(latency_ms = ?self.state.latency_ms(), "Heartbeat acknowledged");
            }
            Some(GatewayOpcode::Heartbeat) => {
                debug!("Gateway requested immediate heartbeat");
                let payload = GatewayPayload::heartbeat(load_sequence(&self.sequence));
                self.connection.send(&payload).await?;
                self.state.record_heartbeat_sent();
            }
            Some(GatewayOpcode::Reconnect) => {
                info!("Gateway requested reconnect");
                return Err(GatewayError::ConnectionClosed {
                    code: 4000,
                    reason: "Reconnect requested".to_string(),
                });
            }
            Some(GatewayOpcode::InvalidSession) => {
                return Err(self.invalidate_session(message.d));
            }
            _ => {
                debug!(opcode = ?opcode, "Unhandled opcode");
            }
        }

        Ok(())
    }

    fn handle_dispatch(&self, event_type: &str, data: Option<serde_json::Value>) {
        match EventParser::parse_dispatch(event_type, data) {
            Ok(DispatchEvent::Unknown { .. }) => {
                trace!(event = event_type, "Ignoring dispatch event");
            }
            Ok(event) => {
                debug!(event = event_type, "Dispatching event");
                let _ = self.event_tx.send(GatewayEventKind::Dispatch(event));
            }
            Err(e) => {
                warn!(event = event_type, error = %e, "Failed to parse dispatch event");
            }
        }
    }

    fn track_sequence(&mut self, sequence: Option<u64>) {
        if let Some(seq) = sequence {
            self.session.update_sequence(Some(seq));
            self.sequence.store(seq, Ordering::SeqCst);
        }
    }

    fn invalidate_session(&mut self, data: Option<serde_json::Value>) -> GatewayError {
        let resumable = data.and_then(|d| d.as_bool()).unwrap_or(false);
        warn!(resumable, "Session invalidated");

        if !resumable {
            self.session.clear();
            self.sequence.store(0, Ordering::SeqCst);
        }
        GatewayError::SessionInvalidated { resumable }
    }

    #[must_use]
    pub const fn session(&self) -> &SessionInfo {
        &self.session
    }

    #[must_use]
    pub const fn state(&self) -> &GatewayState {
        &self.state
    }
}
