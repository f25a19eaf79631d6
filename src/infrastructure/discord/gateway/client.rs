use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::connection::{GatewayConnection, GatewayConnectionHandler, WebSocketConnection};
use super::constants::{
    GatewayIntents, MAX_RECONNECT_ATTEMPTS, RECONNECT_DELAY_BASE, RECONNECT_DELAY_MAX,
    RECONNECT_JITTER_MAX,
};
use super::error::{GatewayError, GatewayResult, Recovery};
use super::events::GatewayEventKind;
use super::session::SessionInfo;
use crate::domain::entities::AuthToken;

/// Builds a fresh transport for each connection attempt.
pub type ConnectionFactory = Arc<dyn Fn() -> Box<dyn GatewayConnection> + Send + Sync>;

pub struct GatewayClientConfig {
    pub intents: GatewayIntents,
    pub auto_reconnect: bool,
    pub max_reconnect_attempts: u32,
}

impl Default for GatewayClientConfig {
    fn default() -> Self {
        Self {
            intents: GatewayIntents::bot(),
            auto_reconnect: true,
            max_reconnect_attempts: MAX_RECONNECT_ATTEMPTS,
        }
    }
}

impl GatewayClientConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_auto_reconnect(mut self, enabled: bool) -> Self {
        self.auto_reconnect = enabled;
        self
    }

    #[must_use]
    pub const fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }
}

/// Long-lived gateway session with automatic reconnect and resume.
pub struct GatewayClient {
    config: GatewayClientConfig,
    connector: ConnectionFactory,
    running: Arc<AtomicBool>,
    shutdown: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl GatewayClient {
    #[must_use]
    pub fn new(config: GatewayClientConfig) -> Self {
        Self::with_connector(
            config,
            Arc::new(|| Box::new(WebSocketConnection::new()) as Box<dyn GatewayConnection>),
        )
    }

    #[must_use]
    pub fn with_connector(config: GatewayClientConfig, connector: ConnectionFactory) -> Self {
        Self {
            config,
            connector,
            running: Arc::new(AtomicBool::new(false)),
            shutdown: None,
            task: None,
        }
    }

    /// Starts the gateway loop and returns its event stream.
    ///
    /// # Errors
    /// Returns `GatewayError::AlreadyConnected` if connection is already active.
    pub fn connect(
        &mut self,
        token: &AuthToken,
    ) -> GatewayResult<mpsc::UnboundedReceiver<GatewayEventKind>> {
        if self.running.load(Ordering::SeqCst) {
            return Err(GatewayError::AlreadyConnected);
        }

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let config = GatewayLoopConfig {
            token: token.as_str().to_string(),
            intents: self.config.intents,
            auto_reconnect: self.config.auto_reconnect,
            max_attempts: self.config.max_reconnect_attempts,
            connector: self.connector.clone(),
        };
        let running = self.running.clone();
        running.store(true, Ordering::SeqCst);

        self.shutdown = Some(shutdown_tx);
        self.task = Some(tokio::spawn(run_gateway_loop(
            config,
            event_tx,
            shutdown_rx,
            running,
        )));

        Ok(event_rx)
    }

    /// Signals shutdown and waits for the loop to close the socket.
    pub async fn disconnect(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            error!(error = %e, "Gateway task ended abnormally");
        }
        self.running.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

struct GatewayLoopConfig {
    token: String,
    intents: GatewayIntents,
    auto_reconnect: bool,
    max_attempts: u32,
    connector: ConnectionFactory,
}

async fn run_gateway_loop(
    config: GatewayLoopConfig,
    event_tx: mpsc::UnboundedSender<GatewayEventKind>,
    mut shutdown: watch::Receiver<bool>,
    running: Arc<AtomicBool>,
) {
    let mut reconnect_attempts: u32 = 0;
    let mut session = SessionInfo::new();

    while !*shutdown.borrow() {
        let mut handler = GatewayConnectionHandler::new(
            (config.connector)(),
            config.token.clone(),
            config.intents,
            session.clone(),
            event_tx.clone(),
        );

        let connected = tokio::select! {
            result = handler.connect() => result,
            _ = shutdown.changed() => break,
        };

        let result = match connected {
            Ok(()) => {
                info!("Gateway connected");
                reconnect_attempts = 0;
                handler.run(&mut shutdown).await
            }
            Err(e) => Err(e),
        };
        session = handler.session().clone();

        let error = match result {
            Ok(()) => break,
            Err(error) => error,
        };

        warn!(error = %error, "Gateway connection ended");
        let recovery = error.recovery();
        if recovery != Recovery::Resume {
            session.clear();
        }
        let _ = event_tx.send(GatewayEventKind::Disconnected {
            reason: error.to_string(),
            can_resume: session.can_resume(),
        });

        if !recovery.reconnects() || !config.auto_reconnect {
            error!(error = %error, "Gateway connection is not recoverable");
            let _ = event_tx.send(GatewayEventKind::Error {
                message: error.to_string(),
                recoverable: false,
            });
            break;
        }

        reconnect_attempts += 1;
        if reconnect_attempts > config.max_attempts {
            error!(
                attempts = reconnect_attempts,
                "Max reconnection attempts exceeded"
            );
            let _ = event_tx.send(GatewayEventKind::Error {
                message: format!(
                    "Max reconnection attempts ({}) exceeded",
                    config.max_attempts
                ),
                recoverable: false,
            });
            break;
        }

        let delay = calculate_backoff_delay(reconnect_attempts - 1);
        info!(
            attempt = reconnect_attempts,
            delay_ms = delay.as_millis(),
            "Reconnecting to gateway"
        );
        let _ = event_tx.send(GatewayEventKind::Reconnecting {
            attempt: reconnect_attempts,
        });

        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            _ = shutdown.changed() => {}
        }
    }

    running.store(false, Ordering::SeqCst);
    info!("Gateway loop terminated");
}

#[allow(clippy::cast_possible_truncation)]
fn calculate_backoff_delay(attempt: u32) -> Duration {
    let base_delay = RECONNECT_DELAY_BASE.as_millis() as u64;
    let max_delay = RECONNECT_DELAY_MAX.as_millis() as u64;
    let jitter_max = RECONNECT_JITTER_MAX.as_millis() as u64;

    let exponential_delay = base_delay.saturating_mul(2_u64.saturating_pow(attempt.min(6)));
    let capped_delay = exponential_delay.min(max_delay);

    Duration::from_millis(capped_delay.saturating_add(rand_jitter(jitter_max)))
}

fn rand_jitter(max: u64) -> u64 {
    use std::time::SystemTime;

    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| u64::from(d.subsec_nanos()))
        .unwrap_or(0);

    nanos % max.max(1)
}

#[cfg(test)]
mod tests {
    use super::super::connection::mock::ScriptedConnection;
    use super::super::events::DispatchEvent;
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const TOKEN: &str = "MTIzNDU2Nzg5MDEyMzQ1Njc4OQ.GhIjKl.YYYYYYYYYYYYYYYYYYYYYYYYYYYY";
    const HELLO: &str = r#"{"op":10,"d":{"heartbeat_interval":45000}}"#;
    const READY: &str = r#"{"op":0,"s":1,"t":"READY","d":{"session_id":"sess","resume_gateway_url":"wss://resume.discord.gg","user":{"id":"1","username":"bot","bot":true},"application":{"id":"2"}}}"#;

    fn scripted(scripts: Vec<ScriptedConnection>) -> ConnectionFactory {
        let queue = Mutex::new(VecDeque::from(scripts));
        Arc::new(move || {
            let connection = queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| ScriptedConnection::new(vec![]));
            Box::new(connection) as Box<dyn GatewayConnection>
        })
    }

    #[test]
    fn test_config_builder() {
        let config = GatewayClientConfig::new()
            .with_auto_reconnect(false)
            .with_max_reconnect_attempts(5);

        assert!(!config.auto_reconnect);
        assert_eq!(config.max_reconnect_attempts, 5);
        assert_eq!(config.intents, GatewayIntents::bot());
    }

    #[test]
    fn test_backoff_delay() {
        let delay0 = calculate_backoff_delay(0);
        let delay1 = calculate_backoff_delay(1);
        let delay2 = calculate_backoff_delay(2);

        assert!(delay0 < delay1);
        assert!(delay1 < delay2);

        let delay_max = calculate_backoff_delay(100);
        assert!(delay_max <= RECONNECT_DELAY_MAX + RECONNECT_JITTER_MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconnects_and_resumes_after_close() {
        let first = ScriptedConnection::new(vec![HELLO, READY]).then_close(1006);
        let second = ScriptedConnection::new(vec![
            HELLO,
            r#"{"op":0,"s":2,"t":"RESUMED","d":null}"#,
        ]);
        let resume_sent = second.sent.clone();
        let factory = scripted(vec![first, second]);

        let mut client = GatewayClient::with_connector(GatewayClientConfig::new(), factory);
        let mut events = client.connect(&AuthToken::new(TOKEN).unwrap()).unwrap();
        assert!(client.is_running());

        let mut saw_ready = false;
        loop {
            match events.recv().await.unwrap() {
                GatewayEventKind::Dispatch(DispatchEvent::Ready { .. }) => saw_ready = true,
                GatewayEventKind::Resumed => break,
                _ => {}
            }
        }
        assert!(saw_ready);
        assert_eq!(resume_sent.lock().unwrap()[0].op, 6);
        assert_eq!(resume_sent.lock().unwrap()[0].d["session_id"], "sess");

        client.disconnect().await;
        assert!(!client.is_running());
    }

    #[tokio::test]
    async fn test_fatal_close_stops_loop() {
        let first = ScriptedConnection::new(vec![HELLO]).then_close(4004);
        let factory = scripted(vec![first]);

        let mut client = GatewayClient::with_connector(GatewayClientConfig::new(), factory);
        let mut events = client.connect(&AuthToken::new(TOKEN).unwrap()).unwrap();

        let mut last = None;
        while let Some(event) = events.recv().await {
            last = Some(event);
        }
        assert!(matches!(
            last,
            Some(GatewayEventKind::Error {
                recoverable: false,
                ..
            })
        ));
        assert!(!client.is_running());
    }

    #[tokio::test]
    async fn test_reconnect_disabled_stops_after_drop() {
        let first = ScriptedConnection::new(vec![HELLO, READY]).then_close(1006);
        let factory = scripted(vec![first]);

        let config = GatewayClientConfig::new().with_auto_reconnect(false);
        let mut client = GatewayClient::with_connector(config, factory);
        let mut events = client.connect(&AuthToken::new(TOKEN).unwrap()).unwrap();

        let mut reconnecting = false;
        let mut last = None;
        while let Some(event) = events.recv().await {
            reconnecting |= matches!(event, GatewayEventKind::Reconnecting { .. });
            last = Some(event);
        }
        assert!(!reconnecting);
        assert!(matches!(
            last,
            Some(GatewayEventKind::Error {
                recoverable: false,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_connect_twice_is_rejected() {
        let factory = scripted(vec![]);
        let mut client = GatewayClient::with_connector(GatewayClientConfig::new(), factory);
        let token = AuthToken::new(TOKEN).unwrap();

        let _events = client.connect(&token).unwrap();
        assert!(matches!(
            client.connect(&token),
            Err(GatewayError::AlreadyConnected)
        ));
        client.disconnect().await;
    }
}
