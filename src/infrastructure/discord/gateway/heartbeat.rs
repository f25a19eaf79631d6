use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, interval_at};
use tracing::{debug, warn};

use super::constants::HEARTBEAT_JITTER_PERCENT;
use super::payloads::GatewayPayload;

/// Last sequence number seen on the connection. Zero means none yet.
pub type SharedSequence = Arc<AtomicU64>;

#[must_use]
pub fn load_sequence(sequence: &AtomicU64) -> Option<u64> {
    match sequence.load(Ordering::SeqCst) {
        0 => None,
        seq => Some(seq),
    }
}

/// Periodic heartbeat sender.
///
/// The task exits and drops its sender when an interval passes without an
/// ACK, which the connection treats as a zombied socket.
pub struct HeartbeatManager {
    interval_ms: u64,
    sequence: SharedSequence,
    running: Arc<AtomicBool>,
    ack_received: Arc<AtomicBool>,
}

impl HeartbeatManager {
    #[must_use]
    pub fn new(interval_ms: u64, sequence: SharedSequence) -> Self {
        Self {
            interval_ms,
            sequence,
            running: Arc::new(AtomicBool::new(false)),
            ack_received: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn acknowledge(&self) {
        self.ack_received.store(true, Ordering::SeqCst);
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn start(&self, payload_tx: mpsc::Sender<GatewayPayload>) -> tokio::task::JoinHandle<()> {
        let interval_ms = self.interval_ms.max(1);
        let sequence = self.sequence.clone();
        let running = self.running.clone();
        let ack_received = self.ack_received.clone();

        running.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            let jitter = (interval_ms as f64 * HEARTBEAT_JITTER_PERCENT) as u64;
            let first_delay = Duration::from_millis(interval_ms - jitter);
            let mut ticker = interval_at(
                Instant::now() + first_delay,
                Duration::from_millis(interval_ms),
            );

            while running.load(Ordering::SeqCst) {
                ticker.tick().await;

                if !running.load(Ordering::SeqCst) {
                    break;
                }

                if !ack_received.swap(false, Ordering::SeqCst) {
                    warn!("Heartbeat ACK not received, connection may be dead");
                    break;
                }

                let seq = load_sequence(&sequence);
                if payload_tx.send(GatewayPayload::heartbeat(seq)).await.is_err() {
                    debug!("Heartbeat channel closed");
                    break;
                }
                debug!(sequence = ?seq, "Sent heartbeat");
            }

            debug!("Heartbeat loop stopped");
        })
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Drop for HeartbeatManager {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_heartbeat_carries_latest_sequence() {
        let sequence = SharedSequence::default();
        let manager = HeartbeatManager::new(1000, sequence.clone());
        let (tx, mut rx) = mpsc::channel(4);
        let _handle = manager.start(tx);

        let first = rx.recv().await.unwrap();
        assert_eq!(first, GatewayPayload::heartbeat(None));

        sequence.store(17, Ordering::SeqCst);
        manager.acknowledge();
        let second = rx.recv().await.unwrap();
        assert_eq!(second, GatewayPayload::heartbeat(Some(17)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_ack_closes_channel() {
        let manager = HeartbeatManager::new(1000, SharedSequence::default());
        let (tx, mut rx) = mpsc::channel(4);
        let handle = manager.start(tx);

        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_none());
        handle.await.unwrap();
    }

    #[test]
    fn test_load_sequence_zero_is_none() {
        let sequence = AtomicU64::new(0);
        assert_eq!(load_sequence(&sequence), None);
        sequence.store(3, Ordering::SeqCst);
        assert_eq!(load_sequence(&sequence), Some(3));
    }
}
