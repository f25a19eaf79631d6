use super::constants::{GATEWAY_URL, resume_url};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReadySession {
    id: String,
    resume_host: Option<String>,
}

/// What READY handed out, plus the last sequence seen. Survives reconnects.
#[derive(Debug, Clone, Default)]
pub struct SessionInfo {
    ready: Option<ReadySession>,
    sequence: Option<u64>,
}

impl SessionInfo {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ready: None,
            sequence: None,
        }
    }

    /// Stores the session READY assigned. `resume_host` is the bare resume URL.
    pub fn set_session(&mut self, session_id: String, resume_host: Option<String>) {
        self.ready = Some(ReadySession {
            id: session_id,
            resume_host,
        });
    }

    /// Keeps the highest-known sequence; `None` leaves it untouched.
    pub const fn update_sequence(&mut self, sequence: Option<u64>) {
        if let Some(seq) = sequence {
            self.sequence = Some(seq);
        }
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.ready.as_ref().map(|ready| ready.id.as_str())
    }

    #[must_use]
    pub fn resume_gateway_url(&self) -> Option<&str> {
        self.ready.as_ref()?.resume_host.as_deref()
    }

    #[must_use]
    pub const fn sequence(&self) -> Option<u64> {
        self.sequence
    }

    /// Session id and sequence to put in a Resume payload.
    #[must_use]
    pub fn resume_target(&self) -> Option<(&str, u64)> {
        Some((self.session_id()?, self.sequence?))
    }

    #[must_use]
    pub fn can_resume(&self) -> bool {
        self.resume_target().is_some()
    }

    /// URL for the next connection attempt.
    #[must_use]
    pub fn connect_url(&self) -> String {
        match self.resume_gateway_url() {
            Some(host) if self.can_resume() => resume_url(host),
            _ => GATEWAY_URL.to_string(),
        }
    }

    pub fn clear(&mut self) {
        self.ready = None;
        self.sequence = None;
    }
}
