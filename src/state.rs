use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::hands::{CoHost, HandRegistry};

/// Display palette shared by comments and raised hands.
pub const CHAT_PALETTE: [&str; 6] = [
    "#ff00ff", // magenta
    "#00ffff", // cyan
    "#ffff00", // yellow
    "#00ff00", // lime
    "#ff0099", // hot pink
    "#ffffff", // white
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamStatus {
    Idle,
    Streaming,
    Ended,
}

/// One synthetic viewer comment. Appended once to the feed, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: Uuid,
    pub username: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub color: String,
    pub is_question: bool,
    pub wants_to_raise_hand: bool,
    pub raise_hand_reason: Option<String>,
}

/// All mutable session state, behind one lock. Mutations happen only while
/// the lock is held, so checks like "is a co-host active" always see the
/// value at the instant of mutation rather than one captured earlier.
#[derive(Debug)]
pub struct SessionState {
    pub status: StreamStatus,
    /// Append-only live feed.
    pub comments: Vec<Comment>,
    pub hands: HandRegistry,
    /// At most one co-host exists at any time.
    pub co_host: Option<CoHost>,
    pub agent_id: Option<String>,
    pub summary: Option<String>,
    /// Persistent failure (capture could not start).
    pub error: Option<String>,
    /// Transient auto-clearing notice (failed invite).
    pub notice: Option<String>,
    pub notice_epoch: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            status: StreamStatus::Idle,
            comments: Vec::new(),
            hands: HandRegistry::default(),
            co_host: None,
            agent_id: None,
            summary: None,
            error: None,
            notice: None,
            notice_epoch: 0,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn co_host_active(&self) -> bool {
        self.co_host.is_some()
    }

    /// Clears everything a fresh session must not inherit. The notice epoch
    /// stays monotonic so a stale auto-clear cannot wipe a newer notice.
    pub fn reset_for_start(&mut self) {
        self.comments.clear();
        self.hands = HandRegistry::default();
        self.co_host = None;
        self.agent_id = None;
        self.summary = None;
        self.error = None;
        self.notice = None;
    }
}

pub type SharedState = Arc<Mutex<SessionState>>;

pub fn shared_state() -> SharedState {
    Arc::new(Mutex::new(SessionState::new()))
}
