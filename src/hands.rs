use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandStatus {
    Pending,
    Invited,
    Declined,
}

/// A synthetic audience request to join the stream.
#[derive(Debug, Clone, Serialize)]
pub struct RaisedHand {
    pub id: Uuid,
    pub username: String,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    pub color: String,
    pub status: HandStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoHostStatus {
    Connecting,
    Active,
    Error,
    Disconnected,
}

/// The AI voice participant invited into the conversation.
#[derive(Debug, Clone, Serialize)]
pub struct CoHost {
    pub username: String,
    pub color: String,
    pub status: CoHostStatus,
    pub message: Option<String>,
    pub avatar_url: String,
}

pub fn avatar_url(username: &str) -> String {
    format!("https://api.dicebear.com/7.x/personas/svg?seed={username}")
}

/// Ordered set of raised hands. Pure state container; the session
/// controller owns the invite orchestration and calls the transitions here.
#[derive(Debug, Default)]
pub struct HandRegistry {
    hands: Vec<RaisedHand>,
}

impl HandRegistry {
    /// Append. Repeated raises from the same handle stay independent
    /// entries; no de-duplication.
    pub fn raise(&mut self, hand: RaisedHand) {
        self.hands.push(hand);
    }

    /// Remove unconditionally. No-op when the id is absent.
    pub fn dismiss(&mut self, id: Uuid) {
        self.hands.retain(|h| h.id != id);
    }

    pub fn get(&self, id: Uuid) -> Option<&RaisedHand> {
        self.hands.iter().find(|h| h.id == id)
    }

    /// Pending -> Invited. Returns false when the entry is missing or not
    /// pending, leaving the registry untouched.
    pub fn mark_invited(&mut self, id: Uuid) -> bool {
        match self.hands.iter_mut().find(|h| h.id == id) {
            Some(hand) if hand.status == HandStatus::Pending => {
                hand.status = HandStatus::Invited;
                true
            }
            _ => false,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.hands
            .iter()
            .filter(|h| h.status == HandStatus::Pending)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RaisedHand> {
        self.hands.iter()
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }
}
