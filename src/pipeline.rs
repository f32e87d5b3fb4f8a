use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::audio::EncodedClip;
use crate::hands::{HandStatus, RaisedHand};
use crate::rng::{self, RandomSource};
use crate::services::{CommentGenerator, RawComment};
use crate::state::{Comment, SharedState, CHAT_PALETTE};

/// Turns encoded audio windows into staggered feed activity. Dispatch is
/// fire-and-forget: results land in the shared state asynchronously, and a
/// failing window degrades to zero comments without affecting any other
/// window.
pub struct CommentPipeline {
    generator: Arc<dyn CommentGenerator>,
    state: SharedState,
    rng: Arc<dyn RandomSource>,
    stagger: Duration,
    jitter: Duration,
}

impl CommentPipeline {
    pub fn new(
        generator: Arc<dyn CommentGenerator>,
        state: SharedState,
        rng: Arc<dyn RandomSource>,
        stagger: Duration,
        jitter: Duration,
    ) -> Self {
        Self {
            generator,
            state,
            rng,
            stagger,
            jitter,
        }
    }

    /// Ship one window to the inference collaborator and schedule the
    /// returned comments. Never awaited by the flush timer; a hung call
    /// delays only this window's comments.
    pub fn dispatch(&self, clip: EncodedClip) {
        let generator = self.generator.clone();
        let state = self.state.clone();
        let rng = self.rng.clone();
        let stagger = self.stagger;
        let jitter = self.jitter;

        tokio::spawn(async move {
            let raw = match generator.generate_comments(&clip).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(error = %e, "comment inference failed; dropping window");
                    return;
                }
            };

            debug!(count = raw.len(), "scheduling comments for window");

            for (index, comment) in raw.into_iter().enumerate() {
                // Base delay grows with input order so comments from one
                // window never appear all at once; jitter desynchronizes
                // them further without reordering.
                let delay = stagger * index as u32 + rng::jitter(rng.as_ref(), jitter);

                let state = state.clone();
                let rng = rng.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    materialize(&state, rng.as_ref(), comment);
                });
            }
        });
    }
}

/// Runs at fire time: assigns identity, timestamp and color, appends to
/// the feed and, when the comment raises a hand, registers it — unless a
/// co-host is active right now. The check reads the state under the lock
/// at this instant, not a value captured when the comment was scheduled.
fn materialize(state: &SharedState, rng: &dyn RandomSource, raw: RawComment) {
    let now = Utc::now();
    let color = rng::pick(rng, &CHAT_PALETTE).to_string();

    let reason = raw
        .raise_hand_reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);
    let wants_hand = raw.wants_to_raise_hand && reason.is_some();

    let comment = Comment {
        id: Uuid::new_v4(),
        username: raw.username.clone(),
        text: raw.text,
        timestamp: now,
        color: color.clone(),
        is_question: raw.is_question,
        wants_to_raise_hand: raw.wants_to_raise_hand,
        raise_hand_reason: raw.raise_hand_reason,
    };

    let mut session = state.lock().unwrap();
    session.comments.push(comment);

    if wants_hand && !session.co_host_active() {
        session.hands.raise(RaisedHand {
            id: Uuid::new_v4(),
            username: raw.username,
            reason: reason.unwrap_or_default(),
            timestamp: now,
            color,
            status: HandStatus::Pending,
        });
    }
}
