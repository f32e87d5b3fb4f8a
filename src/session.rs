use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::audio::graph::{AudioGraph, CaptureConfig, FrameSink, GraphError};
use crate::config::SessionConfig;
use crate::hands::{avatar_url, CoHost, CoHostStatus, HandStatus};
use crate::pipeline::CommentPipeline;
use crate::recorder::MediaRecorder;
use crate::rng::{self, RandomSource};
use crate::services::voice::{VoiceEvent, COHOST_SYSTEM_PROMPT, COHOST_VOICES};
use crate::services::{AgentConfig, AgentFactory, CommentGenerator, ServiceError, Summarizer, SummaryStyle};
use crate::state::{shared_state, SharedState, StreamStatus};

const CAPTURE_ERROR_TEXT: &str = "Camera/Microphone access denied. Please enable permissions.";
const INVITE_ERROR_TEXT: &str = "Failed to invite co-host. Please try again.";
const SUMMARY_EMPTY_TEXT: &str = "Could not generate summary.";
const SUMMARY_ERROR_TEXT: &str = "Error generating summary. Please try again.";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is already streaming")]
    AlreadyStreaming,
    #[error(transparent)]
    Capture(#[from] GraphError),
    #[error("no raised hand with id {0}")]
    UnknownHand(Uuid),
    #[error("hand {0} is not pending")]
    NotPending(Uuid),
    #[error("a co-host is already active")]
    CoHostActive,
    #[error("another invite is already in flight")]
    InviteInFlight,
    #[error("failed to create co-host agent: {0}")]
    InviteFailed(#[from] ServiceError),
}

/// Orchestrates the lifetime of one streaming session: capture graph,
/// recorders, comment pipeline wiring, the co-host singleton and the
/// post-session summary.
pub struct SessionController {
    config: SessionConfig,
    state: SharedState,
    graph: AudioGraph,
    video_recorder: Arc<dyn MediaRecorder>,
    audio_recorder: Arc<dyn MediaRecorder>,
    summarizer: Arc<dyn Summarizer>,
    agents: Arc<dyn AgentFactory>,
    rng: Arc<dyn RandomSource>,
    invite_in_flight: Arc<AtomicBool>,
}

impl SessionController {
    pub fn new(
        config: SessionConfig,
        generator: Arc<dyn CommentGenerator>,
        summarizer: Arc<dyn Summarizer>,
        agents: Arc<dyn AgentFactory>,
        video_recorder: Arc<dyn MediaRecorder>,
        audio_recorder: Arc<dyn MediaRecorder>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        let state = shared_state();

        let graph = AudioGraph::new(CaptureConfig {
            sample_rate: config.sample_rate,
            window: config.window,
        });

        let pipeline = Arc::new(CommentPipeline::new(
            generator,
            state.clone(),
            rng.clone(),
            config.stagger,
            config.jitter,
        ));
        graph.set_dispatch(move |clip| pipeline.dispatch(clip));

        Self {
            config,
            state,
            graph,
            video_recorder,
            audio_recorder,
            summarizer,
            agents,
            rng,
            invite_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle to the session state for observers (feed, hands, co-host).
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    pub fn status(&self) -> StreamStatus {
        self.state.lock().unwrap().status
    }

    /// Reset transient state and bring up recorders and the capture graph.
    /// Returns the sink the media-capture collaborator must feed.
    pub fn start(&mut self) -> Result<FrameSink, SessionError> {
        {
            let mut session = self.state.lock().unwrap();
            if session.status == StreamStatus::Streaming {
                return Err(SessionError::AlreadyStreaming);
            }
            session.reset_for_start();
        }

        self.video_recorder.start();
        self.audio_recorder.start();

        let sink = match self.graph.start() {
            Ok(sink) => sink,
            Err(e) => {
                self.video_recorder.stop();
                self.audio_recorder.stop();
                return Err(e.into());
            }
        };

        self.state.lock().unwrap().status = StreamStatus::Streaming;
        info!("session started");
        Ok(sink)
    }

    /// The media-capture collaborator could not deliver an audio source.
    /// Tears the partial start back down and leaves the session idle with
    /// a persistent error; not retried automatically.
    pub fn capture_failed(&mut self, detail: &str) {
        warn!(detail, "media capture unavailable; session cannot proceed");
        self.graph.stop();
        self.video_recorder.stop();
        self.audio_recorder.stop();

        let mut session = self.state.lock().unwrap();
        session.status = StreamStatus::Idle;
        session.error = Some(CAPTURE_ERROR_TEXT.to_string());
    }

    /// End the stream. Idempotent. Already-scheduled comments may still
    /// land, but no new windows are captured or dispatched, and the voice
    /// session is torn down with the co-host singleton.
    pub fn stop(&mut self) {
        self.graph.stop();
        self.video_recorder.stop();
        self.audio_recorder.stop();

        let mut session = self.state.lock().unwrap();
        if session.status == StreamStatus::Streaming {
            session.status = StreamStatus::Ended;
            info!("session ended");
        }
        session.co_host = None;
        session.agent_id = None;
    }

    /// Invite a pending hand to become the co-host. Only one invite may be
    /// in flight; a failed invite leaves the hand pending and retryable.
    pub async fn invite(&self, hand_id: Uuid) -> Result<(), SessionError> {
        if self.invite_in_flight.swap(true, Ordering::SeqCst) {
            return Err(SessionError::InviteInFlight);
        }
        let result = self.invite_inner(hand_id).await;
        self.invite_in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn invite_inner(&self, hand_id: Uuid) -> Result<(), SessionError> {
        let (username, reason, color) = {
            let session = self.state.lock().unwrap();
            if session.co_host_active() {
                return Err(SessionError::CoHostActive);
            }
            let hand = session
                .hands
                .get(hand_id)
                .ok_or(SessionError::UnknownHand(hand_id))?;
            if hand.status != HandStatus::Pending {
                return Err(SessionError::NotPending(hand_id));
            }
            (hand.username.clone(), hand.reason.clone(), hand.color.clone())
        };

        let voice = rng::pick(self.rng.as_ref(), &COHOST_VOICES);
        let agent = AgentConfig {
            name: format!("CoHost_{}_{}", username, Utc::now().timestamp_millis()),
            system_prompt: format!(
                "{COHOST_SYSTEM_PROMPT}\n\nYour name is {username}. You raised your hand because: \"{reason}\""
            ),
            first_message: format!(
                "Hey! Thanks for having me on. I raised my hand because {reason}"
            ),
            voice_id: voice.id.to_string(),
        };

        match self.agents.create_agent(&agent).await {
            Ok(agent_id) => {
                let mut session = self.state.lock().unwrap();
                session.hands.mark_invited(hand_id);
                session.co_host = Some(CoHost {
                    username: username.clone(),
                    color,
                    status: CoHostStatus::Connecting,
                    message: None,
                    avatar_url: avatar_url(&username),
                });
                session.agent_id = Some(agent_id);
                info!(%username, "co-host invited");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, %username, "co-host agent creation failed");
                self.post_notice(INVITE_ERROR_TEXT);
                Err(e.into())
            }
        }
    }

    pub fn dismiss(&self, hand_id: Uuid) {
        self.state.lock().unwrap().hands.dismiss(hand_id);
    }

    /// Map a realtime voice-session transition onto the co-host singleton.
    /// Disconnect destroys the singleton; the originating hand stays
    /// invited.
    pub fn voice_event(&self, event: VoiceEvent) {
        let mut session = self.state.lock().unwrap();
        if event == VoiceEvent::Disconnected {
            session.co_host = None;
            session.agent_id = None;
            return;
        }
        let Some(co_host) = session.co_host.as_mut() else {
            return;
        };
        match event {
            VoiceEvent::Connecting => co_host.status = CoHostStatus::Connecting,
            VoiceEvent::Connected | VoiceEvent::Speaking | VoiceEvent::Listening => {
                co_host.status = CoHostStatus::Active;
                co_host.message = None;
            }
            VoiceEvent::Error(message) => {
                co_host.status = CoHostStatus::Error;
                co_host.message = Some(message);
            }
            VoiceEvent::Disconnected => {}
        }
    }

    /// Summarize the recorded session. Prefers the smaller audio-only take
    /// over the full video recording; failures degrade to fallback text.
    pub async fn generate_summary(&self, style: SummaryStyle) -> String {
        let recording = self
            .audio_recorder
            .recording()
            .or_else(|| self.video_recorder.recording());

        let text = match recording {
            Some(recording) => match self.summarizer.summarize(&recording, style).await {
                Ok(text) if !text.trim().is_empty() => text,
                Ok(_) => SUMMARY_EMPTY_TEXT.to_string(),
                Err(e) => {
                    warn!(error = %e, "summary generation failed");
                    SUMMARY_ERROR_TEXT.to_string()
                }
            },
            None => SUMMARY_EMPTY_TEXT.to_string(),
        };

        self.state.lock().unwrap().summary = Some(text.clone());
        text
    }

    fn post_notice(&self, text: &str) {
        let epoch = {
            let mut session = self.state.lock().unwrap();
            session.notice_epoch += 1;
            session.notice = Some(text.to_string());
            session.notice_epoch
        };

        let state = self.state.clone();
        let ttl = self.config.notice_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut session = state.lock().unwrap();
            // A newer notice owns the slot now; leave it alone.
            if session.notice_epoch == epoch {
                session.notice = None;
            }
        });
    }
}
