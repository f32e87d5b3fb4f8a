#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use liveroom::audio::EncodedClip;
use liveroom::hands::{HandStatus, RaisedHand};
use liveroom::recorder::{MediaRecorder, Recording};
use liveroom::services::{
    AgentConfig, AgentFactory, CommentGenerator, RawComment, ServiceError, Summarizer,
    SummaryStyle,
};

pub fn raw_comment(username: &str, text: &str) -> RawComment {
    RawComment {
        username: username.to_string(),
        text: text.to_string(),
        is_question: false,
        wants_to_raise_hand: false,
        raise_hand_reason: None,
    }
}

pub fn raw_hand_comment(username: &str, text: &str, reason: &str) -> RawComment {
    RawComment {
        username: username.to_string(),
        text: text.to_string(),
        is_question: true,
        wants_to_raise_hand: true,
        raise_hand_reason: Some(reason.to_string()),
    }
}

pub fn pending_hand(username: &str, reason: &str) -> RaisedHand {
    RaisedHand {
        id: Uuid::new_v4(),
        username: username.to_string(),
        reason: reason.to_string(),
        timestamp: Utc::now(),
        color: "#00ffff".to_string(),
        status: HandStatus::Pending,
    }
}

pub fn clip() -> EncodedClip {
    EncodedClip::from_samples(&[0.1; 160], 16_000)
}

/// Comment-inference stub returning a fixed list and counting calls.
pub struct StubGenerator {
    comments: Vec<RawComment>,
    pub calls: AtomicUsize,
}

impl StubGenerator {
    pub fn new(comments: Vec<RawComment>) -> Arc<Self> {
        Arc::new(Self {
            comments,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl CommentGenerator for StubGenerator {
    async fn generate_comments(&self, _clip: &EncodedClip) -> Result<Vec<RawComment>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.comments.clone())
    }
}

pub struct FailingGenerator;

#[async_trait]
impl CommentGenerator for FailingGenerator {
    async fn generate_comments(&self, _clip: &EncodedClip) -> Result<Vec<RawComment>, ServiceError> {
        Err(ServiceError::Upstream("inference backend unavailable".to_string()))
    }
}

/// Agent-factory stub; records the last config it was handed.
pub struct StubAgents {
    fail: bool,
    pub calls: AtomicUsize,
    pub last_config: Mutex<Option<AgentConfig>>,
}

impl StubAgents {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            calls: AtomicUsize::new(0),
            last_config: Mutex::new(None),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            calls: AtomicUsize::new(0),
            last_config: Mutex::new(None),
        })
    }
}

#[async_trait]
impl AgentFactory for StubAgents {
    async fn create_agent(&self, config: &AgentConfig) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_config.lock().unwrap() = Some(config.clone());
        if self.fail {
            Err(ServiceError::Upstream("agent backend unavailable".to_string()))
        } else {
            Ok("agent_123".to_string())
        }
    }
}

/// Summarizer stub; records the mime type of the recording it received.
pub struct StubSummarizer {
    reply: String,
    fail: bool,
    pub seen_mime: Mutex<Option<String>>,
}

impl StubSummarizer {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            fail: false,
            seen_mime: Mutex::new(None),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: String::new(),
            fail: true,
            seen_mime: Mutex::new(None),
        })
    }
}

#[async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(
        &self,
        recording: &Recording,
        _style: SummaryStyle,
    ) -> Result<String, ServiceError> {
        *self.seen_mime.lock().unwrap() = Some(recording.mime_type.clone());
        if self.fail {
            Err(ServiceError::Upstream("summary backend unavailable".to_string()))
        } else {
            Ok(self.reply.clone())
        }
    }
}

/// Recorder stub with a canned take.
pub struct BufferedRecorder {
    data: Vec<u8>,
    mime: String,
}

impl BufferedRecorder {
    pub fn with_take(mime: &str) -> Arc<Self> {
        Arc::new(Self {
            data: vec![0u8; 64],
            mime: mime.to_string(),
        })
    }
}

impl MediaRecorder for BufferedRecorder {
    fn start(&self) {}
    fn stop(&self) {}
    fn recording(&self) -> Option<Recording> {
        Some(Recording {
            data: self.data.clone(),
            mime_type: self.mime.clone(),
        })
    }
}

/// Recorder stub that never produced anything.
pub struct EmptyRecorder;

impl MediaRecorder for EmptyRecorder {
    fn start(&self) {}
    fn stop(&self) {}
    fn recording(&self) -> Option<Recording> {
        None
    }
}
