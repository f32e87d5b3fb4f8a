pub mod gemini;
pub mod voice;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::EncodedClip;
use crate::recorder::Recording;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream rejected request: {0}")]
    Upstream(String),
    #[error("unexpected response: {0}")]
    Malformed(String),
}

/// A viewer comment as returned by the inference endpoint, before the
/// pipeline assigns identity, timestamp and color.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComment {
    pub username: String,
    pub text: String,
    #[serde(default)]
    pub is_question: bool,
    #[serde(default)]
    pub wants_to_raise_hand: bool,
    #[serde(default)]
    pub raise_hand_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStyle {
    CasualBlogPost,
    AcademicAbstract,
    LinkedInThoughtLeader,
}

impl SummaryStyle {
    pub const ALL: [SummaryStyle; 3] = [
        SummaryStyle::CasualBlogPost,
        SummaryStyle::AcademicAbstract,
        SummaryStyle::LinkedInThoughtLeader,
    ];
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SummaryStyle::CasualBlogPost => "Casual Blog Post",
            SummaryStyle::AcademicAbstract => "Academic Abstract",
            SummaryStyle::LinkedInThoughtLeader => "LinkedIn Thought Leader",
        };
        f.write_str(label)
    }
}

/// Comment-inference collaborator. Must tolerate silent input by
/// returning an empty list.
#[async_trait]
pub trait CommentGenerator: Send + Sync {
    async fn generate_comments(&self, clip: &EncodedClip) -> Result<Vec<RawComment>, ServiceError>;
}

/// Summary-inference collaborator.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        recording: &Recording,
        style: SummaryStyle,
    ) -> Result<String, ServiceError>;
}

/// Parameters for one co-host agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub name: String,
    pub system_prompt: String,
    pub first_message: String,
    pub voice_id: String,
}

/// Voice-session-creation collaborator. Returns an opaque agent id.
#[async_trait]
pub trait AgentFactory: Send + Sync {
    async fn create_agent(&self, config: &AgentConfig) -> Result<String, ServiceError>;
}
