use async_trait::async_trait;
use base64::engine::general_purpose;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{CommentGenerator, RawComment, ServiceError, Summarizer, SummaryStyle};
use crate::audio::EncodedClip;
use crate::recorder::Recording;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const MODEL: &str = "gemini-2.5-flash";

const COMMENT_SYSTEM_PROMPT: &str = "\
You are simulating a live stream audience chat.
You will receive audio chunks of a streamer talking.
Your goal is to generate 1 to 3 realistic, short viewer comments based SPECIFICALLY on what is being said in the audio.
- If the audio is silent or unclear, return an empty list.
- Mix of supportive fans, curious askers, and casual observers.
- Use internet slang appropriately but don't overdo it.
- 30% of comments should be questions prompting the streamer to say more.
- Generate realistic usernames.
- Return ONLY JSON.";

const SUMMARY_SYSTEM_PROMPT: &str = "\
You are an expert content editor.
Analyze the provided audio from a video recording and generate a text summary/post in a specific style.";

/// Client for both inference collaborators: live comments and the
/// post-session summary.
#[derive(Clone)]
pub struct GeminiService {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiService {
    pub fn from_env() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn generate_content(&self, body: Value) -> Result<String, ServiceError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, MODEL
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(ServiceError::Upstream(format!("{status}: {detail}")));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| ServiceError::Malformed("response carries no text part".to_string()))
    }
}

#[async_trait]
impl CommentGenerator for GeminiService {
    async fn generate_comments(&self, clip: &EncodedClip) -> Result<Vec<RawComment>, ServiceError> {
        let body = json!({
            "systemInstruction": { "parts": [{ "text": COMMENT_SYSTEM_PROMPT }] },
            "contents": [{
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": clip.mime_type,
                            "data": clip.to_base64(),
                        }
                    },
                    {
                        "text": "Listen to this live stream audio and generate 1-3 distinct audience comments. If nothing substantial is said, return empty array."
                    }
                ]
            }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        let text = self.generate_content(body).await?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text)
            .map_err(|e| ServiceError::Malformed(format!("comment list did not parse: {e}")))
    }
}

#[async_trait]
impl Summarizer for GeminiService {
    async fn summarize(
        &self,
        recording: &Recording,
        style: SummaryStyle,
    ) -> Result<String, ServiceError> {
        let body = json!({
            "systemInstruction": { "parts": [{ "text": SUMMARY_SYSTEM_PROMPT }] },
            "contents": [{
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": recording.mime_type,
                            "data": general_purpose::STANDARD.encode(&recording.data),
                        }
                    },
                    {
                        "text": format!(
                            "Summarize the content of this recording in the following style: {style}. Return the text formatted with Markdown."
                        )
                    }
                ]
            }],
        });

        self.generate_content(body).await
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}
