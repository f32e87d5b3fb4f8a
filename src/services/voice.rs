use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{AgentConfig, AgentFactory, ServiceError};

const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";

pub const COHOST_SYSTEM_PROMPT: &str = "\
You are a friendly and engaged co-host on a live stream. Your role is to:

1. LISTEN actively to what the host is saying
2. ASK thoughtful follow-up questions that help the audience understand better
3. SHARE brief insights that add value to the conversation
4. ACKNOWLEDGE the host's points naturally (\"That's a great point...\", \"I see what you mean...\")

Personality traits:
- Curious and genuinely interested
- Supportive but not sycophantic
- Knowledgeable but humble
- Natural conversational flow with reactions like \"uh huh\", \"right\", \"interesting\"

Guidelines:
- Keep responses concise (1-3 sentences)
- Ask one question at a time
- Never interrupt - wait for natural pauses
- React naturally to what the host says";

#[derive(Debug, Clone, Copy)]
pub struct Voice {
    pub id: &'static str,
    pub name: &'static str,
}

/// Fixed voice set; invite picks one uniformly at random.
pub const COHOST_VOICES: [Voice; 3] = [
    Voice { id: "EXAVITQu4vr4xnSDxMaL", name: "Sarah" },
    Voice { id: "21m00Tcm4TlvDq8ikWAM", name: "Rachel" },
    Voice { id: "AZnzlk1XvdvUeBnXmlld", name: "Domi" },
];

/// Status transitions reported by the realtime voice session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    Connecting,
    Connected,
    Speaking,
    Listening,
    Error(String),
    Disconnected,
}

/// Client for the conversational-agent provider: creates co-host agents
/// and signs the realtime session URL.
#[derive(Clone)]
pub struct VoiceService {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl VoiceService {
    pub fn from_env() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: std::env::var("ELEVENLABS_API_KEY").unwrap_or_default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Signed URL for opening the realtime conversation with an agent.
    pub async fn signed_url(&self, agent_id: &str) -> Result<String, ServiceError> {
        let url = format!(
            "{}/v1/convai/conversation/get_signed_url?agent_id={agent_id}",
            self.base_url
        );

        let response = self
            .client
            .get(&url)
            .header("xi-api-key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::Upstream(format!(
                "signed url request failed: {}",
                response.status()
            )));
        }

        let parsed: SignedUrlResponse = response.json().await?;
        Ok(parsed.signed_url)
    }
}

#[async_trait]
impl AgentFactory for VoiceService {
    async fn create_agent(&self, config: &AgentConfig) -> Result<String, ServiceError> {
        let url = format!("{}/v1/convai/agents/create", self.base_url);

        let body = json!({
            "name": config.name,
            "conversation_config": {
                "agent": {
                    "first_message": config.first_message,
                    "language": "en",
                    "prompt": { "prompt": config.system_prompt },
                },
                "tts": {
                    "model_id": "eleven_turbo_v2",
                    "voice_id": config.voice_id,
                },
            },
        });

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(ServiceError::Upstream(format!(
                "failed to create agent: {status} - {detail}"
            )));
        }

        let parsed: CreateAgentResponse = response.json().await?;
        Ok(parsed.agent_id)
    }
}

#[derive(Deserialize)]
struct CreateAgentResponse {
    agent_id: String,
}

#[derive(Deserialize)]
struct SignedUrlResponse {
    signed_url: String,
}
