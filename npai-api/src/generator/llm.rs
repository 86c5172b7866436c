//! Chat-completions API client for content generation
//!
//! Every generator sends a system prompt plus a user prompt and requires a
//! JSON-object response, which is deserialized straight into the typed
//! payload. Failures carry the raw error text so the API layer can pass it
//! through in the 500 envelope.

use super::types::{
    AffirmationData, AffirmationInput, ChatReply, ChatTurn, MeditationData, NeuralPatternData,
    SoundscapeData,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const USER_AGENT: &str = "NeuraPeaceAI/0.1.0 (https://github.com/neurapeace/neurapeace)";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Model pinned by the upstream deployment
const CHAT_MODEL: &str = "gpt-5";

/// LLM client errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Response contained no message content")]
    MissingContent,

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: &'static str,
    messages: Vec<ChatCompletionMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatCompletionMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionReply,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionReply {
    content: Option<String>,
}

/// Chat-completions API client
pub struct LlmClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self, LlmError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
            api_key,
        })
    }

    /// Run one JSON-object completion and deserialize the message content
    async fn json_completion<T: DeserializeOwned>(
        &self,
        system_prompt: &str,
        messages: Vec<ChatCompletionMessage>,
    ) -> Result<T, LlmError> {
        let mut all_messages = vec![ChatCompletionMessage {
            role: "system".to_string(),
            content: system_prompt.to_string(),
        }];
        all_messages.extend(messages);

        let request = ChatCompletionRequest {
            model: CHAT_MODEL,
            messages: all_messages,
            response_format: ResponseFormat { kind: "json_object" },
        };

        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(url = %url, model = CHAT_MODEL, "Requesting chat completion");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(status.as_u16(), error_text));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::MissingContent)?;

        serde_json::from_str(&content).map_err(|e| LlmError::Parse(e.to_string()))
    }

    async fn prompt_completion<T: DeserializeOwned>(
        &self,
        system_prompt: &str,
        user_prompt: String,
    ) -> Result<T, LlmError> {
        self.json_completion(
            system_prompt,
            vec![ChatCompletionMessage {
                role: "user".to_string(),
                content: user_prompt,
            }],
        )
        .await
    }

    pub async fn sacred_geometry_meditation(
        &self,
        intention: Option<&str>,
        duration: i64,
    ) -> Result<MeditationData, LlmError> {
        let focus = match intention {
            Some(text) => format!("Focus on: {}", text),
            None => "Create a general consciousness expansion session.".to_string(),
        };
        let prompt = format!(
            "Generate a sacred geometry meditation session. {focus}\n\n\
             Duration: {duration} seconds\n\n\
             Create a JSON response with:\n\
             - pattern: name of sacred geometry pattern (flower_of_life, vesica_piscis, merkaba, etc.)\n\
             - duration: session length in seconds\n\
             - frequencies: array of healing frequencies with hz and type\n\
             - geometry_sequence: sequence of geometric shapes with transforms, colors, and timing\n\
             - neural_targets: brain regions to activate\n\
             - consciousness_level: target brainwave state\n\
             - guided_text: meditation narration text\n\n\
             Make it authentic and based on real sacred geometry principles and neuroscience."
        );

        self.prompt_completion(
            "You are an expert in sacred geometry, neuroscience, and consciousness expansion. \
             Generate authentic meditation experiences based on real principles.",
            prompt,
        )
        .await
    }

    pub async fn cosmic_affirmation(
        &self,
        input: &AffirmationInput,
    ) -> Result<AffirmationData, LlmError> {
        let context = serde_json::to_string(input).unwrap_or_else(|_| "{}".to_string());
        let prompt = format!(
            "Generate a personalized cosmic consciousness affirmation.\n\n\
             User context: {context}\n\n\
             Create a JSON response with:\n\
             - text: the affirmation text (powerful, cosmic, consciousness-expanding)\n\
             - category: type of affirmation (abundance, unity, transformation, etc.)\n\
             - vibrational_frequency: frequency in hz that aligns with the affirmation\n\
             - cosmic_alignment: celestial/cosmic principle it connects to\n\
             - personalization_factors: array of factors used for personalization\n\n\
             Base on real cosmic consciousness principles and universal laws."
        );

        self.prompt_completion(
            "You are a master of cosmic consciousness and universal principles. Create profound \
             affirmations that connect individuals to universal consciousness.",
            prompt,
        )
        .await
    }

    pub async fn galactic_soundscape(
        &self,
        soundscape_type: &str,
        duration: i64,
    ) -> Result<SoundscapeData, LlmError> {
        let prompt = format!(
            "Generate a galactic soundscape for consciousness expansion.\n\n\
             Type: {soundscape_type}\n\
             Duration: {duration} seconds\n\n\
             Create a JSON response with:\n\
             - name: descriptive name for the soundscape\n\
             - frequencies: array of frequencies with hz, type, and amplitude\n\
             - duration: length in seconds\n\
             - galactic_type: cosmic theme (nebula, pulsar, black_hole, galaxy_rotation, etc.)\n\
             - audio_params: reverb, delay, filter, modulation settings for Web Audio API\n\n\
             Base on real astronomical phenomena and sound healing principles."
        );

        self.prompt_completion(
            "You are an expert in sound healing, astronomy, and consciousness expansion through \
             audio. Generate authentic cosmic soundscapes.",
            prompt,
        )
        .await
    }

    pub async fn neural_pattern(
        &self,
        consciousness_state: &str,
    ) -> Result<NeuralPatternData, LlmError> {
        let prompt = format!(
            "Generate neural pathway activation pattern for consciousness expansion.\n\n\
             Target state: {consciousness_state}\n\n\
             Create a JSON response with:\n\
             - pattern_type: type of neural pattern\n\
             - brain_waves: frequencies for alpha, theta, delta, beta, gamma in hz\n\
             - visualization_data: nodes (x, y coordinates, intensity) and connections (from node, \
               to node, strength)\n\
             - activation_sequence: timeline of brain region activations with timestamps and \
               intensities\n\n\
             Base on real neuroscience and brainwave research."
        );

        self.prompt_completion(
            "You are a neuroscientist specializing in consciousness research and brain wave \
             patterns. Generate authentic neural activation patterns.",
            prompt,
        )
        .await
    }

    pub async fn chat_response(
        &self,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<ChatReply, LlmError> {
        let mut messages: Vec<ChatCompletionMessage> = history
            .iter()
            .map(|turn| ChatCompletionMessage {
                role: turn.role.clone(),
                content: turn.content.clone(),
            })
            .collect();
        messages.push(ChatCompletionMessage {
            role: "user".to_string(),
            content: format!(
                "{message}\n\n\
                 Answer as a JSON object with:\n\
                 - content: your reply\n\
                 - context_references: array of neuroscience or consciousness concepts referenced\n\
                 - suggested_actions: array of app experiences to suggest next"
            ),
        });

        self.json_completion(
            "You are a guide combining neuroscience, meditation practice, and cosmic \
             consciousness. Answer questions about the NeuraPeace experiences with warmth and \
             scientific grounding.",
            messages,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = LlmClient::new("sk-test".to_string(), DEFAULT_BASE_URL.to_string());
        assert!(client.is_ok());
    }

    #[test]
    fn test_completion_response_parsing() {
        let raw = r#"{
            "choices": [
                {"message": {"content": "{\"content\": \"hi\", \"context_references\": [], \"suggested_actions\": []}"}}
            ]
        }"#;

        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        let content = parsed.choices[0].message.content.as_deref().unwrap();
        let reply: ChatReply = serde_json::from_str(content).unwrap();
        assert_eq!(reply.content, "hi");
    }

    #[test]
    fn test_request_serializes_json_object_contract() {
        let request = ChatCompletionRequest {
            model: CHAT_MODEL,
            messages: vec![ChatCompletionMessage {
                role: "user".to_string(),
                content: "hello".to_string(),
            }],
            response_format: ResponseFormat { kind: "json_object" },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-5");
        assert_eq!(value["response_format"]["type"], "json_object");
    }
}
