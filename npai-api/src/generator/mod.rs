//! Content generators
//!
//! Each experience payload is produced either by the chat-completions API
//! with a JSON-object response contract, or by randomized local synthesis
//! when no API key is configured (development mode). The selection happens
//! once at startup; request handlers call through [`Generator`] without
//! knowing which backend is active.

pub mod llm;
pub mod mock;
pub mod types;

use llm::{LlmClient, LlmError};
use mock::MockGenerator;
use types::{
    AffirmationData, AffirmationInput, ChatReply, ChatTurn, MeditationData, NeuralPatternData,
    SoundscapeData,
};

/// Generator backend selected at startup
pub enum Generator {
    Llm(LlmClient),
    Mock(MockGenerator),
}

impl Generator {
    /// Sacred-geometry meditation payload
    pub async fn sacred_geometry_meditation(
        &self,
        intention: Option<&str>,
        duration: i64,
    ) -> Result<MeditationData, LlmError> {
        match self {
            Generator::Llm(client) => client.sacred_geometry_meditation(intention, duration).await,
            Generator::Mock(mock) => Ok(mock.sacred_geometry_meditation(intention, duration)),
        }
    }

    /// Cosmic consciousness affirmation payload
    pub async fn cosmic_affirmation(
        &self,
        input: &AffirmationInput,
    ) -> Result<AffirmationData, LlmError> {
        match self {
            Generator::Llm(client) => client.cosmic_affirmation(input).await,
            Generator::Mock(mock) => Ok(mock.cosmic_affirmation(input)),
        }
    }

    /// Galactic soundscape payload
    pub async fn galactic_soundscape(
        &self,
        soundscape_type: &str,
        duration: i64,
    ) -> Result<SoundscapeData, LlmError> {
        match self {
            Generator::Llm(client) => client.galactic_soundscape(soundscape_type, duration).await,
            Generator::Mock(mock) => Ok(mock.galactic_soundscape(soundscape_type, duration)),
        }
    }

    /// Neural pathway activation payload
    pub async fn neural_pattern(
        &self,
        consciousness_state: &str,
    ) -> Result<NeuralPatternData, LlmError> {
        match self {
            Generator::Llm(client) => client.neural_pattern(consciousness_state).await,
            Generator::Mock(mock) => Ok(mock.neural_pattern(consciousness_state)),
        }
    }

    /// Chat assistant reply, threaded with prior turns
    pub async fn chat_response(
        &self,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<ChatReply, LlmError> {
        match self {
            Generator::Llm(client) => client.chat_response(message, history).await,
            Generator::Mock(mock) => Ok(mock.chat_response(message)),
        }
    }
}
