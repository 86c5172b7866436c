//! Generated payload types
//!
//! These mirror the JSON-object response contract of the generator prompts.
//! The repository stores the collection-valued fields as opaque JSON blobs;
//! only the scalar columns (`pattern`, `category`, `galactic_type`,
//! `pattern_type`) are typed end to end.

use serde::{Deserialize, Serialize};

/// One healing frequency in a meditation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneFrequency {
    pub hz: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// One step of the geometry animation sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryStep {
    pub shape: String,
    pub transform: String,
    pub color: String,
    /// Seconds the step is held
    pub timing: f64,
}

/// Sacred-geometry meditation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeditationData {
    pub pattern: String,
    pub duration: i64,
    pub frequencies: Vec<ToneFrequency>,
    pub geometry_sequence: Vec<GeometryStep>,
    pub neural_targets: Vec<String>,
    pub consciousness_level: String,
    pub guided_text: String,
}

/// User context for affirmation generation
#[derive(Debug, Clone, Default, Serialize)]
pub struct AffirmationInput {
    pub intention: Option<String>,
    pub life_area: Option<String>,
    pub personality: Option<String>,
}

/// Cosmic affirmation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffirmationData {
    pub text: String,
    pub category: String,
    pub vibrational_frequency: i64,
    pub cosmic_alignment: String,
    pub personalization_factors: Vec<String>,
}

/// One synthesized tone of a soundscape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundscapeTone {
    pub hz: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub amplitude: f64,
}

/// Synthesis settings the client feeds into its audio graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioParams {
    pub reverb: f64,
    pub delay: f64,
    pub filter: String,
    pub modulation: f64,
}

/// Galactic soundscape payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundscapeData {
    pub name: String,
    pub frequencies: Vec<SoundscapeTone>,
    pub duration: i64,
    pub galactic_type: String,
    pub audio_params: AudioParams,
}

/// Brainwave band frequencies in hz
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainWaves {
    pub alpha: f64,
    pub theta: f64,
    pub delta: f64,
    pub beta: f64,
    pub gamma: f64,
}

/// One node of the activation graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternNode {
    pub x: f64,
    pub y: f64,
    pub intensity: f64,
}

/// One edge of the activation graph, by node index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConnection {
    pub from: usize,
    pub to: usize,
    pub strength: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationData {
    pub nodes: Vec<PatternNode>,
    pub connections: Vec<PatternConnection>,
}

/// One step of the brain-region activation timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationStep {
    /// Milliseconds from sequence start
    pub timestamp: f64,
    pub region: String,
    pub intensity: f64,
}

/// Neural pathway activation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuralPatternData {
    pub pattern_type: String,
    pub brain_waves: BrainWaves,
    pub visualization_data: VisualizationData,
    pub activation_sequence: Vec<ActivationStep>,
}

/// One prior turn of a chat conversation
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// "user" or "assistant"
    pub role: String,
    pub content: String,
}

/// Chat assistant reply payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub content: String,
    pub context_references: Vec<String>,
    pub suggested_actions: Vec<String>,
}
