//! Randomized mock generators (development mode)
//!
//! Active when no API key is configured. Payloads are synthesized from
//! curated vocabularies with randomized parameters so the client renders
//! something different on every call, within the same shape the LLM
//! backend produces.

use super::types::{
    ActivationStep, AffirmationData, AffirmationInput, AudioParams, BrainWaves, ChatReply,
    GeometryStep, MeditationData, NeuralPatternData, PatternConnection, PatternNode,
    SoundscapeData, SoundscapeTone, ToneFrequency, VisualizationData,
};
use rand::seq::SliceRandom;
use rand::Rng;

const GEOMETRY_PATTERNS: [&str; 6] = [
    "flower_of_life",
    "vesica_piscis",
    "merkaba",
    "sri_yantra",
    "metatrons_cube",
    "torus",
];

/// Solfeggio scale, hz
const HEALING_FREQUENCIES: [f64; 9] = [
    174.0, 285.0, 396.0, 417.0, 528.0, 639.0, 741.0, 852.0, 963.0,
];

const FREQUENCY_KINDS: [&str; 4] = ["grounding", "healing", "activation", "transcendence"];

const SHAPES: [&str; 6] = [
    "circle",
    "triangle",
    "hexagon",
    "spiral",
    "flower_of_life",
    "merkaba",
];

const TRANSFORMS: [&str; 4] = ["rotate", "scale", "pulse", "tessellate"];

const COLORS: [&str; 6] = [
    "#7b2ff7", "#00e0ff", "#ffd166", "#f72585", "#4cc9f0", "#80ffdb",
];

const NEURAL_TARGETS: [&str; 6] = [
    "prefrontal_cortex",
    "pineal_gland",
    "default_mode_network",
    "thalamus",
    "insula",
    "anterior_cingulate",
];

const CONSCIOUSNESS_LEVELS: [&str; 5] = [
    "alpha",
    "theta",
    "delta",
    "gamma_sync",
    "theta_gamma_sync",
];

const AFFIRMATION_CATEGORIES: [&str; 5] = [
    "abundance",
    "unity",
    "transformation",
    "healing",
    "purpose",
];

const COSMIC_ALIGNMENTS: [&str; 5] = [
    "galactic_center",
    "solar_radiance",
    "lunar_tides",
    "pleiadian_axis",
    "andromedan_spiral",
];

const AFFIRMATION_TEMPLATES: [&str; 5] = [
    "I am a living thread in the fabric of universal consciousness.",
    "Every breath aligns me with the rhythm of the cosmos.",
    "Abundance flows through me as light flows through the galaxy.",
    "I transform as stars transform, releasing what no longer serves.",
    "My awareness expands beyond every boundary I once believed.",
];

const GALACTIC_TYPES: [&str; 6] = [
    "nebula",
    "pulsar",
    "black_hole",
    "galaxy_rotation",
    "solar_wind",
    "cosmic_harmony",
];

const TONE_KINDS: [&str; 4] = ["carrier", "binaural_offset", "harmonic", "sub_bass"];

const FILTERS: [&str; 3] = ["lowpass", "bandpass", "highpass"];

const BRAIN_REGIONS: [&str; 6] = [
    "occipital_lobe",
    "temporal_lobe",
    "parietal_lobe",
    "prefrontal_cortex",
    "limbic_system",
    "brainstem",
];

const CHAT_REPLIES: [&str; 4] = [
    "Deep meditative states strengthen the connection between the prefrontal cortex and the \
     default mode network. A slow, extended exhale is the most reliable doorway in.",
    "Theta rhythms around 4-8 hz are associated with deep relaxation and memory consolidation. \
     The soundscape experiences are tuned to encourage exactly that band.",
    "Heart coherence rises when breathing settles near six breaths per minute. Watching the \
     heart-galaxy visualization while breathing slowly is a practical way to get there.",
    "Sacred geometry gives the visual cortex a stable, symmetrical anchor, which quiets the \
     narrative regions of the brain. Let the pattern do the work; effort is optional.",
];

const CHAT_REFERENCES: [&str; 5] = [
    "default_mode_network",
    "theta_rhythm",
    "heart_rate_variability",
    "neuroplasticity",
    "gamma_synchrony",
];

const CHAT_ACTIONS: [&str; 4] = [
    "Begin a sacred geometry meditation",
    "Generate a cosmic affirmation",
    "Synthesize a galactic soundscape",
    "Open the heart-galaxy connection",
];

/// Randomized implementation of the generator surface
#[derive(Default)]
pub struct MockGenerator;

impl MockGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn sacred_geometry_meditation(
        &self,
        intention: Option<&str>,
        duration: i64,
    ) -> MeditationData {
        let mut rng = rand::thread_rng();

        let pattern = GEOMETRY_PATTERNS.choose(&mut rng).unwrap().to_string();
        let frequency_count = rng.gen_range(2..=4);
        let frequencies = HEALING_FREQUENCIES
            .choose_multiple(&mut rng, frequency_count)
            .map(|&hz| ToneFrequency {
                hz,
                kind: FREQUENCY_KINDS.choose(&mut rng).unwrap().to_string(),
            })
            .collect();

        let geometry_sequence = (0..rng.gen_range(3..=6))
            .map(|_| GeometryStep {
                shape: SHAPES.choose(&mut rng).unwrap().to_string(),
                transform: TRANSFORMS.choose(&mut rng).unwrap().to_string(),
                color: COLORS.choose(&mut rng).unwrap().to_string(),
                timing: rng.gen_range(4.0..12.0),
            })
            .collect();

        let target_count = rng.gen_range(2..=3);
        let neural_targets = NEURAL_TARGETS
            .choose_multiple(&mut rng, target_count)
            .map(|&t| t.to_string())
            .collect();

        let focus = intention.unwrap_or("expanded awareness");
        let guided_text = format!(
            "Let your gaze soften into the {} as it turns. With every breath, \
             draw your attention toward {}. The geometry will carry the rest.",
            pattern.replace('_', " "),
            focus
        );

        MeditationData {
            pattern,
            duration,
            frequencies,
            geometry_sequence,
            neural_targets,
            consciousness_level: CONSCIOUSNESS_LEVELS.choose(&mut rng).unwrap().to_string(),
            guided_text,
        }
    }

    pub fn cosmic_affirmation(&self, input: &AffirmationInput) -> AffirmationData {
        let mut rng = rand::thread_rng();

        let mut personalization_factors = Vec::new();
        if let Some(intention) = &input.intention {
            personalization_factors.push(format!("intention:{}", intention));
        }
        if let Some(life_area) = &input.life_area {
            personalization_factors.push(format!("life_area:{}", life_area));
        }
        if let Some(personality) = &input.personality {
            personalization_factors.push(format!("personality:{}", personality));
        }
        if personalization_factors.is_empty() {
            personalization_factors.push("universal".to_string());
        }

        AffirmationData {
            text: AFFIRMATION_TEMPLATES.choose(&mut rng).unwrap().to_string(),
            category: AFFIRMATION_CATEGORIES.choose(&mut rng).unwrap().to_string(),
            vibrational_frequency: *HEALING_FREQUENCIES.choose(&mut rng).unwrap() as i64,
            cosmic_alignment: COSMIC_ALIGNMENTS.choose(&mut rng).unwrap().to_string(),
            personalization_factors,
        }
    }

    pub fn galactic_soundscape(&self, soundscape_type: &str, duration: i64) -> SoundscapeData {
        let mut rng = rand::thread_rng();

        let galactic_type = if GALACTIC_TYPES.contains(&soundscape_type) {
            soundscape_type.to_string()
        } else {
            GALACTIC_TYPES.choose(&mut rng).unwrap().to_string()
        };

        let frequencies = (0..rng.gen_range(3..=5))
            .map(|_| SoundscapeTone {
                hz: rng.gen_range(40.0..960.0),
                kind: TONE_KINDS.choose(&mut rng).unwrap().to_string(),
                amplitude: rng.gen_range(0.2..0.9),
            })
            .collect();

        SoundscapeData {
            name: format!("{} drift", galactic_type.replace('_', " ")),
            frequencies,
            duration,
            galactic_type,
            audio_params: AudioParams {
                reverb: rng.gen_range(0.1..0.9),
                delay: rng.gen_range(0.0..0.6),
                filter: FILTERS.choose(&mut rng).unwrap().to_string(),
                modulation: rng.gen_range(0.0..0.5),
            },
        }
    }

    pub fn neural_pattern(&self, consciousness_state: &str) -> NeuralPatternData {
        let mut rng = rand::thread_rng();

        let node_count = rng.gen_range(8..=14);
        let nodes: Vec<PatternNode> = (0..node_count)
            .map(|_| PatternNode {
                x: rng.gen::<f64>(),
                y: rng.gen::<f64>(),
                intensity: rng.gen::<f64>(),
            })
            .collect();

        let connections = (0..node_count + node_count / 2)
            .map(|_| {
                let from = rng.gen_range(0..node_count);
                let mut to = rng.gen_range(0..node_count);
                if to == from {
                    to = (to + 1) % node_count;
                }
                PatternConnection {
                    from,
                    to,
                    strength: rng.gen::<f64>(),
                }
            })
            .collect();

        let mut timestamp = 0.0;
        let activation_sequence = (0..rng.gen_range(5..=8))
            .map(|_| {
                timestamp += rng.gen_range(500.0..2000.0);
                ActivationStep {
                    timestamp,
                    region: BRAIN_REGIONS.choose(&mut rng).unwrap().to_string(),
                    intensity: rng.gen::<f64>(),
                }
            })
            .collect();

        NeuralPatternData {
            pattern_type: consciousness_state.to_string(),
            brain_waves: BrainWaves {
                alpha: rng.gen_range(8.0..12.0),
                theta: rng.gen_range(4.0..8.0),
                delta: rng.gen_range(0.5..4.0),
                beta: rng.gen_range(12.0..30.0),
                gamma: rng.gen_range(30.0..80.0),
            },
            visualization_data: VisualizationData { nodes, connections },
            activation_sequence,
        }
    }

    pub fn chat_response(&self, _message: &str) -> ChatReply {
        let mut rng = rand::thread_rng();

        ChatReply {
            content: CHAT_REPLIES.choose(&mut rng).unwrap().to_string(),
            context_references: CHAT_REFERENCES
                .choose_multiple(&mut rng, 2)
                .map(|&r| r.to_string())
                .collect(),
            suggested_actions: CHAT_ACTIONS
                .choose_multiple(&mut rng, 2)
                .map(|&a| a.to_string())
                .collect(),
        }
    }
}
