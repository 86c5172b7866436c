//! Phase table and static guidance text

// Re-export the shared state enums so engine consumers have one import path
pub use npai_common::events::{MeditationPhase, SessionStatus};

use serde::Serialize;

/// Guidance entry returned when a session starts
#[derive(Debug, Clone, Serialize)]
pub struct PhaseGuidance {
    pub phase: MeditationPhase,
    pub guidance: &'static str,
}

/// Static per-phase guidance text. Not generated; identical for every
/// session.
pub fn guidance(phase: MeditationPhase) -> &'static str {
    match phase {
        MeditationPhase::Preparation => {
            "Settle into a comfortable position and let your breath slow. \
             Allow your awareness to gather at the center of your chest."
        }
        MeditationPhase::Induction => {
            "Follow the rhythm of your breath as the geometry begins to unfold. \
             Each exhale carries you a little deeper."
        }
        MeditationPhase::Deepening => {
            "Release the boundary between observer and pattern. \
             Let the frequencies move through you without resistance."
        }
        MeditationPhase::Expansion => {
            "Your awareness extends beyond the body, joining the wider field \
             of consciousness. Rest in that openness."
        }
        MeditationPhase::Integration => {
            "Gently gather what you have received. Return slowly, \
             carrying the stillness with you."
        }
    }
}

/// Guidance for all five phases in progression order
pub fn all_guidance() -> Vec<PhaseGuidance> {
    MeditationPhase::ORDERED
        .iter()
        .map(|&phase| PhaseGuidance {
            phase,
            guidance: guidance(phase),
        })
        .collect()
}
