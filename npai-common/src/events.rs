//! Session state and event types for the meditation phase engine
//!
//! The phase/status enums live here so both the service crate and the
//! database layer agree on the wire spelling. Events are appended to the
//! `meditation_session_events` table as `(event_type, payload)` pairs;
//! `SessionEvent` is the single source of truth for both fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Meditation session lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Draft,
    Running,
    Paused,
    Completed,
    /// Valid status in the schema, but no route ever sets it.
    /// The abort transition is intentionally unimplemented.
    Aborted,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Draft => write!(f, "draft"),
            SessionStatus::Running => write!(f, "running"),
            SessionStatus::Paused => write!(f, "paused"),
            SessionStatus::Completed => write!(f, "completed"),
            SessionStatus::Aborted => write!(f, "aborted"),
        }
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "draft" => Ok(SessionStatus::Draft),
            "running" => Ok(SessionStatus::Running),
            "paused" => Ok(SessionStatus::Paused),
            "completed" => Ok(SessionStatus::Completed),
            "aborted" => Ok(SessionStatus::Aborted),
            other => Err(format!("unknown session status: {}", other)),
        }
    }
}

/// The five meditation phases, in strict progression order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MeditationPhase {
    Preparation,
    Induction,
    Deepening,
    Expansion,
    Integration,
}

impl MeditationPhase {
    /// Ordered phase table. Progression is strictly linear and non-branching.
    pub const ORDERED: [MeditationPhase; 5] = [
        MeditationPhase::Preparation,
        MeditationPhase::Induction,
        MeditationPhase::Deepening,
        MeditationPhase::Expansion,
        MeditationPhase::Integration,
    ];

    /// Zero-based index into the ordered phase table
    pub fn index(&self) -> usize {
        match self {
            MeditationPhase::Preparation => 0,
            MeditationPhase::Induction => 1,
            MeditationPhase::Deepening => 2,
            MeditationPhase::Expansion => 3,
            MeditationPhase::Integration => 4,
        }
    }

    /// Next phase by table lookup, or None past the end
    pub fn next(&self) -> Option<MeditationPhase> {
        Self::ORDERED.get(self.index() + 1).copied()
    }

    /// Progress percentage: round((index + 1) / 5 * 100)
    pub fn progress_percent(&self) -> u32 {
        (((self.index() + 1) as f64 / Self::ORDERED.len() as f64) * 100.0).round() as u32
    }
}

impl std::fmt::Display for MeditationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeditationPhase::Preparation => write!(f, "preparation"),
            MeditationPhase::Induction => write!(f, "induction"),
            MeditationPhase::Deepening => write!(f, "deepening"),
            MeditationPhase::Expansion => write!(f, "expansion"),
            MeditationPhase::Integration => write!(f, "integration"),
        }
    }
}

impl std::str::FromStr for MeditationPhase {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "preparation" => Ok(MeditationPhase::Preparation),
            "induction" => Ok(MeditationPhase::Induction),
            "deepening" => Ok(MeditationPhase::Deepening),
            "expansion" => Ok(MeditationPhase::Expansion),
            "integration" => Ok(MeditationPhase::Integration),
            other => Err(format!("unknown meditation phase: {}", other)),
        }
    }
}

/// State-changing session actions, one appended log row each
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Session created and started
    SessionStarted {
        phase: MeditationPhase,
        intensity: f64,
        target_duration: i64,
        timestamp: DateTime<Utc>,
    },

    /// Phase advanced one step within a running session
    PhaseAdvanced {
        from_phase: MeditationPhase,
        to_phase: MeditationPhase,
        feedback: Option<String>,
        elapsed_minutes: i64,
        timestamp: DateTime<Utc>,
    },

    /// Final advance: session reached integration and completed
    SessionCompleted {
        from_phase: MeditationPhase,
        to_phase: MeditationPhase,
        feedback: Option<String>,
        actual_duration: i64,
        elapsed_minutes: i64,
        timestamp: DateTime<Utc>,
    },

    /// Session paused (idempotent; re-pausing logs again)
    SessionPaused {
        phase: Option<MeditationPhase>,
        elapsed_minutes: i64,
        timestamp: DateTime<Utc>,
    },

    /// Session resumed
    SessionResumed {
        phase: Option<MeditationPhase>,
        elapsed_minutes: i64,
        timestamp: DateTime<Utc>,
    },

    /// User feedback submitted, with the adaptation that was applied (if any)
    FeedbackReceived {
        feedback_type: String,
        value: f64,
        heart_rate: Option<f64>,
        previous_intensity: f64,
        new_intensity: f64,
        adaptation_applied: bool,
        timestamp: DateTime<Utc>,
    },
}

impl SessionEvent {
    /// Event type string stored in the `event_type` column
    pub fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::SessionStarted { .. } => "session_started",
            SessionEvent::PhaseAdvanced { .. } => "phase_advanced",
            SessionEvent::SessionCompleted { .. } => "session_completed",
            SessionEvent::SessionPaused { .. } => "session_paused",
            SessionEvent::SessionResumed { .. } => "session_resumed",
            SessionEvent::FeedbackReceived { .. } => "feedback_received",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order_is_fixed() {
        let mut phase = MeditationPhase::Preparation;
        let mut seen = vec![phase];
        while let Some(next) = phase.next() {
            seen.push(next);
            phase = next;
        }
        assert_eq!(seen, MeditationPhase::ORDERED.to_vec());
        assert_eq!(MeditationPhase::Integration.next(), None);
    }

    #[test]
    fn test_progress_percentages() {
        assert_eq!(MeditationPhase::Preparation.progress_percent(), 20);
        assert_eq!(MeditationPhase::Induction.progress_percent(), 40);
        assert_eq!(MeditationPhase::Deepening.progress_percent(), 60);
        assert_eq!(MeditationPhase::Expansion.progress_percent(), 80);
        assert_eq!(MeditationPhase::Integration.progress_percent(), 100);
    }

    #[test]
    fn test_status_round_trip() {
        for status in ["draft", "running", "paused", "completed", "aborted"] {
            let parsed: SessionStatus = status.parse().unwrap();
            assert_eq!(parsed.to_string(), status);
        }
        assert!("sleeping".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn test_event_type_strings() {
        let event = SessionEvent::SessionPaused {
            phase: Some(MeditationPhase::Deepening),
            elapsed_minutes: 3,
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type(), "session_paused");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "session_paused");
        assert_eq!(json["phase"], "deepening");
    }
}
