//! Session engine: start, phase advance, pause/resume, feedback, current
//!
//! Every operation that references a session by id verifies ownership;
//! absence and not-owned are both reported as not-found, never a silent
//! success. Each state-changing operation appends one event row. Operations
//! are single-writer, single-row mutations; persistence failures propagate
//! to the caller without retry.

use crate::error::{Error, Result};
use crate::session::adaptive::{self, FeedbackType};
use crate::session::phases::{self, MeditationPhase, PhaseGuidance, SessionStatus};
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use npai_common::db::models::{MeditationSession, SessionEventRecord};
use npai_common::events::SessionEvent;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Intensity midpoint of the 1-10 scale, assigned at session start
const DEFAULT_INTENSITY: f64 = 5.0;

/// Seconds; applied when the client omits a target duration
const DEFAULT_TARGET_DURATION: i64 = 1200;

const MIN_TARGET_DURATION: i64 = 60;
const MAX_TARGET_DURATION: i64 = 7200;

/// Number of events returned alongside the current session
const RECENT_EVENT_LIMIT: usize = 5;

/// Parameters for starting a session
#[derive(Debug, Clone, Default)]
pub struct StartRequest {
    pub meditation_id: Option<String>,
    pub soundscape_id: Option<String>,
    pub neural_pattern_id: Option<String>,
    pub target_duration: Option<i64>,
    pub config: Option<Value>,
}

/// A freshly started session plus the static guidance list
#[derive(Debug, Clone)]
pub struct StartedSession {
    pub session: MeditationSession,
    pub guidance: Vec<PhaseGuidance>,
}

/// Outcome of a phase advance
#[derive(Debug, Clone)]
pub struct PhaseAdvance {
    pub session_id: String,
    pub status: SessionStatus,
    pub phase: MeditationPhase,
    pub progress_percent: u32,
    pub completed: bool,
    pub actual_duration: Option<i64>,
}

/// One feedback submission
#[derive(Debug, Clone)]
pub struct FeedbackSubmission {
    pub feedback_type: String,
    pub value: f64,
    pub heart_rate: Option<f64>,
}

/// Outcome of a feedback submission
#[derive(Debug, Clone)]
pub struct FeedbackResult {
    pub adaptation_applied: bool,
    pub intensity: f64,
}

/// The caller's running session with recent history
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub session: MeditationSession,
    pub progress_percent: u32,
    pub recent_events: Vec<SessionEventRecord>,
}

/// Meditation session phase engine
pub struct SessionEngine {
    storage: Arc<dyn Storage>,
}

impl SessionEngine {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Begin a session for the user in status `running`, phase
    /// `preparation`, intensity at the scale midpoint.
    pub async fn start(&self, user_id: &str, req: StartRequest) -> Result<StartedSession> {
        let target_duration = req.target_duration.unwrap_or(DEFAULT_TARGET_DURATION);
        if !(MIN_TARGET_DURATION..=MAX_TARGET_DURATION).contains(&target_duration) {
            return Err(Error::Validation(format!(
                "target_duration must be between {} and {} seconds",
                MIN_TARGET_DURATION, MAX_TARGET_DURATION
            )));
        }

        if self.storage.get_running_session(user_id).await?.is_some() {
            return Err(Error::Conflict(
                "An active meditation session already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let session = MeditationSession {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            meditation_id: req.meditation_id,
            soundscape_id: req.soundscape_id,
            neural_pattern_id: req.neural_pattern_id,
            status: SessionStatus::Running,
            current_phase: Some(MeditationPhase::Preparation),
            intensity: DEFAULT_INTENSITY,
            target_duration,
            actual_duration: None,
            started_at: now,
            ended_at: None,
            config: req.config,
        };

        // The storage layer re-checks the running invariant at insert;
        // a racing start surfaces here as a conflict rather than a 500.
        let session = self.storage.create_session(session).await.map_err(|e| match e {
            npai_common::Error::InvalidInput(_) => Error::Conflict(
                "An active meditation session already exists".to_string(),
            ),
            other => other.into(),
        })?;

        self.storage
            .append_session_event(
                &session.id,
                &SessionEvent::SessionStarted {
                    phase: MeditationPhase::Preparation,
                    intensity: session.intensity,
                    target_duration: session.target_duration,
                    timestamp: now,
                },
            )
            .await?;

        info!(
            session_id = %session.id,
            user_id = %user_id,
            target_duration,
            "Meditation session started"
        );

        Ok(StartedSession {
            session,
            guidance: phases::all_guidance(),
        })
    }

    /// Advance the session one phase; advancing from `expansion` completes
    /// the session with the phase pinned at `integration`.
    pub async fn advance_phase(
        &self,
        user_id: &str,
        session_id: &str,
        feedback: Option<String>,
    ) -> Result<PhaseAdvance> {
        let mut session = self.owned_session(session_id, user_id).await?;

        if session.status != SessionStatus::Running {
            return Err(Error::InvalidState(format!(
                "Cannot advance phase: session is {}",
                session.status
            )));
        }

        let current = session.current_phase.ok_or_else(|| {
            Error::InvalidState("Session has no active phase".to_string())
        })?;
        let next = current.next().ok_or_else(|| {
            Error::InvalidState("Session has no further phase".to_string())
        })?;

        let now = Utc::now();
        let elapsed_minutes = elapsed_minutes(session.started_at, now);

        let completed = next == MeditationPhase::Integration;
        if completed {
            let actual_duration = (now - session.started_at).num_seconds();
            session.status = SessionStatus::Completed;
            session.current_phase = Some(MeditationPhase::Integration);
            session.ended_at = Some(now);
            session.actual_duration = Some(actual_duration);
            self.storage.update_session(&session).await?;

            self.storage
                .append_session_event(
                    &session.id,
                    &SessionEvent::SessionCompleted {
                        from_phase: current,
                        to_phase: MeditationPhase::Integration,
                        feedback,
                        actual_duration,
                        elapsed_minutes,
                        timestamp: now,
                    },
                )
                .await?;

            info!(session_id = %session.id, actual_duration, "Meditation session completed");
        } else {
            session.current_phase = Some(next);
            self.storage.update_session(&session).await?;

            self.storage
                .append_session_event(
                    &session.id,
                    &SessionEvent::PhaseAdvanced {
                        from_phase: current,
                        to_phase: next,
                        feedback,
                        elapsed_minutes,
                        timestamp: now,
                    },
                )
                .await?;

            info!(session_id = %session.id, from = %current, to = %next, "Phase advanced");
        }

        let phase = session.current_phase.unwrap_or(next);
        Ok(PhaseAdvance {
            session_id: session.id,
            status: session.status,
            phase,
            progress_percent: phase.progress_percent(),
            completed,
            actual_duration: session.actual_duration,
        })
    }

    /// Pause without touching the current phase. Pausing an already-paused
    /// session succeeds and logs again (idempotent toggle, not enforced).
    pub async fn pause(&self, user_id: &str, session_id: &str) -> Result<MeditationSession> {
        let mut session = self.owned_session(session_id, user_id).await?;
        self.ensure_pausable(&session)?;

        let now = Utc::now();
        session.status = SessionStatus::Paused;
        self.storage.update_session(&session).await?;
        self.storage
            .append_session_event(
                &session.id,
                &SessionEvent::SessionPaused {
                    phase: session.current_phase,
                    elapsed_minutes: elapsed_minutes(session.started_at, now),
                    timestamp: now,
                },
            )
            .await?;

        info!(session_id = %session.id, "Meditation session paused");
        Ok(session)
    }

    /// Resume a paused session; the mirror of [`Self::pause`].
    pub async fn resume(&self, user_id: &str, session_id: &str) -> Result<MeditationSession> {
        let mut session = self.owned_session(session_id, user_id).await?;
        self.ensure_pausable(&session)?;

        let now = Utc::now();
        session.status = SessionStatus::Running;
        self.storage.update_session(&session).await?;
        self.storage
            .append_session_event(
                &session.id,
                &SessionEvent::SessionResumed {
                    phase: session.current_phase,
                    elapsed_minutes: elapsed_minutes(session.started_at, now),
                    timestamp: now,
                },
            )
            .await?;

        info!(session_id = %session.id, "Meditation session resumed");
        Ok(session)
    }

    /// Apply one feedback submission. Existence and ownership are checked;
    /// run state is not a precondition.
    pub async fn submit_feedback(
        &self,
        user_id: &str,
        session_id: &str,
        submission: FeedbackSubmission,
    ) -> Result<FeedbackResult> {
        let feedback_type: FeedbackType = submission
            .feedback_type
            .parse()
            .map_err(Error::Validation)?;

        if !(1.0..=10.0).contains(&submission.value) {
            return Err(Error::Validation(
                "Feedback value must be between 1 and 10".to_string(),
            ));
        }

        let mut session = self.owned_session(session_id, user_id).await?;

        let previous_intensity = session.intensity;
        let adjusted = adaptive::adjust_intensity(
            previous_intensity,
            feedback_type,
            submission.value,
            submission.heart_rate,
        );

        let adaptation_applied = adjusted.is_some();
        if let Some(new_intensity) = adjusted {
            session.intensity = new_intensity;
            self.storage.update_session(&session).await?;
        }

        self.storage
            .append_session_event(
                &session.id,
                &SessionEvent::FeedbackReceived {
                    feedback_type: feedback_type.to_string(),
                    value: submission.value,
                    heart_rate: submission.heart_rate,
                    previous_intensity,
                    new_intensity: session.intensity,
                    adaptation_applied,
                    timestamp: Utc::now(),
                },
            )
            .await?;

        info!(
            session_id = %session.id,
            feedback_type = %feedback_type,
            adaptation_applied,
            intensity = session.intensity,
            "Feedback received"
        );

        Ok(FeedbackResult {
            adaptation_applied,
            intensity: session.intensity,
        })
    }

    /// The user's running session with its recent event trail, if any
    pub async fn current(&self, user_id: &str) -> Result<Option<CurrentSession>> {
        let Some(session) = self.storage.get_running_session(user_id).await? else {
            return Ok(None);
        };

        let recent_events = self
            .storage
            .recent_session_events(&session.id, RECENT_EVENT_LIMIT)
            .await?;

        let progress_percent = session
            .current_phase
            .map(|p| p.progress_percent())
            .unwrap_or(0);

        Ok(Some(CurrentSession {
            session,
            progress_percent,
            recent_events,
        }))
    }

    /// Fetch a session and verify the caller owns it. Mismatch and absence
    /// are indistinguishable to the caller.
    async fn owned_session(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<MeditationSession> {
        match self.storage.get_session(session_id).await? {
            Some(session) if session.user_id == user_id => Ok(session),
            _ => Err(Error::NotFound("Meditation session not found".to_string())),
        }
    }

    /// Pause/resume are only meaningful before the session reaches a
    /// terminal status
    fn ensure_pausable(&self, session: &MeditationSession) -> Result<()> {
        match session.status {
            SessionStatus::Running | SessionStatus::Paused => Ok(()),
            other => Err(Error::InvalidState(format!(
                "Cannot pause or resume session in status {}",
                other
            ))),
        }
    }
}

fn elapsed_minutes(started_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    ((now - started_at).num_seconds() as f64 / 60.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemStorage;

    fn engine() -> SessionEngine {
        SessionEngine::new(Arc::new(MemStorage::new()))
    }

    #[tokio::test]
    async fn test_start_defaults() {
        let engine = engine();
        let started = engine.start("u1", StartRequest::default()).await.unwrap();

        assert_eq!(started.session.status, SessionStatus::Running);
        assert_eq!(
            started.session.current_phase,
            Some(MeditationPhase::Preparation)
        );
        assert_eq!(started.session.intensity, 5.0);
        assert_eq!(started.session.target_duration, 1200);
        assert_eq!(started.guidance.len(), 5);
    }

    #[tokio::test]
    async fn test_start_rejects_out_of_range_duration() {
        let engine = engine();
        for bad in [0, 59, 7201, -100] {
            let err = engine
                .start(
                    "u1",
                    StartRequest {
                        target_duration: Some(bad),
                        ..Default::default()
                    },
                )
                .await;
            assert!(matches!(err, Err(Error::Validation(_))), "duration {}", bad);
        }
        // No session row was created along the way
        assert!(engine.current("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_start_conflicts_with_running_session() {
        let engine = engine();
        engine.start("u1", StartRequest::default()).await.unwrap();

        let err = engine.start("u1", StartRequest::default()).await;
        assert!(matches!(err, Err(Error::Conflict(_))));

        // A different user is unaffected
        engine.start("u2", StartRequest::default()).await.unwrap();
    }

    #[tokio::test]
    async fn test_full_phase_progression() {
        let engine = engine();
        let started = engine.start("u1", StartRequest::default()).await.unwrap();
        let id = started.session.id.clone();

        let expected = [
            (MeditationPhase::Induction, 40, false),
            (MeditationPhase::Deepening, 60, false),
            (MeditationPhase::Expansion, 80, false),
            (MeditationPhase::Integration, 100, true),
        ];

        for (phase, progress, completed) in expected {
            let advance = engine.advance_phase("u1", &id, None).await.unwrap();
            assert_eq!(advance.phase, phase);
            assert_eq!(advance.progress_percent, progress);
            assert_eq!(advance.completed, completed);
        }

        // Terminal: a further advance is a state error
        let err = engine.advance_phase("u1", &id, None).await;
        assert!(matches!(err, Err(Error::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_completion_sets_duration_and_end_time() {
        let engine = engine();
        let id = engine
            .start("u1", StartRequest::default())
            .await
            .unwrap()
            .session
            .id;

        let mut last = None;
        for _ in 0..4 {
            last = Some(engine.advance_phase("u1", &id, None).await.unwrap());
        }
        let last = last.unwrap();
        assert_eq!(last.status, SessionStatus::Completed);
        assert!(last.actual_duration.is_some());
        assert!(last.actual_duration.unwrap() >= 0);

        // Completed sessions no longer show up as current
        assert!(engine.current("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_advance_requires_ownership() {
        let engine = engine();
        let id = engine
            .start("u1", StartRequest::default())
            .await
            .unwrap()
            .session
            .id;

        let err = engine.advance_phase("u2", &id, None).await;
        assert!(matches!(err, Err(Error::NotFound(_))));

        let err = engine.advance_phase("u1", "nope", None).await;
        assert!(matches!(err, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_pause_resume_toggle_and_idempotency() {
        let engine = engine();
        let id = engine
            .start("u1", StartRequest::default())
            .await
            .unwrap()
            .session
            .id;

        let paused = engine.pause("u1", &id).await.unwrap();
        assert_eq!(paused.status, SessionStatus::Paused);
        assert_eq!(paused.current_phase, Some(MeditationPhase::Preparation));

        // Double-pause is not rejected
        let paused_again = engine.pause("u1", &id).await.unwrap();
        assert_eq!(paused_again.status, SessionStatus::Paused);

        // Advancing a paused session is a state error
        let err = engine.advance_phase("u1", &id, None).await;
        assert!(matches!(err, Err(Error::InvalidState(_))));

        let resumed = engine.resume("u1", &id).await.unwrap();
        assert_eq!(resumed.status, SessionStatus::Running);
    }

    #[tokio::test]
    async fn test_pause_completed_session_fails() {
        let engine = engine();
        let id = engine
            .start("u1", StartRequest::default())
            .await
            .unwrap()
            .session
            .id;
        for _ in 0..4 {
            engine.advance_phase("u1", &id, None).await.unwrap();
        }

        assert!(matches!(
            engine.pause("u1", &id).await,
            Err(Error::InvalidState(_))
        ));
        assert!(matches!(
            engine.resume("u1", &id).await,
            Err(Error::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_feedback_adjusts_and_persists_intensity() {
        let engine = engine();
        let id = engine
            .start("u1", StartRequest::default())
            .await
            .unwrap()
            .session
            .id;

        let result = engine
            .submit_feedback(
                "u1",
                &id,
                FeedbackSubmission {
                    feedback_type: "comfort".to_string(),
                    value: 2.0,
                    heart_rate: None,
                },
            )
            .await
            .unwrap();

        assert!(result.adaptation_applied);
        assert!((result.intensity - 4.1).abs() < 1e-9);

        let current = engine.current("u1").await.unwrap().unwrap();
        assert!((current.session.intensity - 4.1).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_feedback_without_matching_rule_applies_nothing() {
        let engine = engine();
        let id = engine
            .start("u1", StartRequest::default())
            .await
            .unwrap()
            .session
            .id;

        let result = engine
            .submit_feedback(
                "u1",
                &id,
                FeedbackSubmission {
                    feedback_type: "focus".to_string(),
                    value: 3.0,
                    heart_rate: None,
                },
            )
            .await
            .unwrap();

        assert!(!result.adaptation_applied);
        assert_eq!(result.intensity, 5.0);
    }

    #[tokio::test]
    async fn test_feedback_validation() {
        let engine = engine();
        let id = engine
            .start("u1", StartRequest::default())
            .await
            .unwrap()
            .session
            .id;

        let err = engine
            .submit_feedback(
                "u1",
                &id,
                FeedbackSubmission {
                    feedback_type: "serenity".to_string(),
                    value: 5.0,
                    heart_rate: None,
                },
            )
            .await;
        assert!(matches!(err, Err(Error::Validation(_))));

        let err = engine
            .submit_feedback(
                "u1",
                &id,
                FeedbackSubmission {
                    feedback_type: "difficulty".to_string(),
                    value: 11.0,
                    heart_rate: None,
                },
            )
            .await;
        assert!(matches!(err, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_current_includes_recent_events() {
        let engine = engine();
        let id = engine
            .start("u1", StartRequest::default())
            .await
            .unwrap()
            .session
            .id;
        engine.advance_phase("u1", &id, None).await.unwrap();
        engine.pause("u1", &id).await.unwrap();
        engine.resume("u1", &id).await.unwrap();

        let current = engine.current("u1").await.unwrap().unwrap();
        assert_eq!(current.progress_percent, 40);
        assert_eq!(current.recent_events.len(), 4);
        // Newest first
        assert_eq!(current.recent_events[0].event_type, "session_resumed");
        assert_eq!(current.recent_events[3].event_type, "session_started");
    }
}
