//! Adaptive intensity adjustment from session feedback
//!
//! Rule semantics are carried over from the original behavior unchanged:
//! every triggered rule computes from the *stored* intensity and assigns the
//! same result slot, so within a single submission a later rule overwrites
//! an earlier one rather than compounding with it. The final value is
//! clamped to [1, 10].

use std::str::FromStr;

/// Accepted feedback categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackType {
    Difficulty,
    Comfort,
    Focus,
    Relaxation,
}

impl FromStr for FeedbackType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "difficulty" => Ok(FeedbackType::Difficulty),
            "comfort" => Ok(FeedbackType::Comfort),
            "focus" => Ok(FeedbackType::Focus),
            "relaxation" => Ok(FeedbackType::Relaxation),
            other => Err(format!("unknown feedback type: {}", other)),
        }
    }
}

impl std::fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackType::Difficulty => write!(f, "difficulty"),
            FeedbackType::Comfort => write!(f, "comfort"),
            FeedbackType::Focus => write!(f, "focus"),
            FeedbackType::Relaxation => write!(f, "relaxation"),
        }
    }
}

pub const MIN_INTENSITY: f64 = 1.0;
pub const MAX_INTENSITY: f64 = 10.0;

/// Resting heart rate the biometric rule measures deviation from
const BASELINE_HEART_RATE: f64 = 65.0;

/// Compute the adjusted intensity for one feedback submission, or None when
/// no rule fired.
///
/// `value` is expected in [1, 10] (validated by the caller).
pub fn adjust_intensity(
    current: f64,
    feedback_type: FeedbackType,
    value: f64,
    heart_rate: Option<f64>,
) -> Option<f64> {
    let mut adjusted = None;

    match feedback_type {
        FeedbackType::Difficulty => {
            adjusted = Some(current + (value - 5.0) * 0.5);
        }
        FeedbackType::Comfort if value < 5.0 => {
            adjusted = Some(current - (5.0 - value) * 0.3);
        }
        // Focus and relaxation feedback are recorded but trigger no
        // adjustment rule.
        _ => {}
    }

    if let Some(hr) = heart_rate {
        let deviation = (hr - BASELINE_HEART_RATE).abs();
        if deviation > 20.0 {
            // Computes from the stored intensity, overwriting any
            // same-call difficulty/comfort adjustment above.
            adjusted = Some(current - (deviation / 20.0).min(2.0));
        }
    }

    adjusted.map(|v| v.clamp(MIN_INTENSITY, MAX_INTENSITY))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_difficulty_scales_around_midpoint() {
        // value 5 is neutral: rule fires but moves nothing
        assert!(approx(
            adjust_intensity(5.0, FeedbackType::Difficulty, 5.0, None).unwrap(),
            5.0
        ));
        // value 10 raises by 2.5
        assert!(approx(
            adjust_intensity(5.0, FeedbackType::Difficulty, 10.0, None).unwrap(),
            7.5
        ));
        // value 1 lowers by 2.0
        assert!(approx(
            adjust_intensity(5.0, FeedbackType::Difficulty, 1.0, None).unwrap(),
            3.0
        ));
    }

    #[test]
    fn test_comfort_only_fires_below_midpoint() {
        assert!(approx(
            adjust_intensity(5.0, FeedbackType::Comfort, 2.0, None).unwrap(),
            4.1
        ));
        assert!(adjust_intensity(5.0, FeedbackType::Comfort, 5.0, None).is_none());
        assert!(adjust_intensity(5.0, FeedbackType::Comfort, 9.0, None).is_none());
    }

    #[test]
    fn test_focus_and_relaxation_record_only() {
        assert!(adjust_intensity(5.0, FeedbackType::Focus, 1.0, None).is_none());
        assert!(adjust_intensity(5.0, FeedbackType::Relaxation, 10.0, None).is_none());
    }

    #[test]
    fn test_heart_rate_rule_thresholds() {
        // Deviation of exactly 20 does not trigger
        assert!(adjust_intensity(5.0, FeedbackType::Focus, 5.0, Some(85.0)).is_none());
        // Deviation of 30 subtracts 1.5
        assert!(approx(
            adjust_intensity(5.0, FeedbackType::Focus, 5.0, Some(95.0)).unwrap(),
            3.5
        ));
        // Subtraction is capped at 2
        assert!(approx(
            adjust_intensity(8.0, FeedbackType::Focus, 5.0, Some(165.0)).unwrap(),
            6.0
        ));
        // Low heart rates deviate too
        assert!(approx(
            adjust_intensity(5.0, FeedbackType::Focus, 5.0, Some(35.0)).unwrap(),
            3.5
        ));
    }

    #[test]
    fn test_heart_rate_overwrites_earlier_rule_in_same_call() {
        // Difficulty alone would give 5 + 2.5 = 7.5; the biometric rule
        // overwrites from the stored intensity: 5 - 1.5 = 3.5
        assert!(approx(
            adjust_intensity(5.0, FeedbackType::Difficulty, 10.0, Some(95.0)).unwrap(),
            3.5
        ));
    }

    #[test]
    fn test_result_clamped_to_bounds() {
        // 10 + 2.5 clamps to 10
        assert!(approx(
            adjust_intensity(10.0, FeedbackType::Difficulty, 10.0, None).unwrap(),
            10.0
        ));
        // 1 - 1.2 clamps to 1
        assert!(approx(
            adjust_intensity(1.0, FeedbackType::Comfort, 1.0, None).unwrap(),
            1.0
        ));
    }

    #[test]
    fn test_feedback_type_parsing() {
        assert_eq!(
            "difficulty".parse::<FeedbackType>().unwrap(),
            FeedbackType::Difficulty
        );
        assert!("serenity".parse::<FeedbackType>().is_err());
    }
}
