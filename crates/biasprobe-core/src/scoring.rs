//! Protocol scoring and risk bands.
//!
//! The score is the share of passing protocols scaled to 0–10. There is no
//! weighting and no partial credit: anything other than PASS counts against
//! the app, including the placeholder WARNING outcome.

use serde::{Deserialize, Serialize};

use crate::model::Outcome;

/// Maximum score an app can receive.
pub const MAX_SCORE: f64 = 10.0;

/// Compute the 0–10 score for a set of outcomes.
///
/// Returns `None` when there are no outcomes; callers decide what an empty
/// run is worth.
pub fn score<'a>(outcomes: impl IntoIterator<Item = &'a Outcome>) -> Option<f64> {
    let (passed, total) = tally(outcomes);
    if total == 0 {
        return None;
    }
    Some(passed as f64 / total as f64 * MAX_SCORE)
}

/// Whole-number pass percentage (0–100, rounded down); 0 when empty.
pub fn percentage<'a>(outcomes: impl IntoIterator<Item = &'a Outcome>) -> u32 {
    let (passed, total) = tally(outcomes);
    if total == 0 {
        return 0;
    }
    (passed as f64 / total as f64 * 100.0).floor() as u32
}

fn tally<'a>(outcomes: impl IntoIterator<Item = &'a Outcome>) -> (usize, usize) {
    outcomes
        .into_iter()
        .fold((0, 0), |(passed, total), o| {
            (passed + usize::from(o.is_pass()), total + 1)
        })
}

/// Risk band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    /// 8 and above.
    Good,
    /// 5 up to 8.
    Moderate,
    /// Below 5.
    HighRisk,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> Self {
        if score >= 8.0 {
            ScoreBand::Good
        } else if score >= 5.0 {
            ScoreBand::Moderate
        } else {
            ScoreBand::HighRisk
        }
    }

    /// Display color as a hex string.
    pub fn color(self) -> &'static str {
        match self {
            ScoreBand::Good => "#4CAF50",
            ScoreBand::Moderate => "#FFC107",
            ScoreBand::HighRisk => "#F44336",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Good => "good",
            ScoreBand::Moderate => "moderate",
            ScoreBand::HighRisk => "high risk",
        }
    }
}

/// Recommendation text for an optional score.
pub fn recommendation(score: Option<f64>) -> &'static str {
    match score.map(ScoreBand::for_score) {
        None => "No assessment data available",
        Some(ScoreBand::Good) => "Meets UNESCO standards for ethical AI in education",
        Some(ScoreBand::Moderate) => "Moderate risk - Use with monitoring and safeguards",
        Some(ScoreBand::HighRisk) => "High risk - Not recommended for educational use",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Outcome::{Fail, Pass, Warning};

    #[test]
    fn two_of_three_passing() {
        let s = score(&[Pass, Pass, Fail]).unwrap();
        assert!((s - 20.0 / 3.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn empty_has_no_score() {
        let none: &[Outcome] = &[];
        assert_eq!(score(none), None);
        assert_eq!(percentage(none), 0);
    }

    #[test]
    fn all_pass_and_all_fail() {
        assert_eq!(score(&[Pass, Pass]), Some(10.0));
        assert_eq!(score(&[Fail]), Some(0.0));
    }

    #[test]
    fn warning_counts_as_not_passing() {
        assert_eq!(score(&[Pass, Warning]), Some(5.0));
    }

    #[test]
    fn percentage_rounds_down() {
        assert_eq!(percentage(&[Pass, Pass, Fail]), 66);
        assert_eq!(percentage(&[Pass]), 100);
    }

    #[test]
    fn bands_and_recommendations() {
        assert_eq!(ScoreBand::for_score(10.0), ScoreBand::Good);
        assert_eq!(ScoreBand::for_score(8.0), ScoreBand::Good);
        assert_eq!(ScoreBand::for_score(6.67), ScoreBand::Moderate);
        assert_eq!(ScoreBand::for_score(5.0), ScoreBand::Moderate);
        assert_eq!(ScoreBand::for_score(3.3), ScoreBand::HighRisk);
        assert_eq!(ScoreBand::HighRisk.color(), "#F44336");

        assert_eq!(recommendation(None), "No assessment data available");
        assert!(recommendation(Some(9.0)).starts_with("Meets"));
        assert!(recommendation(Some(5.0)).starts_with("Moderate"));
        assert!(recommendation(Some(0.0)).starts_with("High risk"));
    }
}
