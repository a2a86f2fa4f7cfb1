//! Core data model types for biasprobe.
//!
//! Evaluation runs (`Test`), the per-protocol outcomes recorded during a run
//! (`TestResult`), the read-only protocol catalog (`TestTemplate`), and
//! community reviews (`Review`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a stored [`Test`].
pub type TestId = u64;
/// Identifier of a stored [`TestResult`].
pub type ResultId = u64;
/// Identifier of a stored [`Review`].
pub type ReviewId = u64;
/// Identifier of a catalog [`TestTemplate`].
pub type TemplateId = u64;

/// Free-form JSON object attached to a test run.
pub type Details = serde_json::Map<String, serde_json::Value>;

/// Outcome of a single protocol within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Pass,
    Fail,
    /// Recorded but never produced by the run flow; counts as not-passing.
    Warning,
}

impl Outcome {
    pub fn is_pass(self) -> bool {
        self == Outcome::Pass
    }

    /// Verdict label shown next to a protocol in a report.
    pub fn verdict(self) -> &'static str {
        match self {
            Outcome::Pass => "Met Standards",
            Outcome::Fail | Outcome::Warning => "Potential Issues Found",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "PASS"),
            Outcome::Fail => write!(f, "FAIL"),
            Outcome::Warning => write!(f, "WARNING"),
        }
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pass" | "p" => Ok(Outcome::Pass),
            "fail" | "f" => Ok(Outcome::Fail),
            "warning" | "warn" | "w" => Ok(Outcome::Warning),
            other => Err(format!("unknown outcome: {other}")),
        }
    }
}

/// A finished evaluation run against a named app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Test {
    pub id: TestId,
    /// Name of the app that was evaluated.
    pub name: String,
    pub date: DateTime<Utc>,
    /// Aggregate score in `[0, 10]`.
    pub score: f64,
    pub test_type: String,
    /// Owning user id.
    pub user_id: String,
    #[serde(default)]
    pub details: Details,
}

/// One protocol outcome recorded for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub id: ResultId,
    pub test_id: TestId,
    pub template_id: TemplateId,
    pub result: Outcome,
    #[serde(default)]
    pub notes: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
}

/// A scripted evaluation protocol from the built-in catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestTemplate {
    pub id: TemplateId,
    /// Short protocol key used while running a session (e.g. `GENDER`).
    pub key: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub steps: Vec<String>,
    pub metrics: Vec<String>,
}

/// A community review of a named app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub app_name: String,
    /// Star rating, 1 through 5.
    pub rating: u8,
    pub comment: String,
    /// Display name of the reviewer.
    pub author: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Filter applied by [`crate::store::RecordStore::reviews`].
#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    /// Case-insensitive substring match on the app name.
    pub app_name: Option<String>,
    /// Exact match on the owning user.
    pub user_id: Option<String>,
}

impl ReviewFilter {
    pub fn for_app(app_name: impl Into<String>) -> Self {
        Self {
            app_name: Some(app_name.into()),
            user_id: None,
        }
    }

    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            app_name: None,
            user_id: Some(user_id.into()),
        }
    }

    /// Returns `true` if `review` passes every set criterion.
    pub fn matches(&self, review: &Review) -> bool {
        let app_ok = match &self.app_name {
            Some(needle) if !needle.is_empty() => review
                .app_name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        };
        let user_ok = self
            .user_id
            .as_ref()
            .map_or(true, |uid| &review.user_id == uid);
        app_ok && user_ok
    }
}
