//! Assessment reports with JSON persistence.
//!
//! A report is built either from a stored run or from the inline results
//! blob a session produces (`{"protocols": [...], "results": {...}}`).

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Outcome, Test, TestId};
use crate::scoring::{self, ScoreBand};
use crate::store::RecordStore;

/// Methodology note printed at the foot of every rendered report.
pub const METHODOLOGY: &str = "Assessment based on UNESCO's AI Education Guidelines and OECD AI \
Principles. Tests evaluate for bias, fairness, and transparency in educational AI systems.";

/// Where a report's data comes from.
#[derive(Debug, Clone)]
pub enum ReportSource {
    /// A run already in the store.
    Stored { test_id: TestId },
    /// A JSON results blob that was never stored.
    Inline(String),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid inline results: {0}")]
    InvalidInline(#[from] serde_json::Error),
}

/// Inline results blob.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InlineResults {
    #[serde(default)]
    pub protocols: Vec<String>,
    #[serde(default)]
    pub results: BTreeMap<String, Outcome>,
}

/// One protocol row of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolLine {
    pub key: String,
    pub title: String,
    pub outcome: Outcome,
    pub verdict: String,
    #[serde(default)]
    pub notes: String,
}

/// A rendered-ready assessment of one app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub created_at: DateTime<Utc>,
    /// The stored run, when the report came from the store.
    #[serde(default)]
    pub test: Option<Test>,
    #[serde(default)]
    pub app_name: Option<String>,
    /// `None` when there was nothing to assess.
    pub score: Option<f64>,
    #[serde(default)]
    pub band: Option<ScoreBand>,
    pub recommendation: String,
    #[serde(default)]
    pub lines: Vec<ProtocolLine>,
}

impl AssessmentReport {
    /// Build a report for `owner_id` from `source`.
    pub fn build(
        store: &RecordStore,
        owner_id: &str,
        source: &ReportSource,
    ) -> Result<Self, ReportError> {
        match source {
            ReportSource::Stored { test_id } => Ok(Self::from_stored(store, *test_id, owner_id)),
            ReportSource::Inline(json) => Self::from_inline(store, json),
        }
    }

    /// Report on a stored run. A missing run yields an empty report.
    pub fn from_stored(store: &RecordStore, test_id: TestId, owner_id: &str) -> Self {
        let Some(test) = store.test_by_id(test_id, owner_id) else {
            debug!(test_id, "no stored test for report");
            return Self::assemble(None, None, None, Vec::new());
        };

        let lines = store
            .test_results(test_id, owner_id)
            .into_iter()
            .map(|r| {
                let (key, title) = store
                    .template_by_id(r.template_id)
                    .map(|t| (t.key.clone(), t.title.clone()))
                    .unwrap_or_else(|| {
                        let id = r.template_id.to_string();
                        (id.clone(), id)
                    });
                line(key, title, r.result, r.notes)
            })
            .collect();

        let app_name = Some(test.name.clone());
        let score = Some(test.score);
        Self::assemble(Some(test), app_name, score, lines)
    }

    /// Report on an inline results blob.
    pub fn from_inline(store: &RecordStore, json: &str) -> Result<Self, ReportError> {
        let inline: InlineResults = serde_json::from_str(json)?;
        Ok(Self::from_results(store, None, &inline))
    }

    /// Report on already-parsed inline results, optionally naming the app.
    pub fn from_results(
        store: &RecordStore,
        app_name: Option<String>,
        inline: &InlineResults,
    ) -> Self {
        // Catalog protocols first, in catalog order, then anything unknown.
        let mut lines: Vec<ProtocolLine> = store
            .templates()
            .iter()
            .filter_map(|t| {
                inline
                    .results
                    .get(&t.key)
                    .map(|o| line(t.key.clone(), t.title.clone(), *o, String::new()))
            })
            .collect();
        for (key, outcome) in &inline.results {
            if store.template_by_key(key).is_none() {
                warn!(protocol = %key, "inline results reference an unknown protocol");
                lines.push(line(key.clone(), key.clone(), *outcome, String::new()));
            }
        }

        let score = scoring::score(inline.results.values());
        Self::assemble(None, app_name, score, lines)
    }

    fn assemble(
        test: Option<Test>,
        app_name: Option<String>,
        score: Option<f64>,
        lines: Vec<ProtocolLine>,
    ) -> Self {
        Self {
            created_at: Utc::now(),
            test,
            app_name,
            score,
            band: score.map(ScoreBand::for_score),
            recommendation: scoring::recommendation(score).to_string(),
            lines,
        }
    }

    /// Number of protocols that met standards.
    pub fn passed(&self) -> usize {
        self.lines.iter().filter(|l| l.outcome.is_pass()).count()
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AssessmentReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

fn line(key: String, title: String, outcome: Outcome, notes: String) -> ProtocolLine {
    ProtocolLine {
        key,
        title,
        outcome,
        verdict: outcome.verdict().to_string(),
        notes,
    }
}
