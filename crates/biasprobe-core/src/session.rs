//! An evaluation run in progress.
//!
//! A session collects one outcome per protocol for a single app. Recording
//! the same protocol twice keeps the latest outcome. Finishing writes the
//! run and its results to the store in one go.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use tracing::info;

use crate::error::StoreError;
use crate::model::{Details, Outcome, TemplateId, TestId};
use crate::scoring;
use crate::store::RecordStore;

/// Test type recorded for runs created through a session.
pub const SESSION_TEST_TYPE: &str = "bias-protocols";

/// One recorded protocol outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedOutcome {
    pub key: String,
    pub outcome: Outcome,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct RunSession {
    app_name: String,
    // Keyed by template id so iteration follows catalog order.
    outcomes: BTreeMap<TemplateId, RecordedOutcome>,
}

impl RunSession {
    /// Start a run against `app_name`.
    pub fn new(app_name: &str) -> Result<Self, StoreError> {
        let app_name = app_name.trim();
        if app_name.is_empty() {
            return Err(StoreError::Validation {
                field: "name",
                message: "app name is required".into(),
            });
        }
        Ok(Self {
            app_name: app_name.to_string(),
            outcomes: BTreeMap::new(),
        })
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Record the outcome of the protocol identified by `key`.
    pub fn record(
        &mut self,
        store: &RecordStore,
        key: &str,
        outcome: Outcome,
        notes: &str,
    ) -> Result<(), StoreError> {
        let template = store.template_by_key(key).ok_or_else(|| StoreError::Validation {
            field: "protocol",
            message: format!("unknown protocol '{}'", key.trim()),
        })?;
        self.outcomes.insert(
            template.id,
            RecordedOutcome {
                key: template.key.clone(),
                outcome,
                notes: notes.trim().to_string(),
            },
        );
        Ok(())
    }

    /// Recorded outcomes in catalog order.
    pub fn outcomes(&self) -> impl Iterator<Item = (TemplateId, &RecordedOutcome)> {
        self.outcomes.iter().map(|(id, o)| (*id, o))
    }

    /// `(recorded, available)` protocol counts.
    pub fn progress(&self, store: &RecordStore) -> (usize, usize) {
        (self.outcomes.len(), store.templates().len())
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Score of the outcomes recorded so far; an empty session scores 0.
    pub fn score(&self) -> f64 {
        scoring::score(self.outcomes.values().map(|o| &o.outcome)).unwrap_or(0.0)
    }

    /// The inline results blob: every catalog protocol key plus the recorded
    /// outcome per key.
    pub fn details(&self, store: &RecordStore) -> Details {
        let protocols: Vec<Value> = store
            .templates()
            .iter()
            .map(|t| Value::String(t.key.clone()))
            .collect();
        let results: serde_json::Map<String, Value> = self
            .outcomes
            .values()
            .map(|o| (o.key.clone(), json!(o.outcome)))
            .collect();

        let mut details = Details::new();
        details.insert("protocols".into(), Value::Array(protocols));
        details.insert("results".into(), Value::Object(results));
        details
    }

    /// Write the run and one result per recorded protocol to `store`.
    pub fn finish(self, store: &mut RecordStore, owner_id: &str) -> Result<TestId, StoreError> {
        let score = self.score();
        let details = self.details(store);
        let test_id = store.add_test(&self.app_name, score, SESSION_TEST_TYPE, owner_id, details)?;

        for (template_id, recorded) in &self.outcomes {
            store.add_test_result(
                test_id,
                *template_id,
                recorded.outcome,
                owner_id,
                &recorded.notes,
            )?;
        }

        info!(
            test_id,
            app = %self.app_name,
            recorded = self.outcomes.len(),
            score,
            "finished evaluation run"
        );
        Ok(test_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_blank_app() {
        assert!(RunSession::new("  ").unwrap_err().is_validation());
        assert_eq!(RunSession::new(" Tutor ").unwrap().app_name(), "Tutor");
    }

    #[test]
    fn record_rejects_unknown_protocol() {
        let store = RecordStore::new();
        let mut session = RunSession::new("App").unwrap();
        let err = session
            .record(&store, "AGE", Outcome::Pass, "")
            .unwrap_err();
        assert!(err.is_validation());
        assert!(session.is_empty());
    }

    #[test]
    fn rerecording_keeps_latest_outcome() {
        let store = RecordStore::new();
        let mut session = RunSession::new("App").unwrap();
        session.record(&store, "gender", Outcome::Fail, "first").unwrap();
        session.record(&store, "GENDER", Outcome::Pass, "second").unwrap();

        let recorded: Vec<_> = session.outcomes().collect();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].1.outcome, Outcome::Pass);
        assert_eq!(recorded[0].1.notes, "second");
        assert_eq!(session.progress(&store), (1, 3));
    }

    #[test]
    fn empty_session_scores_zero() {
        let mut store = RecordStore::new();
        let session = RunSession::new("App").unwrap();
        assert_eq!(session.score(), 0.0);

        let id = session.finish(&mut store, "u1").unwrap();
        let test = store.test_by_id(id, "u1").unwrap();
        assert_eq!(test.score, 0.0);
        assert!(store.test_results(id, "u1").is_empty());
    }

    #[test]
    fn finish_writes_test_and_results() {
        let mut store = RecordStore::new();
        let mut session = RunSession::new("Tutor AI").unwrap();
        session.record(&store, "PRIVACY", Outcome::Fail, "no erasure").unwrap();
        session.record(&store, "GENDER", Outcome::Pass, "").unwrap();
        session.record(&store, "CULTURE", Outcome::Pass, "").unwrap();

        let id = session.finish(&mut store, "u1").unwrap();
        let test = store.test_by_id(id, "u1").unwrap();
        assert_eq!(test.name, "Tutor AI");
        assert_eq!(test.test_type, SESSION_TEST_TYPE);
        assert!((test.score - 20.0 / 3.0).abs() < 1e-9);
        assert_eq!(test.details["results"]["PRIVACY"], "FAIL");
        assert_eq!(test.details["protocols"].as_array().unwrap().len(), 3);

        let results = store.test_results(id, "u1");
        let templates: Vec<u64> = results.iter().map(|r| r.template_id).collect();
        assert_eq!(templates, vec![1, 2, 3]);
        assert_eq!(results[2].notes, "no erasure");
    }
}
