//! In-memory record store.
//!
//! Owns every evaluation run, protocol outcome, and review for the lifetime
//! of the process. One `RecordStore` is constructed at startup and passed by
//! reference to whatever needs it; nothing here is global.
//!
//! Ids are monotonic per collection and start at 1. Reads return owned
//! copies so callers never hold borrows into the store.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::default_templates;
use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::model::{
    Details, Outcome, ResultId, Review, ReviewFilter, ReviewId, TemplateId, Test, TestId,
    TestResult, TestTemplate,
};

/// Author name recorded when a review is submitted without one.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Process-wide store of tests, results, and reviews.
pub struct RecordStore {
    tests: Vec<Test>,
    results: Vec<TestResult>,
    reviews: Vec<Review>,
    templates: Vec<TestTemplate>,
    next_test_id: u64,
    next_result_id: u64,
    next_review_id: u64,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("tests", &self.tests.len())
            .field("results", &self.results.len())
            .field("reviews", &self.reviews.len())
            .field("next_test_id", &self.next_test_id)
            .field("next_result_id", &self.next_result_id)
            .field("next_review_id", &self.next_review_id)
            .finish()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

fn next_id(counter: &mut u64, kind: &'static str) -> Result<u64, StoreError> {
    let id = *counter;
    *counter = counter
        .checked_add(1)
        .ok_or(StoreError::IdSpaceExhausted(kind))?;
    Ok(id)
}

impl RecordStore {
    /// Create an empty store using wall-clock timestamps.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store that stamps records with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        info!("record store initialized");
        Self {
            tests: Vec::new(),
            results: Vec::new(),
            reviews: Vec::new(),
            templates: default_templates(),
            next_test_id: 1,
            next_result_id: 1,
            next_review_id: 1,
            clock,
        }
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    /// Record a finished evaluation run and return its id.
    pub fn add_test(
        &mut self,
        name: &str,
        score: f64,
        test_type: &str,
        owner_id: &str,
        details: Details,
    ) -> Result<TestId, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::validation("name", "app name is required"));
        }
        if !score.is_finite() || !(0.0..=10.0).contains(&score) {
            return Err(StoreError::validation(
                "score",
                format!("{score} is outside 0..=10"),
            ));
        }

        let id = next_id(&mut self.next_test_id, "tests")?;
        self.tests.push(Test {
            id,
            name: name.to_string(),
            date: self.clock.now(),
            score,
            test_type: test_type.to_string(),
            user_id: owner_id.to_string(),
            details,
        });
        info!(test_id = id, app = name, score, "added test");
        Ok(id)
    }

    /// The owner's most recent tests, newest first, at most `limit` of them.
    ///
    /// Tests with equal dates keep insertion order.
    pub fn recent_tests(&self, owner_id: &str, limit: usize) -> Vec<Test> {
        let mut tests: Vec<Test> = self
            .tests
            .iter()
            .filter(|t| t.user_id == owner_id)
            .cloned()
            .collect();
        tests.sort_by(|a, b| b.date.cmp(&a.date));
        tests.truncate(limit);
        debug!(owner = owner_id, count = tests.len(), "listed recent tests");
        tests
    }

    pub fn test_by_id(&self, id: TestId, owner_id: &str) -> Option<Test> {
        self.tests
            .iter()
            .find(|t| t.id == id && t.user_id == owner_id)
            .cloned()
    }

    /// Every test owned by `owner_id`, in insertion order.
    pub fn all_tests(&self, owner_id: &str) -> Vec<Test> {
        self.tests
            .iter()
            .filter(|t| t.user_id == owner_id)
            .cloned()
            .collect()
    }

    /// Remove a test and all of its results. Returns `false` if no test
    /// matched; that is not an error.
    pub fn delete_test(&mut self, id: TestId, owner_id: &str) -> bool {
        let before = self.tests.len();
        self.tests.retain(|t| !(t.id == id && t.user_id == owner_id));
        let removed = self.tests.len() != before;

        let results_before = self.results.len();
        self.results
            .retain(|r| !(r.test_id == id && r.user_id == owner_id));
        let results_removed = results_before - self.results.len();

        info!(
            test_id = id,
            removed,
            results_removed,
            "deleted test and associated results"
        );
        removed
    }

    /// Drop every test and result and restart both id counters at 1.
    pub fn clear_all_tests(&mut self) {
        self.tests.clear();
        self.results.clear();
        self.next_test_id = 1;
        self.next_result_id = 1;
        info!("cleared all tests and results");
    }

    // -----------------------------------------------------------------------
    // Test results
    // -----------------------------------------------------------------------

    /// Append one protocol outcome to an existing test owned by `owner_id`.
    pub fn add_test_result(
        &mut self,
        test_id: TestId,
        template_id: TemplateId,
        result: Outcome,
        owner_id: &str,
        notes: &str,
    ) -> Result<ResultId, StoreError> {
        if self.template_by_id(template_id).is_none() {
            return Err(StoreError::NotFound {
                kind: "template",
                id: template_id,
            });
        }
        if !self
            .tests
            .iter()
            .any(|t| t.id == test_id && t.user_id == owner_id)
        {
            return Err(StoreError::NotFound {
                kind: "test",
                id: test_id,
            });
        }

        let id = next_id(&mut self.next_result_id, "test results")?;
        self.results.push(TestResult {
            id,
            test_id,
            template_id,
            result,
            notes: notes.to_string(),
            user_id: owner_id.to_string(),
            timestamp: self.clock.now(),
        });
        info!(result_id = id, test_id, %result, "added test result");
        Ok(id)
    }

    /// Results for one test, oldest first.
    pub fn test_results(&self, test_id: TestId, owner_id: &str) -> Vec<TestResult> {
        let mut results: Vec<TestResult> = self
            .results
            .iter()
            .filter(|r| r.test_id == test_id && r.user_id == owner_id)
            .cloned()
            .collect();
        results.sort_by_key(|r| r.timestamp);
        results
    }

    pub fn all_test_results(&self, owner_id: &str) -> Vec<TestResult> {
        self.results
            .iter()
            .filter(|r| r.user_id == owner_id)
            .cloned()
            .collect()
    }

    // -----------------------------------------------------------------------
    // Templates
    // -----------------------------------------------------------------------

    pub fn templates(&self) -> &[TestTemplate] {
        &self.templates
    }

    pub fn template_by_id(&self, id: TemplateId) -> Option<&TestTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Look up a template by protocol key, ignoring case.
    pub fn template_by_key(&self, key: &str) -> Option<&TestTemplate> {
        self.templates
            .iter()
            .find(|t| t.key.eq_ignore_ascii_case(key.trim()))
    }

    // -----------------------------------------------------------------------
    // Reviews
    // -----------------------------------------------------------------------

    /// Store a review. A blank `author` is recorded as [`ANONYMOUS_AUTHOR`].
    pub fn add_review(
        &mut self,
        app_name: &str,
        rating: u8,
        comment: &str,
        owner_id: &str,
        author: &str,
    ) -> Result<ReviewId, StoreError> {
        let app_name = app_name.trim();
        let comment = comment.trim();
        if app_name.is_empty() {
            return Err(StoreError::validation("app_name", "app name is required"));
        }
        if comment.is_empty() {
            return Err(StoreError::validation("comment", "comment is required"));
        }
        if !(1..=5).contains(&rating) {
            return Err(StoreError::validation(
                "rating",
                format!("{rating} is not between 1 and 5"),
            ));
        }
        let author = match author.trim() {
            "" => ANONYMOUS_AUTHOR,
            a => a,
        };

        let id = next_id(&mut self.next_review_id, "reviews")?;
        self.reviews.push(Review {
            id,
            app_name: app_name.to_string(),
            rating,
            comment: comment.to_string(),
            author: author.to_string(),
            user_id: owner_id.to_string(),
            timestamp: self.clock.now(),
        });
        info!(review_id = id, app = app_name, rating, "added review");
        Ok(id)
    }

    /// Reviews passing `filter`, newest first.
    pub fn reviews(&self, filter: &ReviewFilter) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .reviews
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        debug!(count = reviews.len(), "listed reviews");
        reviews
    }

    /// Every review in insertion order.
    pub fn all_reviews(&self) -> Vec<Review> {
        self.reviews.clone()
    }

    /// Mean rating for reviews of exactly `app_name` (trimmed, like stored
    /// names), optionally limited to one user. `None` when nothing matches.
    pub fn average_rating(&self, app_name: &str, user_id: Option<&str>) -> Option<f64> {
        let app_name = app_name.trim();
        let ratings: Vec<f64> = self
            .reviews
            .iter()
            .filter(|r| r.app_name == app_name)
            .filter(|r| user_id.map_or(true, |uid| r.user_id == uid))
            .map(|r| f64::from(r.rating))
            .collect();

        if ratings.is_empty() {
            return None;
        }
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    }

    /// Remove a review owned by `owner_id`. Returns `false` if none matched.
    pub fn delete_review(&mut self, id: ReviewId, owner_id: &str) -> bool {
        let before = self.reviews.len();
        self.reviews
            .retain(|r| !(r.id == id && r.user_id == owner_id));
        let removed = self.reviews.len() != before;
        if removed {
            info!(review_id = id, "deleted review");
        }
        removed
    }

    /// Drop every review and restart the review id counter at 1.
    pub fn clear_all_reviews(&mut self) {
        self.reviews.clear();
        self.next_review_id = 1;
        info!("cleared all reviews");
    }
}
