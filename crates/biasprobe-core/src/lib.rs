//! biasprobe-core — Record store, template catalog, and scoring.
//!
//! This crate holds the data model for bias-evaluation runs and community
//! reviews, the in-memory store that owns them, and the scoring rules that
//! turn protocol outcomes into a 0–10 assessment.

pub mod catalog;
pub mod clock;
pub mod error;
pub mod model;
pub mod report;
pub mod resources;
pub mod scoring;
pub mod session;
pub mod store;

pub use error::StoreError;
pub use store::RecordStore;
