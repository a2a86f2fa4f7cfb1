//! biasprobe-report — Assessment report rendering.
//!
//! Renders an [`biasprobe_core::report::AssessmentReport`] as a
//! self-contained HTML page or as Markdown.

pub mod html;
pub mod markdown;
