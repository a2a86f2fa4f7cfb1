//! The `biasprobe report` command.

use std::path::PathBuf;

use anyhow::Result;

use biasprobe_core::report::AssessmentReport;
use biasprobe_core::RecordStore;

use super::emit_report;

pub fn execute(inline: String, format: String, output: Option<PathBuf>) -> Result<()> {
    // Inline reports never touch stored data; the store only supplies the catalog.
    let store = RecordStore::new();
    let report = AssessmentReport::from_inline(&store, &inline)?;
    emit_report(&report, &format, output.as_deref())
}
