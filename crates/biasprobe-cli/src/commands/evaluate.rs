//! The `biasprobe evaluate` command.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;

use biasprobe_core::model::{Outcome, TestId};
use biasprobe_core::report::AssessmentReport;
use biasprobe_core::session::RunSession;
use biasprobe_core::RecordStore;

use super::{emit_report, parse_assignment, require_user};

pub async fn execute(
    config: &biasprobe_auth::BiasprobeConfig,
    app: String,
    results: Vec<String>,
    notes: Vec<String>,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let user = require_user(config).await?;
    let mut store = RecordStore::new();

    let test_id = record_run(&mut store, &user.id, &app, &results, &notes)?;
    let report = AssessmentReport::from_stored(&store, test_id, &user.id);

    let output = match (format.as_str(), output) {
        ("html", None) => {
            let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
            Some(PathBuf::from(format!("report-{timestamp}.html")))
        }
        (_, output) => output,
    };
    emit_report(&report, &format, output.as_deref())
}

/// Run a session from `KEY=OUTCOME` and `KEY=TEXT` arguments and store it.
pub fn record_run(
    store: &mut RecordStore,
    owner_id: &str,
    app: &str,
    results: &[String],
    notes: &[String],
) -> Result<TestId> {
    let mut session = RunSession::new(app)?;

    let mut notes_by_key: HashMap<String, String> = HashMap::new();
    for raw in notes {
        let (key, text) = parse_assignment(raw)?;
        notes_by_key.insert(key.to_uppercase(), text);
    }

    for raw in results {
        let (key, value) = parse_assignment(raw)?;
        let outcome: Outcome = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        let note = notes_by_key.remove(&key.to_uppercase()).unwrap_or_default();
        session.record(store, &key, outcome, &note)?;
    }

    for key in notes_by_key.keys() {
        eprintln!("Warning: note for '{key}' ignored; no result was recorded for it");
    }
    if session.is_empty() {
        eprintln!("Warning: no protocol results recorded; the run scores 0");
    }

    let (done, total) = session.progress(store);
    let test_id = session.finish(store, owner_id)?;
    eprintln!("Recorded test #{test_id} ({done}/{total} protocols)");
    Ok(test_id)
}
