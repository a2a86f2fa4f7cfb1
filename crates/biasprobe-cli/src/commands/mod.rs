pub mod account;
pub mod evaluate;
pub mod init;
pub mod report;
pub mod resources;
pub mod shell;
pub mod templates;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use biasprobe_auth::{load_config_from, AuthStore, BiasprobeConfig, User};
use biasprobe_core::report::{AssessmentReport, METHODOLOGY};
use biasprobe_report::html::{generate_html, write_html_report};
use biasprobe_report::markdown::to_markdown;

/// Load config and apply the `--data-dir` override.
pub fn load_settings(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<BiasprobeConfig> {
    let mut config = load_config_from(config_path)?;
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    Ok(config)
}

/// Open the auth store and restore the persisted user.
pub async fn open_auth(config: &BiasprobeConfig) -> AuthStore {
    AuthStore::open(Arc::new(config.kv_store()), config.pbkdf2_iterations).await
}

/// The signed-in user, or an error telling the user to sign in.
pub async fn require_user(config: &BiasprobeConfig) -> Result<User> {
    let auth = open_auth(config).await;
    auth.current_user()
        .cloned()
        .context("not signed in; run `biasprobe login` or `biasprobe register` first")
}

/// Split `KEY=VALUE`.
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    anyhow::ensure!(!key.is_empty(), "missing key in '{raw}'");
    Ok((key.to_string(), value.trim().to_string()))
}

/// Print or write a report in the requested format.
pub fn emit_report(report: &AssessmentReport, format: &str, output: Option<&Path>) -> Result<()> {
    let rendered = match format {
        "text" => None,
        "markdown" | "md" => Some(to_markdown(report)),
        "json" => Some(serde_json::to_string_pretty(report)?),
        "html" => {
            if let Some(path) = output {
                write_html_report(report, path)?;
                println!("HTML report: {}", path.display());
                return Ok(());
            }
            Some(generate_html(report))
        }
        other => anyhow::bail!("unknown format: {other} (expected text, markdown, json, html)"),
    };

    match (rendered, output) {
        (Some(content), Some(path)) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            println!("Report saved to: {}", path.display());
        }
        (Some(content), None) => println!("{content}"),
        (None, Some(path)) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, report_text(report))
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            println!("Report saved to: {}", path.display());
        }
        (None, None) => print!("{}", report_text(report)),
    }
    Ok(())
}

/// Plain-text rendering with a protocol table.
pub fn report_text(report: &AssessmentReport) -> String {
    let mut out = String::new();
    out.push_str("AI Ethics Assessment Report\n");
    if let Some(app) = &report.app_name {
        out.push_str(&format!("App: {app}\n"));
    }
    match (report.score, report.band) {
        (Some(score), Some(band)) => {
            out.push_str(&format!("Score: {score:.1}/10 ({})\n", band.label()));
        }
        _ => out.push_str("Score: n/a\n"),
    }
    out.push_str(&format!("Recommendation: {}\n", report.recommendation));

    if !report.lines.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Protocol", "Outcome", "Verdict", "Notes"]);
        for line in &report.lines {
            table.add_row(vec![
                Cell::new(&line.title),
                Cell::new(line.outcome),
                Cell::new(&line.verdict),
                Cell::new(&line.notes),
            ]);
        }
        out.push_str(&format!("\n{table}\n"));
    }
    out.push_str(&format!("\nMethodology: {METHODOLOGY}\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments() {
        assert_eq!(
            parse_assignment("GENDER=pass").unwrap(),
            ("GENDER".to_string(), "pass".to_string())
        );
        assert_eq!(
            parse_assignment("PRIVACY = keeps logs = forever").unwrap().1,
            "keeps logs = forever"
        );
        assert!(parse_assignment("GENDER").is_err());
        assert!(parse_assignment("=pass").is_err());
    }

    fn inline_report() -> AssessmentReport {
        let store = biasprobe_core::RecordStore::new();
        AssessmentReport::from_inline(&store, r#"{"results": {"GENDER": "PASS"}}"#).unwrap()
    }

    #[test]
    fn text_report_ends_with_methodology() {
        let text = report_text(&inline_report());
        assert!(text.contains("Score: 10.0/10 (good)"));
        assert!(text.trim_end().ends_with(METHODOLOGY));
    }

    #[test]
    fn every_format_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let report = inline_report();
        for (format, file) in [("text", "b/r.txt"), ("markdown", "a/r.md"), ("json", "c/r.json")] {
            let path = dir.path().join(file);
            emit_report(&report, format, Some(&path)).unwrap();
            assert!(path.exists(), "{format} report missing");
        }
        let text = std::fs::read_to_string(dir.path().join("b/r.txt")).unwrap();
        assert!(text.contains("AI Ethics Assessment Report"));
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(emit_report(&inline_report(), "pdf", None).is_err());
    }
}
