//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use biasprobe_core::report::{AssessmentReport, METHODOLOGY};
use biasprobe_core::scoring::ScoreBand;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML page from an assessment report.
pub fn generate_html(report: &AssessmentReport) -> String {
    let app = report.app_name.as_deref().unwrap_or("Unnamed app");
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>AI Ethics Assessment — {}</title>\n",
        html_escape(app)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>AI Ethics Assessment Report</h1>\n");
    let when = report
        .test
        .as_ref()
        .map(|t| t.date)
        .unwrap_or(report.created_at);
    html.push_str(&format!(
        "<p class=\"meta\">App: <strong>{}</strong> | {} protocols | {}</p>\n",
        html_escape(app),
        report.lines.len(),
        when.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Score
    html.push_str("<section class=\"score\">\n");
    match (report.score, report.band) {
        (Some(score), Some(band)) => {
            html.push_str(&format!(
                "<div class=\"score-circle\" style=\"background: {}\">{:.1}</div>\n",
                band.color(),
                score
            ));
            html.push_str(&format!(
                "<p class=\"band\">Overall score out of 10 ({})</p>\n",
                band.label()
            ));
        }
        _ => html.push_str("<p class=\"band\">No score</p>\n"),
    }
    html.push_str(&format!(
        "<p class=\"recommendation\">{}</p>\n",
        html_escape(&report.recommendation)
    ));
    html.push_str("</section>\n");

    // Per-protocol results
    if !report.lines.is_empty() {
        html.push_str("<section class=\"results\">\n");
        html.push_str("<h2>Protocol Results</h2>\n");
        html.push_str("<table>\n");
        html.push_str(
            "<thead><tr><th>Protocol</th><th>Outcome</th><th>Verdict</th><th>Notes</th></tr></thead>\n",
        );
        html.push_str("<tbody>\n");
        for line in &report.lines {
            let class = if line.outcome.is_pass() { "pass" } else { "fail" };
            html.push_str(&format!(
                "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                class,
                html_escape(&line.title),
                line.outcome,
                html_escape(&line.verdict),
                html_escape(&line.notes),
            ));
        }
        html.push_str("</tbody></table>\n");
        html.push_str("</section>\n");
    }

    html.push_str(&legend());

    html.push_str("<section class=\"methodology\">\n<h2>Methodology</h2>\n");
    html.push_str(&format!("<p>{}</p>\n</section>\n", html_escape(METHODOLOGY)));

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

fn legend() -> String {
    let mut legend = String::from("<section class=\"legend\">\n<h2>Score bands</h2>\n<ul>\n");
    for (band, range) in [
        (ScoreBand::Good, "8 – 10"),
        (ScoreBand::Moderate, "5 – 8"),
        (ScoreBand::HighRisk, "0 – 5"),
    ] {
        legend.push_str(&format!(
            "<li><span class=\"swatch\" style=\"background: {}\"></span>{} ({})</li>\n",
            band.color(),
            range,
            band.label()
        ));
    }
    legend.push_str("</ul>\n</section>\n");
    legend
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &AssessmentReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #F8F9FA; --fg: #1A1A1A; --card: #fff; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #121212; --fg: #fff; --card: #1E1E1E; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #666; }
.score { background: var(--card); border-radius: 12px; padding: 1.5rem; text-align: center; }
.score-circle { width: 120px; height: 120px; border-radius: 50%; margin: 0 auto; display: flex; align-items: center; justify-content: center; color: #fff; font-size: 2.5rem; font-weight: bold; }
.recommendation { font-weight: bold; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.legend ul { list-style: none; padding: 0; }
.swatch { display: inline-block; width: 1rem; height: 1rem; border-radius: 50%; margin-right: 0.5rem; vertical-align: middle; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;
