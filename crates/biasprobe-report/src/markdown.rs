//! Markdown report generator.

use biasprobe_core::report::{AssessmentReport, METHODOLOGY};

/// Format an assessment report as markdown.
pub fn to_markdown(report: &AssessmentReport) -> String {
    let mut md = String::new();

    md.push_str("## AI Ethics Assessment Report\n\n");
    if let Some(app) = &report.app_name {
        md.push_str(&format!("**App:** {app}\n\n"));
    }

    match (report.score, report.band) {
        (Some(score), Some(band)) => md.push_str(&format!(
            "**Score:** {:.1} / 10 ({})\n\n",
            score,
            band.label()
        )),
        _ => md.push_str("**Score:** n/a\n\n"),
    }
    md.push_str(&format!("**Recommendation:** {}\n\n", report.recommendation));

    if !report.lines.is_empty() {
        md.push_str("### Protocol Results\n\n");
        md.push_str("| Protocol | Outcome | Verdict | Notes |\n");
        md.push_str("|----------|---------|---------|-------|\n");
        for line in &report.lines {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                table_cell(&line.title),
                line.outcome,
                table_cell(&line.verdict),
                table_cell(&line.notes)
            ));
        }
        md.push('\n');
        md.push_str(&format!(
            "{} of {} protocols met standards.\n",
            report.passed(),
            report.lines.len()
        ));
    }

    md.push_str(&format!("\n### Methodology\n\n{METHODOLOGY}\n"));
    md
}

/// Make text safe inside a single table cell.
fn table_cell(s: &str) -> String {
    s.replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace(['\n', '\r'], "<br>")
}
