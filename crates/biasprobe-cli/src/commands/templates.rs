//! The `biasprobe templates` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use biasprobe_core::catalog::default_templates;

pub fn execute() -> Result<()> {
    print!("{}", templates_table());
    Ok(())
}

/// The protocol catalog as a table, followed by each protocol's steps.
pub fn templates_table() -> String {
    let templates = default_templates();

    let mut table = Table::new();
    table.set_header(vec!["Key", "Title", "Description", "Metrics"]);
    for t in &templates {
        table.add_row(vec![
            Cell::new(&t.key),
            Cell::new(&t.title),
            Cell::new(&t.description),
            Cell::new(t.metrics.join(", ")),
        ]);
    }

    let mut out = format!("{table}\n");
    for t in &templates {
        out.push_str(&format!("\n{} ({}):\n", t.title, t.key));
        for step in &t.steps {
            out.push_str(&format!("  {step}\n"));
        }
    }
    out
}
