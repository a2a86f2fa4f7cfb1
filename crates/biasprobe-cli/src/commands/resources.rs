//! The `biasprobe resources` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use biasprobe_core::resources::library;

pub fn execute() -> Result<()> {
    print!("{}", resources_table());
    Ok(())
}

/// The research library as a table.
pub fn resources_table() -> String {
    let mut table = Table::new();
    table.set_header(vec!["Title", "Category", "Description", "Link"]);
    for r in library() {
        table.add_row(vec![
            Cell::new(r.title),
            Cell::new(r.category),
            Cell::new(r.description),
            Cell::new(r.url),
        ]);
    }
    format!("Research Library: authoritative resources on AI ethics in education\n\n{table}\n")
}
