//! The `biasprobe init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("biasprobe.toml").exists() {
        println!("biasprobe.toml already exists, skipping.");
    } else {
        std::fs::write("biasprobe.toml", SAMPLE_CONFIG)?;
        println!("Created biasprobe.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: biasprobe register --username <name> --password <password>");
    println!("  2. Run: biasprobe templates");
    println!("  3. Run: biasprobe evaluate --app <name> --result GENDER=pass --result PRIVACY=fail");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# biasprobe configuration

# Where account data (registered users, signed-in user) is stored.
data_dir = "./.biasprobe"

# Runs listed by `recent` in the shell.
recent_limit = 5

# Author shown on reviews submitted without --author.
default_author = "Anonymous"

# PBKDF2 iterations for password hashes (minimum 1000).
pbkdf2_iterations = 100000
"#;
