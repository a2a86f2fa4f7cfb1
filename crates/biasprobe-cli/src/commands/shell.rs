//! The `biasprobe shell` command.
//!
//! Reads one command per line from stdin and runs it against a single
//! in-memory record store, so runs and reviews live for the whole session.
//! Errors are printed and the session carries on.

use anyhow::Result;
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use biasprobe_auth::{BiasprobeConfig, User};
use biasprobe_core::model::{Review, ReviewFilter, Test, TestId};
use biasprobe_core::report::AssessmentReport;
use biasprobe_core::RecordStore;

use super::resources::resources_table;
use super::templates::templates_table;
use super::{emit_report, require_user};

#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand)]
enum ShellCommand {
    /// Record an evaluation run
    Evaluate {
        app: String,

        /// Protocol outcome, e.g. "GENDER=pass" (repeatable)
        #[arg(long = "result", value_name = "KEY=OUTCOME")]
        results: Vec<String>,

        /// Protocol notes, e.g. "PRIVACY=keeps logs" (repeatable)
        #[arg(long = "note", value_name = "KEY=TEXT")]
        notes: Vec<String>,
    },

    /// List your most recent runs
    Recent {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the report for a run
    Show {
        id: TestId,

        /// Output format: text, markdown, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List the recorded protocol results of a run
    Results { id: TestId },

    /// Delete a run and its results
    DeleteTest { id: TestId },

    /// Review an app (rating 1-5)
    Review {
        app: String,
        rating: u8,
        comment: String,

        #[arg(long)]
        author: Option<String>,
    },

    /// List reviews, newest first
    Reviews {
        /// Case-insensitive app name filter
        app: Option<String>,

        /// Only your own reviews
        #[arg(long)]
        mine: bool,
    },

    /// Average rating for an app
    Average {
        app: String,

        /// Only your own reviews
        #[arg(long)]
        mine: bool,
    },

    /// Delete one of your reviews
    DeleteReview { id: u64 },

    /// Delete every run and result
    ClearTests,

    /// Delete every review
    ClearReviews,

    /// List the evaluation protocols
    Templates,

    /// List the research library
    Resources,

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

enum Flow {
    Continue,
    Quit,
}

/// Split a line on whitespace, keeping double-quoted text together.
fn split_line(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    anyhow::ensure!(!in_quotes, "unterminated quote");
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

struct Shell<'a> {
    config: &'a BiasprobeConfig,
    user: User,
    store: RecordStore,
}

impl Shell<'_> {
    fn handle(&mut self, command: ShellCommand) -> Result<Flow> {
        let owner = self.user.id.clone();
        match command {
            ShellCommand::Evaluate {
                app,
                results,
                notes,
            } => {
                let id = super::evaluate::record_run(&mut self.store, &owner, &app, &results, &notes)?;
                let report = AssessmentReport::from_stored(&self.store, id, &owner);
                emit_report(&report, "text", None)?;
            }
            ShellCommand::Recent { limit } => {
                let tests = self
                    .store
                    .recent_tests(&owner, limit.unwrap_or(self.config.recent_limit));
                print_tests(&tests);
            }
            ShellCommand::Show { id, format } => {
                anyhow::ensure!(format != "html", "html is not available in the shell");
                let report = AssessmentReport::from_stored(&self.store, id, &owner);
                emit_report(&report, &format, None)?;
            }
            ShellCommand::Results { id } => {
                let results = self.store.test_results(id, &owner);
                if results.is_empty() {
                    println!("No results for test #{id}.");
                } else {
                    let mut table = Table::new();
                    table.set_header(vec!["#", "Protocol", "Outcome", "Notes", "Recorded"]);
                    for r in &results {
                        let protocol = self
                            .store
                            .template_by_id(r.template_id)
                            .map(|t| t.title.clone())
                            .unwrap_or_else(|| r.template_id.to_string());
                        table.add_row(vec![
                            Cell::new(r.id),
                            Cell::new(protocol),
                            Cell::new(r.result),
                            Cell::new(&r.notes),
                            Cell::new(r.timestamp.format("%Y-%m-%d %H:%M:%S")),
                        ]);
                    }
                    println!("{table}");
                }
            }
            ShellCommand::DeleteTest { id } => {
                if self.store.delete_test(id, &owner) {
                    println!("Deleted test #{id}.");
                } else {
                    println!("No test #{id}.");
                }
            }
            ShellCommand::Review {
                app,
                rating,
                comment,
                author,
            } => {
                let author = author.unwrap_or_else(|| self.config.default_author.clone());
                let id = self
                    .store
                    .add_review(&app, rating, &comment, &owner, &author)?;
                println!("Added review #{id}.");
            }
            ShellCommand::Reviews { app, mine } => {
                let filter = ReviewFilter {
                    app_name: app,
                    user_id: mine.then(|| owner.clone()),
                };
                print_reviews(&self.store.reviews(&filter));
            }
            ShellCommand::Average { app, mine } => {
                let user = mine.then_some(owner.as_str());
                match self.store.average_rating(app.trim(), user) {
                    Some(avg) => println!("Average rating for {}: {avg:.2}", app.trim()),
                    None => println!("No reviews for {}.", app.trim()),
                }
            }
            ShellCommand::DeleteReview { id } => {
                if self.store.delete_review(id, &owner) {
                    println!("Deleted review #{id}.");
                } else {
                    println!("No review #{id} of yours.");
                }
            }
            ShellCommand::ClearTests => {
                self.store.clear_all_tests();
                println!("Cleared all tests.");
            }
            ShellCommand::ClearReviews => {
                self.store.clear_all_reviews();
                println!("Cleared all reviews.");
            }
            ShellCommand::Templates => print!("{}", templates_table()),
            ShellCommand::Resources => print!("{}", resources_table()),
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let tokens = split_line(line)?;
        if tokens.is_empty() || tokens[0].starts_with('#') {
            return Ok(Flow::Continue);
        }
        match ShellLine::try_parse_from(tokens) {
            Ok(parsed) => self.handle(parsed.command),
            Err(e) => {
                // Covers `help` as well as genuine parse errors.
                print!("{}", e.render());
                Ok(Flow::Continue)
            }
        }
    }
}

fn print_tests(tests: &[Test]) {
    if tests.is_empty() {
        println!("No tests yet.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["#", "App", "Score", "Type", "Date"]);
    for t in tests {
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.name),
            Cell::new(format!("{:.1}", t.score)),
            Cell::new(&t.test_type),
            Cell::new(t.date.format("%Y-%m-%d %H:%M:%S")),
        ]);
    }
    println!("{table}");
}

fn print_reviews(reviews: &[Review]) {
    if reviews.is_empty() {
        println!("No reviews yet.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["#", "App", "Rating", "Comment", "Author", "Date"]);
    for r in reviews {
        table.add_row(vec![
            Cell::new(r.id),
            Cell::new(&r.app_name),
            Cell::new(format!("{}{}", "★".repeat(r.rating as usize), "☆".repeat(5 - r.rating as usize))),
            Cell::new(&r.comment),
            Cell::new(&r.author),
            Cell::new(r.timestamp.format("%Y-%m-%d %H:%M")),
        ]);
    }
    println!("{table}");
}

pub async fn execute(config: &BiasprobeConfig) -> Result<()> {
    let user = require_user(config).await?;
    info!(username = %user.username, "shell session started");
    println!("biasprobe shell, signed in as {}. Type `help` for commands.", user.username);

    let mut shell = Shell {
        config,
        user,
        store: RecordStore::new(),
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match shell.handle_line(&line) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => println!("Error: {e:#}"),
        }
    }
    Ok(())
}
