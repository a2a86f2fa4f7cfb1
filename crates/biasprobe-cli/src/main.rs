//! biasprobe CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use biasprobe_auth::BiasprobeConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "biasprobe",
    version,
    about = "AI bias checklist runner and community app reviews"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for persisted account data (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config file
    Init,

    /// Create an account and sign in
    Register {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,
    },

    /// Sign in to an existing account
    Login {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List the built-in evaluation protocols
    Templates,

    /// List the research library
    Resources,

    /// Record an evaluation run and print its report
    Evaluate {
        /// Name of the app under evaluation
        #[arg(long)]
        app: String,

        /// Protocol outcome, e.g. "GENDER=pass" (repeatable)
        #[arg(long = "result", value_name = "KEY=OUTCOME")]
        results: Vec<String>,

        /// Protocol notes, e.g. "PRIVACY=keeps chat logs" (repeatable)
        #[arg(long = "note", value_name = "KEY=TEXT")]
        notes: Vec<String>,

        /// Output format: text, markdown, json, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the report to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Render a report from an inline results blob
    Report {
        /// JSON such as '{"results": {"GENDER": "PASS"}}'
        #[arg(long)]
        inline: String,

        /// Output format: text, markdown, json, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the report to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Interactive session over stdin sharing one record store
    Shell,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("biasprobe=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        command => match commands::load_settings(cli.config.as_deref(), cli.data_dir) {
            Ok(config) => run(command, &config).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(command: Commands, config: &BiasprobeConfig) -> Result<()> {
    match command {
        Commands::Init => commands::init::execute(),
        Commands::Register { username, password } => {
            commands::account::register(config, &username, &password).await
        }
        Commands::Login { username, password } => {
            commands::account::login(config, &username, &password).await
        }
        Commands::Logout => commands::account::logout(config).await,
        Commands::Whoami => commands::account::whoami(config).await,
        Commands::Templates => commands::templates::execute(),
        Commands::Resources => commands::resources::execute(),
        Commands::Evaluate {
            app,
            results,
            notes,
            format,
            output,
        } => commands::evaluate::execute(config, app, results, notes, format, output).await,
        Commands::Report {
            inline,
            format,
            output,
        } => commands::report::execute(inline, format, output),
        Commands::Shell => commands::shell::execute(config).await,
    }
}
