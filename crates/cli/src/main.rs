//! AgentDev CLI, the main entry point.
//!
//! Commands:
//! - `run`    Run one agent turn against a project directory
//! - `serve`  Start the HTTP gateway
//! - `tools`  Print the tool docs a session would give the planner
//! - `init`   Write a default config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "agentdev",
    about = "AgentDev: an autonomous coding agent confined to one project directory",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the agent toward a goal inside a project directory
    Run {
        /// The goal, in plain language
        goal: String,

        /// Project directory (defaults to sandbox.root from config, then the current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Override the round budget
        #[arg(short = 'n', long, env = "AGENTDEV_MAX_ROUNDS")]
        max_rounds: Option<u32>,

        /// Print events and the final report as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List the tools available to the planner
    Tools {
        /// Project directory (defaults to the current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// Write a default config file to ~/.agentdev/config.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only agent output.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            goal,
            root,
            max_rounds,
            json,
        } => {
            let code = commands::run::run(goal, root, max_rounds, json).await?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Tools { root } => commands::tools::run(root)?,
        Commands::Init => commands::init::run()?,
    }

    Ok(())
}
