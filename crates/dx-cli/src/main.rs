mod cmd;
mod output;
mod root;
mod runner;
mod terminal;

use clap::{Parser, Subcommand};
use cmd::workflow::Direct;
use dx_core::workflow::menu::SESSION_END_EXIT_CODE;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dx",
    about = "Interactive console for Salesforce DX projects, scratch orgs and DevHub defaults",
    version,
    propagate_version = true
)]
struct Cli {
    /// Folder holding the project folders (default: nearest .dx/ above cwd, else cwd)
    #[arg(long, global = true, env = "DX_ROOT")]
    root: Option<PathBuf>,

    /// Platform CLI binary (overrides the `cli` config key)
    #[arg(long, global = true, env = "DX_CLI")]
    cli: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// DevHub alias to use as the session default
    devhub: Option<String>,

    /// Scratch org alias to use as the session default
    org: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a project
    Project {
        /// Project name (prompted when omitted)
        name: Option<String>,
    },

    /// Create a scratch org
    Org,

    /// Open, delete, connect or set defaults for existing orgs
    Manage,

    /// Authorize an org through the browser login
    Connect {
        /// Alias for the org (prompted when omitted)
        alias: Option<String>,
    },

    /// List connected orgs and the current defaults
    Orgs,

    /// Describe an sobject's fields
    Describe {
        /// API name of the sobject (e.g. Account)
        sobject: String,

        /// Org alias to describe against
        #[arg(long, short = 'u')]
        target_org: String,

        /// Use the Tooling API
        #[arg(long, short = 't')]
        tooling: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = cmd::load_config(&root, cli.cli.as_deref()).and_then(|config| {
        match cli.command {
            None => cmd::menu::run(&root, config, cli.devhub, cli.org)
                .map(|()| SESSION_END_EXIT_CODE),
            Some(command) => {
                let done = match command {
                    Commands::Project { name } => {
                        cmd::workflow::run(&root, config, Direct::Project { name })
                    }
                    Commands::Org => cmd::workflow::run(&root, config, Direct::Org),
                    Commands::Manage => cmd::workflow::run(&root, config, Direct::Manage),
                    Commands::Connect { alias } => {
                        cmd::workflow::run(&root, config, Direct::Connect { alias })
                    }
                    Commands::Orgs => cmd::orgs::run(&root, &config, cli.json),
                    Commands::Describe {
                        sobject,
                        target_org,
                        tooling,
                    } => cmd::describe::run(&root, &config, &sobject, &target_org, tooling, cli.json),
                };
                done.map(|()| 0)
            }
        }
    });

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            // Print the full error chain (anyhow's alternate Display)
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
