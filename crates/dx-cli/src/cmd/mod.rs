pub mod describe;
pub mod menu;
pub mod orgs;
pub mod workflow;

use crate::runner::SystemRunner;
use crate::terminal::TerminalConsole;
use anyhow::Context;
use dx_core::command::CommandBuilder;
use dx_core::config::Config;
use dx_core::workflow::Session;
use std::path::Path;

pub type TerminalSession = Session<SystemRunner, TerminalConsole>;

/// Load settings for `root`, with `--cli` taking precedence over the file.
pub fn load_config(root: &Path, cli: Option<&str>) -> anyhow::Result<Config> {
    let mut config = Config::load(root).context("failed to load config")?;
    if let Some(cli) = cli {
        config.cli = cli.to_string();
    }
    Ok(config)
}

pub fn session(root: &Path, config: Config) -> TerminalSession {
    Session::new(config, root, SystemRunner::new(root), TerminalConsole::new())
}

/// Builder and runner for the non-interactive commands.
pub fn plain(root: &Path, config: &Config) -> (CommandBuilder, SystemRunner) {
    (CommandBuilder::new(config.cli.clone()), SystemRunner::new(root))
}
