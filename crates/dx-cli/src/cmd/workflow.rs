use anyhow::Context;
use dx_core::config::Config;
use dx_core::context::Pins;
use dx_core::workflow::{connect, manage, menu, org, project, Outcome};
use std::path::Path;

/// A single sub-workflow run outside the main menu.
pub enum Direct {
    Project { name: Option<String> },
    Org,
    Manage,
    Connect { alias: Option<String> },
}

pub fn run(root: &Path, config: Config, which: Direct) -> anyhow::Result<()> {
    let mut session = super::session(root, config);
    let mut ctx = menu::start(&mut session, Pins::default()).context("failed to start session")?;

    let outcome = match &which {
        Direct::Project { name } => project::run(&mut session, &mut ctx, name.as_deref())?,
        Direct::Org => org::run(&mut session, &mut ctx)?,
        Direct::Manage => manage::run(&mut session, &mut ctx)?,
        Direct::Connect { alias } => connect::run(&mut session, &mut ctx, alias.as_deref())?,
    };
    menu::cleanup(&mut session, &mut ctx)?;

    match outcome {
        Outcome::Completed => Ok(()),
        Outcome::Cancelled => {
            tracing::debug!("workflow cancelled");
            Ok(())
        }
        Outcome::Failed(what) => anyhow::bail!("{what}"),
    }
}
