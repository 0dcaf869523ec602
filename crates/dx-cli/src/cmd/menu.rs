use anyhow::Context;
use dx_core::config::Config;
use dx_core::context::Pins;
use dx_core::workflow::menu;
use std::path::Path;

/// Interactive main menu. Returns once the user picks Exit.
pub fn run(
    root: &Path,
    config: Config,
    devhub: Option<String>,
    org: Option<String>,
) -> anyhow::Result<()> {
    let mut session = super::session(root, config);
    let pins = Pins {
        hub: devhub,
        ephemeral: org,
    };
    if let Some(hub) = &pins.hub {
        tracing::info!(hub = %hub, "default DevHub pinned from command line");
    }
    if let Some(org) = &pins.ephemeral {
        tracing::info!(org = %org, "default scratch org pinned from command line");
    }

    let mut ctx = menu::start(&mut session, pins).context("failed to start session")?;
    menu::run(&mut session, &mut ctx)?;
    Ok(())
}
