use crate::output::{print_json, print_table};
use anyhow::Context;
use dx_core::config::Config;
use dx_core::inventory::{self, DefaultsSnapshot, EnvKind, EnvironmentRecord};
use std::path::Path;

pub fn run(root: &Path, config: &Config, json: bool) -> anyhow::Result<()> {
    let (builder, mut runner) = super::plain(root, config);
    let resolution = inventory::resolve(&builder, &mut runner).context("failed to list orgs")?;
    if resolution.is_failed() {
        anyhow::bail!("{}", resolution.banner());
    }
    let snapshot = resolution.snapshot;

    if json {
        return print_json(&snapshot);
    }

    let rows: Vec<Vec<String>> = snapshot
        .inventory
        .persistent
        .iter()
        .chain(snapshot.inventory.ephemeral.iter())
        .map(|r| row(&snapshot, r))
        .collect();
    if rows.is_empty() {
        println!("No orgs connected.");
        return Ok(());
    }
    print_table(&["ALIAS", "KIND", "USERNAME", "DEFAULT", "EXPIRES"], rows);
    Ok(())
}

fn row(snapshot: &DefaultsSnapshot, record: &EnvironmentRecord) -> Vec<String> {
    let kind = match record.kind {
        EnvKind::Persistent if record.is_hub => "devhub",
        EnvKind::Persistent => "connected",
        EnvKind::Ephemeral => "scratch",
    };
    let is_default = snapshot
        .default_hub
        .iter()
        .chain(snapshot.default_ephemeral.iter())
        .any(|d| d.alias == record.alias);
    vec![
        record.alias.clone(),
        kind.to_string(),
        record.username.clone().unwrap_or_else(|| "-".to_string()),
        String::from(if is_default { "*" } else { "" }),
        record.expiration_date.clone().unwrap_or_default(),
    ]
}
