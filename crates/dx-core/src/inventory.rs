use crate::command::{Action, CommandBuilder, CommandIntent, Param};
use crate::error::{DxError, Result};
use crate::runner::{CommandRunner, OutputMode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display value for a default that does not exist.
pub const NONE_ALIAS: &str = "NONE";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvKind {
    Persistent,
    Ephemeral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentRecord {
    pub alias: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub is_hub: bool,
    pub is_default_ephemeral: bool,
    pub kind: EnvKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
}

impl EnvironmentRecord {
    /// A record for an alias the inventory did not report (e.g. pinned from
    /// the command line).
    pub fn named(alias: &str, kind: EnvKind) -> Self {
        Self {
            alias: alias.to_string(),
            username: None,
            is_hub: kind == EnvKind::Persistent,
            is_default_ephemeral: kind == EnvKind::Ephemeral,
            kind,
            expiration_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnvironmentInventory {
    pub persistent: Vec<EnvironmentRecord>,
    pub ephemeral: Vec<EnvironmentRecord>,
}

impl EnvironmentInventory {
    pub fn find(&self, alias: &str) -> Option<&EnvironmentRecord> {
        self.persistent
            .iter()
            .chain(self.ephemeral.iter())
            .find(|r| r.alias == alias)
    }

    pub fn persistent_aliases(&self) -> Vec<String> {
        self.persistent.iter().map(|r| r.alias.clone()).collect()
    }

    pub fn ephemeral_aliases(&self) -> Vec<String> {
        self.ephemeral.iter().map(|r| r.alias.clone()).collect()
    }

    /// Scratch orgs first, then persistent ones.
    pub fn all_aliases(&self) -> Vec<String> {
        let mut all = self.ephemeral_aliases();
        all.extend(self.persistent_aliases());
        all
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawList {
    non_scratch_orgs: Option<Vec<RawOrg>>,
    scratch_orgs: Option<Vec<RawOrg>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOrg {
    alias: Option<String>,
    username: Option<String>,
    is_dev_hub: Option<bool>,
    is_default_username: Option<bool>,
    expiration_date: Option<String>,
}

impl RawOrg {
    fn into_record(self, kind: EnvKind) -> Option<EnvironmentRecord> {
        let alias = self
            .alias
            .filter(|a| !a.is_empty())
            .or_else(|| self.username.clone())?;
        Some(EnvironmentRecord {
            alias,
            username: self.username,
            is_hub: kind == EnvKind::Persistent && self.is_dev_hub.unwrap_or(false),
            is_default_ephemeral: kind == EnvKind::Ephemeral
                && self.is_default_username.unwrap_or(false),
            kind,
            expiration_date: self.expiration_date,
        })
    }
}

/// Parse `force:org:list --json` output. Accepts both the CLI envelope
/// (`{"status":0,"result":{...}}`) and a bare result object; a missing list
/// is empty.
pub fn parse_inventory(json: &str) -> Result<EnvironmentInventory> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let body = match value.get("result") {
        Some(result) => result.clone(),
        None => value,
    };
    if !body.is_object() {
        return Err(DxError::ResolutionFailed(
            "org list is not a JSON object".to_string(),
        ));
    }
    let raw: RawList = serde_json::from_value(body)?;

    let collect = |orgs: Option<Vec<RawOrg>>, kind| -> Vec<EnvironmentRecord> {
        orgs.unwrap_or_default()
            .into_iter()
            .filter_map(|o| o.into_record(kind))
            .collect()
    };

    Ok(EnvironmentInventory {
        persistent: collect(raw.non_scratch_orgs, EnvKind::Persistent),
        ephemeral: collect(raw.scratch_orgs, EnvKind::Ephemeral),
    })
}

// ---------------------------------------------------------------------------
// DefaultsSnapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DefaultsSnapshot {
    pub default_hub: Option<EnvironmentRecord>,
    pub default_ephemeral: Option<EnvironmentRecord>,
    pub inventory: EnvironmentInventory,
}

impl DefaultsSnapshot {
    pub fn from_inventory(inventory: EnvironmentInventory) -> Self {
        let default_hub = inventory.persistent.iter().find(|r| r.is_hub).cloned();
        let default_ephemeral = inventory
            .ephemeral
            .iter()
            .find(|r| r.is_default_ephemeral)
            .cloned();
        Self {
            default_hub,
            default_ephemeral,
            inventory,
        }
    }

    pub fn hub_alias(&self) -> &str {
        self.default_hub
            .as_ref()
            .map(|r| r.alias.as_str())
            .unwrap_or(NONE_ALIAS)
    }

    pub fn ephemeral_alias(&self) -> &str {
        self.default_ephemeral
            .as_ref()
            .map(|r| r.alias.as_str())
            .unwrap_or(NONE_ALIAS)
    }

    pub fn set_default_hub(&mut self, alias: &str) {
        let record = self
            .inventory
            .find(alias)
            .cloned()
            .unwrap_or_else(|| EnvironmentRecord::named(alias, EnvKind::Persistent));
        self.default_hub = Some(record);
    }

    pub fn set_default_ephemeral(&mut self, alias: &str) {
        let record = self
            .inventory
            .find(alias)
            .cloned()
            .unwrap_or_else(|| EnvironmentRecord::named(alias, EnvKind::Ephemeral));
        self.default_ephemeral = Some(record);
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStatus {
    Resolved,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub snapshot: DefaultsSnapshot,
    pub status: ResolutionStatus,
}

impl Resolution {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            snapshot: DefaultsSnapshot::default(),
            status: ResolutionStatus::Failed(reason.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, ResolutionStatus::Failed(_))
    }

    pub fn banner(&self) -> Banner {
        banner_for(&self.snapshot, &self.status)
    }
}

pub fn banner_for(snapshot: &DefaultsSnapshot, status: &ResolutionStatus) -> Banner {
    match status {
        ResolutionStatus::Failed(reason) => Banner::NotConnected {
            reason: reason.clone(),
        },
        ResolutionStatus::Resolved if snapshot.default_hub.is_none() => Banner::NeedsHub,
        ResolutionStatus::Resolved => Banner::Welcome {
            connected: snapshot.inventory.persistent.len(),
            scratch: snapshot.inventory.ephemeral.len(),
            hub: snapshot.hub_alias().to_string(),
            scratch_default: snapshot.ephemeral_alias().to_string(),
        },
    }
}

/// Ask the platform CLI for its org list and derive the defaults.
///
/// A CLI that cannot be started, exits non-zero, or prints something that is
/// not an org list yields a `Failed` resolution with empty inventory.
pub fn resolve<R: CommandRunner + ?Sized>(
    builder: &CommandBuilder,
    runner: &mut R,
) -> Result<Resolution> {
    let cmd = builder.build(&CommandIntent::new(Action::EnvList).switch(Param::Json, true))?;
    tracing::info!(command = %cmd, "resolving org defaults");

    let outcome = match runner.run(&cmd, OutputMode::Capture) {
        Ok(o) => o,
        Err(e) => {
            tracing::warn!(error = %e, "org list could not be started");
            return Ok(Resolution::failed(e.to_string()));
        }
    };
    if !outcome.success() {
        tracing::warn!(code = outcome.code, "org list exited non-zero");
        return Ok(Resolution::failed(format!(
            "{} exited with code {}",
            cmd.program, outcome.code
        )));
    }

    match parse_inventory(&outcome.stdout) {
        Ok(inventory) => Ok(Resolution {
            snapshot: DefaultsSnapshot::from_inventory(inventory),
            status: ResolutionStatus::Resolved,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "org list output was not understood");
            Ok(Resolution::failed(format!("unreadable org list: {e}")))
        }
    }
}

// ---------------------------------------------------------------------------
// Banner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Welcome {
        connected: usize,
        scratch: usize,
        hub: String,
        scratch_default: String,
    },
    /// The org list was read but no DevHub is connected.
    NeedsHub,
    /// The org list could not be read at all.
    NotConnected { reason: String },
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Banner::Welcome {
                connected,
                scratch,
                hub,
                scratch_default,
            } => {
                writeln!(f, "Welcome to DX")?;
                writeln!(f, "Connected Orgs : {connected}")?;
                writeln!(f, "Active Scratch Orgs : {scratch}")?;
                writeln!(f)?;
                writeln!(f, "Default DevHub : {hub}")?;
                write!(f, "Default Scratch : {scratch_default}")
            }
            Banner::NeedsHub => write!(f, "NEED TO CONNECT DEVHUB"),
            Banner::NotConnected { reason } => {
                writeln!(f, "NOT CONNECTED")?;
                write!(f, "Could not read the org list ({reason})")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
