use crate::error::Result;
use crate::inventory::{banner_for, Banner, DefaultsSnapshot, Resolution, ResolutionStatus};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCandidate {
    pub display_name: String,
    pub full_path: PathBuf,
}

/// Defaults chosen explicitly during the session. They take precedence over
/// whatever the org list reports, including after a refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pins {
    pub hub: Option<String>,
    pub ephemeral: Option<String>,
}

// ---------------------------------------------------------------------------
// WorkflowContext
// ---------------------------------------------------------------------------

/// Session state handed from the menu to each workflow and back.
#[derive(Debug, Clone)]
pub struct WorkflowContext {
    pub defaults: DefaultsSnapshot,
    pub status: ResolutionStatus,
    pub candidate_projects: Vec<ProjectCandidate>,
    pub last_selection: BTreeMap<String, String>,
    pub pins: Pins,
    /// Scratch folder created during this session, removed on exit.
    pub scratch_dir: Option<PathBuf>,
    /// Project created earlier in the current dispatch round.
    pub created_project: Option<PathBuf>,
    stale: bool,
}

impl WorkflowContext {
    pub fn new(resolution: Resolution, pins: Pins) -> Self {
        let mut ctx = Self {
            defaults: DefaultsSnapshot::default(),
            status: ResolutionStatus::Resolved,
            candidate_projects: Vec::new(),
            last_selection: BTreeMap::new(),
            pins,
            scratch_dir: None,
            created_project: None,
            stale: false,
        };
        ctx.apply_resolution(resolution);
        ctx
    }

    /// Replace the defaults with a fresh resolution, then re-apply pins.
    pub fn apply_resolution(&mut self, resolution: Resolution) {
        self.defaults = resolution.snapshot;
        self.status = resolution.status;
        if let Some(hub) = self.pins.hub.clone() {
            self.defaults.set_default_hub(&hub);
        }
        if let Some(org) = self.pins.ephemeral.clone() {
            self.defaults.set_default_ephemeral(&org);
        }
        self.stale = false;
    }

    pub fn banner(&self) -> Banner {
        banner_for(&self.defaults, &self.status)
    }

    pub fn hub(&self) -> Option<&str> {
        self.defaults.default_hub.as_ref().map(|r| r.alias.as_str())
    }

    pub fn pin_hub(&mut self, alias: &str) {
        self.pins.hub = Some(alias.to_string());
        self.defaults.set_default_hub(alias);
    }

    pub fn pin_ephemeral(&mut self, alias: &str) {
        self.pins.ephemeral = Some(alias.to_string());
        self.defaults.set_default_ephemeral(alias);
    }

    /// Drop every reference to an org that no longer exists.
    pub fn forget(&mut self, alias: &str) {
        if self.pins.hub.as_deref() == Some(alias) {
            self.pins.hub = None;
        }
        if self.pins.ephemeral.as_deref() == Some(alias) {
            self.pins.ephemeral = None;
        }
        if self.hub() == Some(alias) {
            self.defaults.default_hub = None;
        }
        if self.defaults.ephemeral_alias() == alias {
            self.defaults.default_ephemeral = None;
        }
    }

    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn remember(&mut self, prompt: &str, answer: impl Into<String>) {
        self.last_selection.insert(prompt.to_string(), answer.into());
    }

    /// List sibling folders of `root` as "open project" candidates.
    pub fn scan_projects(&mut self, root: &Path, exclude: &str) -> Result<()> {
        self.candidate_projects = crate::io::list_dirs(root, &[exclude])?
            .into_iter()
            .map(|full_path| ProjectCandidate {
                display_name: full_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                full_path,
            })
            .collect();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{parse_inventory, NONE_ALIAS};
    use tempfile::TempDir;

    fn resolved(json: &str) -> Resolution {
        Resolution {
            snapshot: DefaultsSnapshot::from_inventory(parse_inventory(json).unwrap()),
            status: ResolutionStatus::Resolved,
        }
    }

    const LIST: &str = r#"{"nonScratchOrgs":[{"alias":"hub1","isDevHub":true},{"alias":"hub2","isDevHub":true}],
        "scratchOrgs":[{"alias":"s1","isDefaultUsername":true},{"alias":"s2"}]}"#;

    #[test]
    fn pins_survive_refresh() {
        let mut ctx = WorkflowContext::new(resolved(LIST), Pins::default());
        assert_eq!(ctx.hub(), Some("hub1"));

        ctx.pin_hub("hub2");
        ctx.mark_stale();
        ctx.apply_resolution(resolved(LIST));

        assert_eq!(ctx.hub(), Some("hub2"));
        assert!(!ctx.is_stale());
    }

    #[test]
    fn startup_pins_override_resolution() {
        let pins = Pins {
            hub: Some("cli-hub".into()),
            ephemeral: None,
        };
        let ctx = WorkflowContext::new(resolved(LIST), pins);
        assert_eq!(ctx.hub(), Some("cli-hub"));
        assert_eq!(ctx.defaults.ephemeral_alias(), "s1");
    }

    #[test]
    fn forget_clears_default_and_pin() {
        let mut ctx = WorkflowContext::new(resolved(LIST), Pins::default());
        ctx.pin_ephemeral("s1");
        ctx.forget("s1");
        assert_eq!(ctx.defaults.ephemeral_alias(), NONE_ALIAS);
        assert_eq!(ctx.pins.ephemeral, None);
    }

    #[test]
    fn failed_resolution_keeps_failure_banner() {
        let ctx = WorkflowContext::new(Resolution::failed("boom"), Pins::default());
        assert!(matches!(ctx.banner(), Banner::NotConnected { .. }));
    }

    #[test]
    fn scan_projects_excludes_scratch_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("Demo")).unwrap();
        std::fs::create_dir(dir.path().join("sfdx_logs")).unwrap();

        let mut ctx = WorkflowContext::new(Resolution::failed("x"), Pins::default());
        ctx.scan_projects(dir.path(), "sfdx_logs").unwrap();
        assert_eq!(ctx.candidate_projects.len(), 1);
        assert_eq!(ctx.candidate_projects[0].display_name, "Demo");
        assert_eq!(ctx.candidate_projects[0].full_path, dir.path().join("Demo"));
    }
}
