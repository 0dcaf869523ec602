use crate::error::{DxError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// File and directory constants
// ---------------------------------------------------------------------------

pub const DX_DIR: &str = ".dx";
pub const CONFIG_FILE: &str = ".dx/config.yaml";

/// Marker file that makes a directory an sfdx project.
pub const PROJECT_MANIFEST: &str = "sfdx-project.json";
pub const PROJECT_CONFIG_DIR: &str = "config";
pub const DEFINITION_FILE: &str = "scratch-org-def.json";

pub const README_FILE: &str = "readme.md";
pub const GITIGNORE_FILE: &str = ".gitignore";
pub const FORCEIGNORE_FILE: &str = ".forceignore";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn user_config_path() -> Option<PathBuf> {
    home::home_dir().map(|h| h.join(CONFIG_FILE))
}

pub fn project_dir(root: &Path, name: &str) -> PathBuf {
    root.join(name)
}

pub fn project_config_dir(project: &Path) -> PathBuf {
    project.join(PROJECT_CONFIG_DIR)
}

pub fn is_project(dir: &Path) -> bool {
    dir.join(PROJECT_MANIFEST).is_file()
}

pub fn scratch_dir(root: &Path, name: &str) -> PathBuf {
    root.join(name)
}

// ---------------------------------------------------------------------------
// Name validation
// ---------------------------------------------------------------------------

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-]*$").unwrap())
}

/// Aliases and project names end up as bare CLI arguments and folder names.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 80 || !name_re().is_match(name) {
        return Err(DxError::InvalidName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
