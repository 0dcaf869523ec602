use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Read-only tool settings. The tool never writes this file; org defaults
/// live in the platform CLI's own config store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_cli")]
    pub cli: String,
    #[serde(default = "default_editor")]
    pub editor: String,
    #[serde(default)]
    pub speech: bool,
    #[serde(default = "default_speech_command")]
    pub speech_command: String,
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: String,
    #[serde(default = "default_admin_email")]
    pub default_admin_email: String,
    #[serde(default = "default_duration_days")]
    pub default_duration_days: u32,
    #[serde(default = "default_package_dir")]
    pub default_package_dir: String,
    #[serde(default = "default_project_template")]
    pub project_template: String,
}

fn default_cli() -> String {
    "sfdx".to_string()
}

fn default_editor() -> String {
    "code".to_string()
}

fn default_speech_command() -> String {
    "say".to_string()
}

fn default_scratch_dir() -> String {
    "sfdx_logs".to_string()
}

fn default_admin_email() -> String {
    "admin@example.com".to_string()
}

fn default_duration_days() -> u32 {
    30
}

fn default_package_dir() -> String {
    "force-app".to_string()
}

fn default_project_template() -> String {
    "standard".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cli: default_cli(),
            editor: default_editor(),
            speech: false,
            speech_command: default_speech_command(),
            scratch_dir: default_scratch_dir(),
            default_admin_email: default_admin_email(),
            default_duration_days: default_duration_days(),
            default_package_dir: default_package_dir(),
            project_template: default_project_template(),
        }
    }
}

impl Config {
    /// Load `<root>/.dx/config.yaml`, falling back to `~/.dx/config.yaml`,
    /// then to built-in defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let project = paths::config_path(root);
        if project.is_file() {
            return Self::load_file(&project);
        }
        if let Some(user) = paths::user_config_path() {
            if user.is_file() {
                return Self::load_file(&user);
            }
        }
        Ok(Self::default())
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
