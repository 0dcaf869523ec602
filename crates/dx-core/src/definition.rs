use crate::error::{DxError, Result};
use crate::io::{atomic_write, ensure_dir, remove_if_exists};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Choice lists
// ---------------------------------------------------------------------------

pub const EDITIONS: &[&str] = &[
    "Developer",
    "Enterprise",
    "Group",
    "Professional",
    "Partner Developer",
    "Partner Enterprise",
    "Partner Group",
    "Partner Professional",
];

/// (code, label)
pub const COUNTRIES: &[(&str, &str)] = &[
    ("US", "United States"),
    ("CA", "Canada"),
    ("GB", "United Kingdom"),
    ("IE", "Ireland"),
    ("AU", "Australia"),
    ("NZ", "New Zealand"),
    ("DE", "Germany"),
    ("FR", "France"),
    ("ES", "Spain"),
    ("IT", "Italy"),
    ("NL", "Netherlands"),
    ("BR", "Brazil"),
    ("MX", "Mexico"),
    ("JP", "Japan"),
    ("IN", "India"),
];

/// (code, label)
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en_US", "English"),
    ("en_GB", "English (UK)"),
    ("de", "German"),
    ("fr", "French"),
    ("es", "Spanish"),
    ("es_MX", "Spanish (Mexico)"),
    ("it", "Italian"),
    ("nl_NL", "Dutch"),
    ("pt_BR", "Portuguese (Brazil)"),
    ("ja", "Japanese"),
];

pub const FEATURES: &[&str] = &[
    "API",
    "AuthorApex",
    "Communities",
    "ContractApprovals",
    "DebugApex",
    "DefaultWorkflowUser",
    "EnableSetPasswordInApi",
    "Entitlements",
    "ForceComPlatform",
    "Knowledge",
    "LiveAgent",
    "MultiCurrency",
    "PersonAccounts",
    "ServiceCloud",
    "Sites",
];

pub const DEFAULT_COUNTRY: &str = "US";
pub const DEFAULT_LANGUAGE: &str = "en_US";

// ---------------------------------------------------------------------------
// ScratchOrgDefinition
// ---------------------------------------------------------------------------

/// The scratch org definition document handed to `force:org:create -f`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScratchOrgDefinition {
    pub org_name: String,
    pub edition: String,
    pub admin_email: String,
    pub has_sample_data: bool,
    #[serde(default)]
    pub description: String,
    pub country: String,
    pub language: String,
    pub features: Vec<String>,
}

/// Replace whatever definition is at `path` with `def`.
///
/// Any failure is reported as `DefinitionWrite` so the caller can stop
/// before creation runs against a stale or missing file.
pub fn write(path: &Path, def: &ScratchOrgDefinition) -> Result<()> {
    let wrap = |reason: String| DxError::DefinitionWrite {
        path: path.display().to_string(),
        reason,
    };

    if let Some(parent) = path.parent() {
        ensure_dir(parent).map_err(|e| wrap(e.to_string()))?;
    }
    if remove_if_exists(path).map_err(|e| wrap(e.to_string()))? {
        tracing::debug!(path = %path.display(), "replaced previous definition");
    }
    let json = serde_json::to_string_pretty(def).map_err(|e| wrap(e.to_string()))?;
    atomic_write(path, json.as_bytes()).map_err(|e| wrap(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> ScratchOrgDefinition {
        ScratchOrgDefinition {
            org_name: "A".into(),
            edition: "Developer".into(),
            admin_email: "admin@example.com".into(),
            has_sample_data: false,
            description: "demo".into(),
            country: "US".into(),
            language: "en_US".into(),
            features: vec!["API".into(), "AuthorApex".into()],
        }
    }

    #[test]
    fn write_replaces_previous_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config/scratch-org-def.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "stale").unwrap();

        write(&path, &sample()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["orgName"], "A");
        assert_eq!(value["hasSampleData"], false);
        assert_eq!(value["features"][1], "AuthorApex");
    }

    #[test]
    fn write_into_unwritable_location_is_definition_write() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("config");
        std::fs::write(&blocker, "a file, not a dir").unwrap();

        let err = write(&blocker.join("scratch-org-def.json"), &sample()).unwrap_err();
        assert!(matches!(err, DxError::DefinitionWrite { .. }));
    }

    #[test]
    fn default_choices_are_listed() {
        assert!(COUNTRIES.iter().any(|(code, _)| *code == DEFAULT_COUNTRY));
        assert!(LANGUAGES.iter().any(|(code, _)| *code == DEFAULT_LANGUAGE));
    }
}
