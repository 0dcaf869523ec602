use thiserror::Error;

#[derive(Debug, Error)]
pub enum DxError {
    #[error("could not read the org list: {0}")]
    ResolutionFailed(String),

    #[error("{action} failed (exit code {code})")]
    ExternalCommandFailed { action: String, code: i32 },

    #[error("unsupported action: {0}")]
    UnsupportedAction(String),

    #[error("parameter '{param}' is not accepted by {action}")]
    UnsupportedParameter { action: String, param: String },

    #[error("'{0}' not found on PATH")]
    CliNotInstalled(String),

    #[error("failed to spawn command: {0}")]
    Spawn(String),

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error("invalid name '{0}': use letters, digits, '.', '_' or '-'")]
    InvalidName(String),

    #[error("failed to write definition file {path}: {reason}")]
    DefinitionWrite { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DxError>;
