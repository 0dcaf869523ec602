use dx_core::command::ExternalCommand;
use dx_core::runner::{CommandOutcome, CommandRunner, OutputMode};
use dx_core::{DxError, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Runs commands as child processes of this one, from `cwd`.
pub struct SystemRunner {
    cwd: PathBuf,
}

impl SystemRunner {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, cmd: &ExternalCommand, mode: OutputMode) -> Result<CommandOutcome> {
        let program = which::which(&cmd.program)
            .map_err(|_| DxError::CliNotInstalled(cmd.program.clone()))?;

        let mut child = Command::new(program);
        child.args(&cmd.args).current_dir(&self.cwd);

        match mode {
            OutputMode::Capture => {
                let output = child
                    .stdin(Stdio::null())
                    .output()
                    .map_err(|e| DxError::Spawn(format!("{}: {e}", cmd.program)))?;
                let stderr = String::from_utf8_lossy(&output.stderr);
                if !stderr.trim().is_empty() {
                    tracing::debug!(stderr = %stderr.trim(), "captured stderr");
                }
                Ok(CommandOutcome {
                    code: output.status.code().unwrap_or(-1),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                })
            }
            OutputMode::Inherit => {
                let status = child
                    .status()
                    .map_err(|e| DxError::Spawn(format!("{}: {e}", cmd.program)))?;
                Ok(CommandOutcome {
                    code: status.code().unwrap_or(-1),
                    stdout: String::new(),
                })
            }
        }
    }
}
