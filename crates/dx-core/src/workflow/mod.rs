//! Interactive workflows.
//!
//! A [`Session`] bundles configuration with the two seams (command runner and
//! console). Each workflow takes the session plus the shared
//! [`WorkflowContext`] and reports an [`Outcome`]; the menu decides what
//! happens next.

pub mod connect;
pub mod manage;
pub mod menu;
pub mod org;
pub mod project;

use crate::command::{CommandBuilder, CommandIntent, ExternalCommand};
use crate::config::Config;
use crate::context::WorkflowContext;
use crate::error::{DxError, Result};
use crate::inventory;
use crate::prompt::{
    ask_many, ask_text, ConfirmPrompt, Console, InputPrompt, MultiSelectPrompt, Pick, SelectPrompt,
};
use crate::runner::{CommandOutcome, CommandRunner, OutputMode};
use std::path::{Path, PathBuf};

/// Exit code reported for a command that could not be started.
pub const NOT_STARTED_CODE: i32 = 127;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// An external command failed; the message names the attempted action.
    Failed(String),
    Cancelled,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct Session<R, C> {
    pub config: Config,
    pub root: PathBuf,
    builder: CommandBuilder,
    pub runner: R,
    pub console: C,
}

impl<R: CommandRunner, C: Console> Session<R, C> {
    pub fn new(config: Config, root: impl Into<PathBuf>, runner: R, console: C) -> Self {
        let builder = CommandBuilder::new(config.cli.clone());
        Self {
            config,
            root: root.into(),
            builder,
            runner,
            console,
        }
    }

    /// Build and run one intent.
    ///
    /// A platform CLI that cannot be started is shown as a failure and
    /// reported as exit code [`NOT_STARTED_CODE`]; only contract violations
    /// (unsupported actions or parameters) come back as `Err`.
    pub fn execute(&mut self, intent: &CommandIntent, mode: OutputMode) -> Result<CommandOutcome> {
        let cmd = self.builder.build(intent).inspect_err(|e| {
            tracing::error!(action = %intent.action, error = %e, "command contract violated");
        })?;
        match mode {
            OutputMode::Inherit => self.console.status(&format!("Run : {cmd}")),
            OutputMode::Capture => self.console.busy(&format!("Run : {cmd}")),
        }
        self.run(&cmd, mode)
    }

    fn run(&mut self, cmd: &ExternalCommand, mode: OutputMode) -> Result<CommandOutcome> {
        tracing::info!(command = %cmd, "running");
        match self.runner.run(cmd, mode) {
            Ok(outcome) => {
                tracing::debug!(code = outcome.code, "finished");
                Ok(outcome)
            }
            Err(e @ (DxError::CliNotInstalled(_) | DxError::Spawn(_))) => {
                tracing::warn!(error = %e, "command not started");
                self.console.failure(&e.to_string());
                Ok(CommandOutcome {
                    code: NOT_STARTED_CODE,
                    stdout: String::new(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Re-read the org list and the project folders.
    pub fn refresh(&mut self, ctx: &mut WorkflowContext) -> Result<()> {
        tracing::debug!("refreshing org defaults");
        let resolution = inventory::resolve(&self.builder, &mut self.runner)?;
        ctx.apply_resolution(resolution);
        ctx.scan_projects(&self.root, &self.config.scratch_dir)
    }

    // -- prompts ------------------------------------------------------------

    pub fn text(&mut self, ctx: &mut WorkflowContext, prompt: InputPrompt) -> Result<String> {
        let answer = ask_text(&mut self.console, &prompt)?;
        ctx.remember(prompt.name, answer.clone());
        Ok(answer)
    }

    pub fn confirm(&mut self, ctx: &mut WorkflowContext, prompt: ConfirmPrompt) -> Result<bool> {
        let answer = self.console.confirm(&prompt)?;
        ctx.remember(prompt.name, answer.to_string());
        Ok(answer)
    }

    pub fn pick(&mut self, ctx: &mut WorkflowContext, prompt: SelectPrompt) -> Result<Pick> {
        let answer = self.console.select(&prompt)?;
        if let Pick::Value(v) = &answer {
            ctx.remember(prompt.name, v.clone());
        }
        Ok(answer)
    }

    pub fn many(
        &mut self,
        ctx: &mut WorkflowContext,
        prompt: MultiSelectPrompt,
    ) -> Result<Vec<String>> {
        let answer = ask_many(&mut self.console, &prompt)?;
        ctx.remember(prompt.name, answer.join(","));
        Ok(answer)
    }

    // -- side effects -------------------------------------------------------

    /// Open `path` in the configured editor, falling back to the OS opener
    /// when the editor is not installed. Never fails the workflow.
    pub fn open_in_editor(&mut self, path: &Path) {
        let cmd = ExternalCommand::new(
            self.config.editor.clone(),
            [path.display().to_string()],
        );
        tracing::info!(command = %cmd, "launching editor");
        match self.runner.run(&cmd, OutputMode::Inherit) {
            Ok(outcome) if outcome.success() => {}
            Ok(outcome) => tracing::warn!(code = outcome.code, "editor exited non-zero"),
            Err(e) => {
                tracing::warn!(error = %e, "editor unavailable, using system opener");
                if let Err(e) = open::that(path) {
                    tracing::warn!(error = %e, path = %path.display(), "could not open folder");
                }
            }
        }
    }

    /// Announce `text` when speech is enabled.
    pub fn say(&mut self, text: &str) {
        if !self.config.speech {
            return;
        }
        let cmd = ExternalCommand::new(self.config.speech_command.clone(), [text]);
        match self.runner.run(&cmd, OutputMode::Capture) {
            Ok(outcome) if outcome.success() => {}
            Ok(outcome) => tracing::warn!(code = outcome.code, "speech exited non-zero"),
            Err(e) => tracing::warn!(error = %e, "speech unavailable"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::command::{Action, Param};
    use crate::context::Pins;
    use crate::inventory::Resolution;
    use crate::testing::{FakeRunner, ScriptedConsole};

    pub(crate) fn session(
        root: &Path,
        runner: FakeRunner,
        console: ScriptedConsole,
    ) -> Session<FakeRunner, ScriptedConsole> {
        Session::new(Config::default(), root, runner, console)
    }

    pub(crate) fn context(list_json: &str) -> WorkflowContext {
        let mut runner = FakeRunner::new().stdout("force:org:list", list_json);
        let resolution =
            inventory::resolve(&CommandBuilder::new("sfdx"), &mut runner).unwrap();
        WorkflowContext::new(resolution, Pins::default())
    }

    #[test]
    fn unstartable_cli_is_a_failed_outcome() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut s = session(
            dir.path(),
            FakeRunner::new().unstartable("sfdx"),
            ScriptedConsole::new(),
        );
        let intent = CommandIntent::new(Action::EnvOpen).value(Param::TargetOrg, "x");
        let outcome = s.execute(&intent, OutputMode::Inherit).unwrap();
        assert_eq!(outcome.code, NOT_STARTED_CODE);
        assert_eq!(s.console.failures.len(), 1);
    }

    #[test]
    fn contract_violation_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut s = session(dir.path(), FakeRunner::new(), ScriptedConsole::new());
        let intent = CommandIntent::new(Action::EnvOpen).value(Param::Namespace, "ns");
        assert!(matches!(
            s.execute(&intent, OutputMode::Inherit),
            Err(DxError::UnsupportedParameter { .. })
        ));
        assert!(s.runner.calls.is_empty());
    }

    #[test]
    fn speech_is_off_by_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut s = session(dir.path(), FakeRunner::new(), ScriptedConsole::new());
        s.say("hello");
        assert!(s.runner.calls.is_empty());

        s.config.speech = true;
        s.say("hello there");
        assert_eq!(s.runner.rendered(), vec!["say 'hello there'"]);
    }

    #[test]
    fn refresh_rescans_projects() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut ctx = WorkflowContext::new(Resolution::failed("x"), Pins::default());
        std::fs::create_dir(dir.path().join("Fresh")).unwrap();

        let mut s = session(
            dir.path(),
            FakeRunner::new().stdout("force:org:list", r#"{"result":{}}"#),
            ScriptedConsole::new(),
        );
        s.refresh(&mut ctx).unwrap();
        assert!(!ctx.banner().to_string().contains("NOT CONNECTED"));
        assert_eq!(ctx.candidate_projects[0].display_name, "Fresh");
    }
}
