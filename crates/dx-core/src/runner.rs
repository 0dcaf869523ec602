//! Execution seam for external commands.
//!
//! Every call blocks until the child exits; there is no timeout. A hung
//! platform CLI hangs the session, the same as running it by hand.

use crate::command::ExternalCommand;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Collect stdout (and swallow stderr) for parsing.
    Capture,
    /// Let the child write straight to the terminal.
    Inherit,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutcome {
    pub code: i32,
    /// Empty in [`OutputMode::Inherit`].
    pub stdout: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

pub trait CommandRunner {
    /// Run `cmd` to completion. A non-zero exit is an `Ok` outcome;
    /// `Err` means the command could not be started at all.
    fn run(&mut self, cmd: &ExternalCommand, mode: OutputMode) -> Result<CommandOutcome>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &mut T {
    fn run(&mut self, cmd: &ExternalCommand, mode: OutputMode) -> Result<CommandOutcome> {
        (**self).run(cmd, mode)
    }
}
