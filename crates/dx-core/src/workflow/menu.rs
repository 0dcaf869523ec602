//! Main menu state machine.
//!
//! ```text
//! MainMenu ──select──▶ Dispatching ──round done / cancel──▶ MainMenu
//!                           │
//!                           └──exit──▶ SessionEnd
//! ```
//!
//! Selected actions run one after another in priority order. A cancelled
//! workflow ends the round; a failed one lets the rest of the round run.

use super::{manage, org, project, Outcome, Session};
use crate::context::{Pins, WorkflowContext};
use crate::error::Result;
use crate::inventory;
use crate::io;
use crate::prompt::{Choice, Console, MultiSelectPrompt, Pick, SelectPrompt};
use crate::runner::CommandRunner;
use std::collections::BTreeSet;
use std::path::Path;

/// Process exit status once the session ends. Non-zero tells a wrapping
/// shell script to stop; it does not signal an error.
pub const SESSION_END_EXIT_CODE: i32 = 1;

pub const MENU_REQUIRED_MESSAGE: &str = "Must Select at least one option";

// ---------------------------------------------------------------------------
// Menu actions
// ---------------------------------------------------------------------------

/// Variant order is dispatch priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MenuAction {
    CreateProject,
    OpenProject,
    CreateOrg,
    Manage,
    Exit,
}

impl MenuAction {
    /// Order shown in the menu.
    pub const DISPLAY: [MenuAction; 5] = [
        MenuAction::CreateProject,
        MenuAction::CreateOrg,
        MenuAction::Manage,
        MenuAction::OpenProject,
        MenuAction::Exit,
    ];

    pub fn value(self) -> &'static str {
        match self {
            MenuAction::CreateProject => "create-project",
            MenuAction::OpenProject => "open-project",
            MenuAction::CreateOrg => "create-org",
            MenuAction::Manage => "manage-dx",
            MenuAction::Exit => "exit",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::CreateProject => "New Project",
            MenuAction::OpenProject => "Open Project Folder",
            MenuAction::CreateOrg => "New Scratch Org",
            MenuAction::Manage => "Manage DX",
            MenuAction::Exit => "Exit",
        }
    }

    pub fn parse(s: &str) -> Option<MenuAction> {
        Self::DISPLAY.into_iter().find(|a| a.value() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MenuSelection {
    pub actions: BTreeSet<MenuAction>,
    pub project_name: Option<String>,
    pub existing_project: Option<Pick>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    Dispatching(MenuSelection),
    SessionEnd,
}

// -- prompt visibility ------------------------------------------------------

pub fn asks_project_name(actions: &BTreeSet<MenuAction>) -> bool {
    actions.contains(&MenuAction::CreateProject)
}

pub fn asks_existing_project(actions: &BTreeSet<MenuAction>) -> bool {
    actions.contains(&MenuAction::OpenProject)
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Resolve defaults and list project folders for a new session.
pub fn start<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    pins: Pins,
) -> Result<WorkflowContext> {
    session.console.busy("Pulling DX defaults...");
    let resolution = inventory::resolve(&session.builder, &mut session.runner)?;
    if resolution.is_failed() {
        session.console.failure("Failed to pull defaults");
    } else {
        session.console.success("Pulled defaults successfully");
    }
    let mut ctx = WorkflowContext::new(resolution, pins);
    ctx.scan_projects(&session.root, &session.config.scratch_dir)?;
    Ok(ctx)
}

/// Drive the menu until the user exits.
pub fn run<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    ctx: &mut WorkflowContext,
) -> Result<()> {
    let mut state = MenuState::MainMenu;
    loop {
        state = match state {
            MenuState::MainMenu => {
                if ctx.is_stale() {
                    session.refresh(ctx)?;
                }
                MenuState::Dispatching(present(session, ctx)?)
            }
            MenuState::Dispatching(selection) => dispatch(session, ctx, selection)?,
            MenuState::SessionEnd => return Ok(()),
        };
    }
}

fn present<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    ctx: &mut WorkflowContext,
) -> Result<MenuSelection> {
    let banner = ctx.banner();
    session.console.banner(&banner);

    let choices = MenuAction::DISPLAY
        .iter()
        .map(|a| Choice::new(a.label(), a.value()))
        .collect();
    let prompt = MultiSelectPrompt::new("main_menu", "What would you like to do ?", choices)
        .require_one(MENU_REQUIRED_MESSAGE);
    let actions: BTreeSet<MenuAction> = session
        .many(ctx, prompt)?
        .iter()
        .filter_map(|v| MenuAction::parse(v))
        .collect();

    let mut selection = MenuSelection {
        actions,
        ..MenuSelection::default()
    };
    if asks_project_name(&selection.actions) {
        let prompt = project::name_prompt(&session.root);
        selection.project_name = Some(session.text(ctx, prompt)?);
    }
    if asks_existing_project(&selection.actions) {
        selection.existing_project = Some(ask_existing_project(session, ctx)?);
    }
    Ok(selection)
}

fn ask_existing_project<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    ctx: &mut WorkflowContext,
) -> Result<Pick> {
    if ctx.candidate_projects.is_empty() {
        session.console.status("No project folders found");
        return Ok(Pick::Cancelled);
    }
    let choices = ctx
        .candidate_projects
        .iter()
        .map(|p| Choice::new(p.display_name.as_str(), p.full_path.display().to_string()))
        .collect();
    session.pick(
        ctx,
        SelectPrompt::new("existing_project", "Select Project :", choices).cancellable(),
    )
}

fn dispatch<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    ctx: &mut WorkflowContext,
    selection: MenuSelection,
) -> Result<MenuState> {
    ctx.created_project = None;

    for action in &selection.actions {
        tracing::debug!(action = action.value(), "dispatching");
        let outcome = match action {
            MenuAction::CreateProject => {
                project::run(session, ctx, selection.project_name.as_deref())?
            }
            MenuAction::OpenProject => {
                if let Some(Pick::Value(path)) = &selection.existing_project {
                    session.open_in_editor(Path::new(path));
                }
                Outcome::Completed
            }
            MenuAction::CreateOrg => org::run(session, ctx)?,
            MenuAction::Manage => manage::run(session, ctx)?,
            MenuAction::Exit => {
                cleanup(session, ctx)?;
                return Ok(MenuState::SessionEnd);
            }
        };
        match outcome {
            Outcome::Cancelled => return Ok(MenuState::MainMenu),
            Outcome::Failed(what) => tracing::warn!(action = %what, "workflow failed"),
            Outcome::Completed => {}
        }
    }
    Ok(MenuState::MainMenu)
}

/// Remove the scratch folder this session created.
pub fn cleanup<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    ctx: &mut WorkflowContext,
) -> Result<()> {
    if let Some(dir) = ctx.scratch_dir.take() {
        if io::remove_dir_if_exists(&dir)? {
            session
                .console
                .status(&format!("-- cleanup {}", dir.display()));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
