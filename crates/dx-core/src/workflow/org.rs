//! Scratch org creation.
//!
//! Every step runs only if the previous one succeeded: definition document,
//! `force:org:create`, then password generation and user display. Opening
//! the new org happens afterwards in [`run`] and is best-effort.

use super::{Outcome, Session};
use crate::command::{Action, CommandIntent, Param};
use crate::context::WorkflowContext;
use crate::definition::{
    self, ScratchOrgDefinition, COUNTRIES, DEFAULT_COUNTRY, DEFAULT_LANGUAGE, EDITIONS, FEATURES,
    LANGUAGES,
};
use crate::error::Result;
use crate::io;
use crate::paths::{self, DEFINITION_FILE};
use crate::prompt::{
    require_value, valid_days, valid_name, Choice, ConfirmPrompt, Console, InputPrompt,
    MultiSelectPrompt, Pick, SelectPrompt,
};
use crate::runner::{CommandRunner, OutputMode};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provision {
    /// The org exists; carries its alias.
    Created(String),
    Stopped(Outcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgAnswers {
    pub hub: String,
    pub alias: String,
    pub admin_email: String,
    pub has_sample_data: bool,
    pub days: u32,
    pub description: String,
    pub set_default: bool,
    /// Existing definition chosen instead of writing a new one.
    pub reuse: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Definition location
// ---------------------------------------------------------------------------

/// Where the definition document lives: the project created earlier in this
/// round, else the root project, else the scratch folder.
///
/// The scratch folder is recorded for exit-time removal only when this
/// session creates it.
pub fn definition_dir<R: CommandRunner, C: Console>(
    session: &Session<R, C>,
    ctx: &mut WorkflowContext,
) -> Result<PathBuf> {
    if let Some(project) = &ctx.created_project {
        return Ok(paths::project_config_dir(project));
    }
    if paths::is_project(&session.root) {
        return Ok(paths::project_config_dir(&session.root));
    }
    let scratch = paths::scratch_dir(&session.root, &session.config.scratch_dir);
    if !scratch.exists() {
        io::ensure_dir(&scratch)?;
        tracing::debug!(path = %scratch.display(), "created scratch folder");
        ctx.scratch_dir = Some(scratch.clone());
    }
    Ok(scratch)
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

fn ask_hub<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    ctx: &mut WorkflowContext,
) -> Result<Pick> {
    if let Some(hub) = ctx.hub() {
        return Ok(Pick::Value(hub.to_string()));
    }
    let hubs = ctx.defaults.inventory.persistent_aliases();
    if hubs.is_empty() {
        let hub = session.text(
            ctx,
            InputPrompt::new("devhub", "DevHub alias name").validate(valid_name),
        )?;
        return Ok(Pick::Value(hub));
    }
    let choices = hubs.into_iter().map(Choice::same).collect();
    session.pick(
        ctx,
        SelectPrompt::new("devhub", "DevHub alias name", choices).cancellable(),
    )
}

/// `None` means the user cancelled.
fn collect<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    ctx: &mut WorkflowContext,
    dir: &Path,
) -> Result<Option<OrgAnswers>> {
    let Pick::Value(hub) = ask_hub(session, ctx)? else {
        return Ok(None);
    };
    let alias = session.text(
        ctx,
        InputPrompt::new("alias", "Your Scratch Org name").validate(valid_name),
    )?;
    let admin_email = session.text(
        ctx,
        InputPrompt::new("admin_email", "Admin Email")
            .default_value(session.config.default_admin_email.clone())
            .validate(require_value),
    )?;
    let has_sample_data =
        session.confirm(ctx, ConfirmPrompt::new("sample_data", "Add Sample Data", false))?;
    let days = session
        .text(
            ctx,
            InputPrompt::new("days", "Number of days")
                .default_value(session.config.default_duration_days.to_string())
                .validate(valid_days),
        )?
        .parse::<u32>()
        .unwrap_or(session.config.default_duration_days);
    let description = session.text(
        ctx,
        InputPrompt::new("org_description", "Org Description").default_value(""),
    )?;
    let set_default =
        session.confirm(ctx, ConfirmPrompt::new("set_default", "Set as default org", true))?;

    let existing = io::list_files_with_extension(dir, "json")?;
    let mut reuse = None;
    if !existing.is_empty()
        && session.confirm(
            ctx,
            ConfirmPrompt::new("reuse_definition", "Use an existing definition file", false),
        )?
    {
        let default = dir.join(DEFINITION_FILE).display().to_string();
        let choices = existing
            .iter()
            .map(|p| {
                let label = p
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Choice::new(label, p.display().to_string())
            })
            .collect();
        let prompt = SelectPrompt::new("definition_file", "Select definition file :", choices)
            .default_value(default)
            .cancellable();
        match session.pick(ctx, prompt)? {
            Pick::Value(path) => reuse = Some(PathBuf::from(path)),
            Pick::Cancelled => return Ok(None),
        }
    }

    Ok(Some(OrgAnswers {
        hub,
        alias,
        admin_email,
        has_sample_data,
        days,
        description,
        set_default,
        reuse,
    }))
}

fn plain_choices(list: &[&str]) -> Vec<Choice> {
    list.iter().map(|v| Choice::same(*v)).collect()
}

/// "United States (US)" shown, "US" stored.
fn coded_choices(list: &[(&str, &str)]) -> Vec<Choice> {
    list.iter()
        .map(|(code, label)| Choice::new(format!("{label} ({code})"), *code))
        .collect()
}

/// `None` means the user cancelled.
fn ask_definition<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    ctx: &mut WorkflowContext,
    answers: &OrgAnswers,
) -> Result<Option<ScratchOrgDefinition>> {
    let prompt = SelectPrompt::new("edition", "Choose Edition:", plain_choices(EDITIONS))
        .cancellable();
    let Pick::Value(edition) = session.pick(ctx, prompt)? else {
        return Ok(None);
    };
    let prompt = SelectPrompt::new("country", "Choose Country:", coded_choices(COUNTRIES))
        .default_value(DEFAULT_COUNTRY)
        .cancellable();
    let Pick::Value(country) = session.pick(ctx, prompt)? else {
        return Ok(None);
    };
    let prompt = SelectPrompt::new("language", "Choose Language:", coded_choices(LANGUAGES))
        .default_value(DEFAULT_LANGUAGE)
        .cancellable();
    let Pick::Value(language) = session.pick(ctx, prompt)? else {
        return Ok(None);
    };
    let features = session.many(
        ctx,
        MultiSelectPrompt::new(
            "features",
            "Which features would you like to enable?",
            plain_choices(FEATURES),
        )
        .require_one("Please enter at least one selection"),
    )?;

    Ok(Some(ScratchOrgDefinition {
        org_name: answers.alias.clone(),
        edition,
        admin_email: answers.admin_email.clone(),
        has_sample_data: answers.has_sample_data,
        description: answers.description.clone(),
        country,
        language,
        features,
    }))
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Collect answers, write the definition, create the org and surface its
/// credentials. Does not open the org.
pub fn provision<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    ctx: &mut WorkflowContext,
) -> Result<Provision> {
    let dir = definition_dir(session, ctx)?;
    let Some(answers) = collect(session, ctx, &dir)? else {
        return Ok(Provision::Stopped(Outcome::Cancelled));
    };

    let definition_path = match &answers.reuse {
        Some(path) => path.clone(),
        None => {
            let Some(def) = ask_definition(session, ctx, &answers)? else {
                return Ok(Provision::Stopped(Outcome::Cancelled));
            };
            let path = dir.join(DEFINITION_FILE);
            session
                .console
                .busy(&format!("Writing scratch org definition for {}", answers.alias));
            if let Err(e) = definition::write(&path, &def) {
                tracing::warn!(error = %e, "definition not written");
                session.console.failure(&e.to_string());
                return Ok(Provision::Stopped(Outcome::Failed(e.to_string())));
            }
            session.console.success("created successfully scratch-org-def.json");
            path
        }
    };
    let shown_path = definition_path
        .strip_prefix(&session.root)
        .unwrap_or(&definition_path)
        .display()
        .to_string();

    let create = CommandIntent::new(Action::EnvCreate)
        .value(Param::DurationDays, answers.days.to_string())
        .value(Param::Alias, answers.alias.as_str())
        .value(Param::DefinitionFile, shown_path)
        .value(Param::TargetHub, answers.hub.as_str())
        .switch(Param::SetDefault, answers.set_default);
    let outcome = session.execute(&create, OutputMode::Inherit)?;
    if !outcome.success() {
        session.console.failure("Failed to create scratch org");
        return Ok(Provision::Stopped(Outcome::Failed(
            Action::EnvCreate.label().to_string(),
        )));
    }

    session
        .console
        .success(&format!("created successfully scratch org {}", answers.alias));
    let expires = chrono::Local::now().date_naive() + chrono::Days::new(u64::from(answers.days));
    session
        .console
        .status(&format!("Expires on {}", expires.format("%Y-%m-%d")));
    ctx.mark_stale();
    if answers.set_default {
        ctx.pin_ephemeral(&answers.alias);
    }

    let credentials = CommandIntent::new(Action::PasswordGenerate)
        .value(Param::TargetOrg, answers.alias.as_str())
        .value(Param::TargetHub, answers.hub.as_str());
    let generated = session.execute(&credentials, OutputMode::Capture)?;
    if generated.success() {
        session.console.success("Generated user password");
        let display = CommandIntent::new(Action::UserDisplay)
            .value(Param::TargetOrg, answers.alias.as_str())
            .value(Param::TargetHub, answers.hub.as_str());
        let shown = session.execute(&display, OutputMode::Inherit)?;
        if !shown.success() {
            tracing::warn!(code = shown.code, "user display failed");
        }
    } else {
        tracing::warn!(code = generated.code, "password generation failed");
        session.console.failure("Could not generate a user password");
    }

    Ok(Provision::Created(answers.alias))
}

/// Create a scratch org, then announce and open it.
pub fn run<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    ctx: &mut WorkflowContext,
) -> Result<Outcome> {
    match provision(session, ctx)? {
        Provision::Created(alias) => {
            finish(session, &alias)?;
            Ok(Outcome::Completed)
        }
        Provision::Stopped(outcome) => Ok(outcome),
    }
}

fn finish<R: CommandRunner, C: Console>(session: &mut Session<R, C>, alias: &str) -> Result<()> {
    session.say("Your Scratch Org has been created");
    session
        .console
        .status(&format!("opening scratch org with alias {alias}"));
    let open = CommandIntent::new(Action::EnvOpen).value(Param::TargetOrg, alias);
    let outcome = session.execute(&open, OutputMode::Inherit)?;
    if !outcome.success() {
        tracing::warn!(code = outcome.code, alias, "could not open new org");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
