use super::{connect, Outcome, Session};
use crate::command::{Action, CommandIntent, Param};
use crate::context::WorkflowContext;
use crate::error::Result;
use crate::prompt::{Choice, Console, Pick, SelectPrompt};
use crate::runner::{CommandRunner, OutputMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManageOption {
    Open,
    Delete,
    Connect,
    Configure,
}

impl ManageOption {
    pub const ALL: [ManageOption; 4] = [
        ManageOption::Open,
        ManageOption::Delete,
        ManageOption::Connect,
        ManageOption::Configure,
    ];

    pub fn value(self) -> &'static str {
        match self {
            ManageOption::Open => "open",
            ManageOption::Delete => "delete",
            ManageOption::Connect => "connect",
            ManageOption::Configure => "settings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ManageOption::Open => "Open Org",
            ManageOption::Delete => "Delete Scratch Org",
            ManageOption::Connect => "Connect Org",
            ManageOption::Configure => "Configure Defaults",
        }
    }

    fn parse(s: &str) -> Option<ManageOption> {
        Self::ALL.into_iter().find(|o| o.value() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefaultKind {
    Hub,
    Scratch,
}

impl DefaultKind {
    fn label(self) -> &'static str {
        match self {
            DefaultKind::Hub => "DevHub",
            DefaultKind::Scratch => "Scratch Org",
        }
    }

    fn config_key(self) -> &'static str {
        match self {
            DefaultKind::Hub => "defaultdevhubusername",
            DefaultKind::Scratch => "defaultusername",
        }
    }
}

/// One management action over existing orgs.
pub fn run<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    ctx: &mut WorkflowContext,
) -> Result<Outcome> {
    let choices = ManageOption::ALL
        .iter()
        .map(|o| Choice::new(o.label(), o.value()))
        .collect();
    let prompt = SelectPrompt::new("manage_option", "Select Option :", choices).cancellable();
    let option = match session.pick(ctx, prompt)? {
        Pick::Value(v) => ManageOption::parse(&v),
        Pick::Cancelled => None,
    };

    match option {
        None => Ok(Outcome::Cancelled),
        Some(ManageOption::Open) => open(session, ctx),
        Some(ManageOption::Delete) => delete(session, ctx),
        Some(ManageOption::Connect) => connect::run(session, ctx, None),
        Some(ManageOption::Configure) => configure(session, ctx),
    }
}

/// Cancellable pick over `aliases`, preselecting `default`. An empty list
/// counts as a cancel.
fn pick_alias<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    ctx: &mut WorkflowContext,
    name: &'static str,
    message: &str,
    aliases: Vec<String>,
    default: String,
) -> Result<Option<String>> {
    if aliases.is_empty() {
        session.console.status("No matching orgs are connected");
        return Ok(None);
    }
    let choices = aliases.into_iter().map(Choice::same).collect();
    let prompt = SelectPrompt::new(name, message, choices)
        .default_value(default)
        .cancellable();
    Ok(match session.pick(ctx, prompt)? {
        Pick::Value(alias) => Some(alias),
        Pick::Cancelled => None,
    })
}

fn open<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    ctx: &mut WorkflowContext,
) -> Result<Outcome> {
    let aliases = ctx.defaults.inventory.all_aliases();
    let default = ctx.defaults.ephemeral_alias().to_string();
    let Some(alias) = pick_alias(session, ctx, "org_alias", "Select Org :", aliases, default)?
    else {
        return Ok(Outcome::Cancelled);
    };

    let intent = CommandIntent::new(Action::EnvOpen).value(Param::TargetOrg, alias.as_str());
    if session.execute(&intent, OutputMode::Inherit)?.success() {
        session.console.success(&format!("Will open org {alias}"));
        Ok(Outcome::Completed)
    } else {
        session.console.failure("Failed to open org");
        Ok(Outcome::Failed(Action::EnvOpen.label().to_string()))
    }
}

/// Delete always passes the no-prompt flag: picking the org is the
/// confirmation.
fn delete<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    ctx: &mut WorkflowContext,
) -> Result<Outcome> {
    let aliases = ctx.defaults.inventory.ephemeral_aliases();
    let default = ctx.defaults.ephemeral_alias().to_string();
    let Some(alias) = pick_alias(
        session,
        ctx,
        "scratch_alias",
        "Select Existing Scratch org :",
        aliases,
        default,
    )?
    else {
        return Ok(Outcome::Cancelled);
    };

    let intent = CommandIntent::new(Action::EnvDelete)
        .value(Param::TargetOrg, alias.as_str())
        .opt_value(Param::TargetHub, ctx.hub())
        .switch(Param::NoPrompt, true);
    if session.execute(&intent, OutputMode::Inherit)?.success() {
        session
            .console
            .success(&format!("Deleted org {alias} successfully !"));
        ctx.forget(&alias);
        ctx.mark_stale();
        Ok(Outcome::Completed)
    } else {
        session.console.failure("Failed to delete org");
        Ok(Outcome::Failed(Action::EnvDelete.label().to_string()))
    }
}

fn configure<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    ctx: &mut WorkflowContext,
) -> Result<Outcome> {
    let kinds = [DefaultKind::Hub, DefaultKind::Scratch];
    let choices = kinds.iter().map(|k| Choice::same(k.label())).collect();
    let prompt =
        SelectPrompt::new("configure_option", "Change Defaults for :", choices).cancellable();
    let kind = match session.pick(ctx, prompt)? {
        Pick::Value(v) if v == DefaultKind::Hub.label() => DefaultKind::Hub,
        Pick::Value(_) => DefaultKind::Scratch,
        Pick::Cancelled => return Ok(Outcome::Cancelled),
    };

    let picked = match kind {
        DefaultKind::Hub => {
            let aliases = ctx.defaults.inventory.persistent_aliases();
            let default = ctx.defaults.hub_alias().to_string();
            pick_alias(session, ctx, "other_devhub", "Select other DevHub :", aliases, default)?
        }
        DefaultKind::Scratch => {
            let aliases = ctx.defaults.inventory.ephemeral_aliases();
            let default = ctx.defaults.ephemeral_alias().to_string();
            pick_alias(
                session,
                ctx,
                "scratch_alias",
                "Select Existing Scratch org :",
                aliases,
                default,
            )?
        }
    };
    let Some(alias) = picked else {
        return Ok(Outcome::Cancelled);
    };

    let intent = CommandIntent::new(Action::ConfigSet)
        .value(Param::ConfigPair, format!("{}={alias}", kind.config_key()))
        .switch(Param::Global, true);
    if !session.execute(&intent, OutputMode::Inherit)?.success() {
        session.console.failure("Failed to configure default org");
        return Ok(Outcome::Failed(Action::ConfigSet.label().to_string()));
    }

    session.console.success(&format!(
        "set default {} configuration successfully!",
        kind.label()
    ));
    match kind {
        DefaultKind::Hub => ctx.pin_hub(&alias),
        DefaultKind::Scratch => ctx.pin_ephemeral(&alias),
    }
    ctx.mark_stale();
    Ok(Outcome::Completed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
