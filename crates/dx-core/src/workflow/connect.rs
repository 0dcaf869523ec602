use super::{Outcome, Session};
use crate::command::{Action, CommandIntent, Param};
use crate::context::WorkflowContext;
use crate::error::Result;
use crate::paths;
use crate::prompt::{valid_name, Choice, ConfirmPrompt, Console, InputPrompt, Pick, SelectPrompt};
use crate::runner::{CommandRunner, OutputMode};

pub const PRODUCTION_URL: &str = "https://login.salesforce.com";
pub const SANDBOX_URL: &str = "https://test.salesforce.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrgType {
    DevHub,
    Production,
    Sandbox,
}

impl OrgType {
    pub const ALL: [OrgType; 3] = [OrgType::DevHub, OrgType::Production, OrgType::Sandbox];

    pub fn as_str(self) -> &'static str {
        match self {
            OrgType::DevHub => "DevHub",
            OrgType::Production => "Production",
            OrgType::Sandbox => "Sandbox",
        }
    }

    pub fn parse(s: &str) -> Option<OrgType> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Login URL passed as `-r`; a DevHub uses the hub-default flag instead.
    pub fn instance_url(self) -> Option<&'static str> {
        match self {
            OrgType::DevHub => None,
            OrgType::Production => Some(PRODUCTION_URL),
            OrgType::Sandbox => Some(SANDBOX_URL),
        }
    }
}

/// Authorize an org through the browser login flow.
pub fn run<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    ctx: &mut WorkflowContext,
    preset_alias: Option<&str>,
) -> Result<Outcome> {
    let alias = match preset_alias {
        Some(alias) => {
            paths::validate_name(alias)?;
            alias.to_string()
        }
        None => session.text(
            ctx,
            InputPrompt::new("org_alias", "Org alias Name").validate(valid_name),
        )?,
    };

    let choices = OrgType::ALL
        .iter()
        .map(|t| Choice::same(t.as_str()))
        .collect();
    let prompt = SelectPrompt::new("org_type", "Choose Org Type:", choices)
        .default_value(OrgType::DevHub.as_str())
        .cancellable();
    let org_type = match session.pick(ctx, prompt)? {
        Pick::Value(v) => OrgType::parse(&v).unwrap_or(OrgType::DevHub),
        Pick::Cancelled => return Ok(Outcome::Cancelled),
    };
    let set_default = session.confirm(
        ctx,
        ConfirmPrompt::new("connect_default", "Set as default org", false),
    )?;

    let intent = CommandIntent::new(Action::Auth)
        .value(Param::Alias, alias.as_str())
        .switch(Param::SetDefaultHub, org_type == OrgType::DevHub)
        .opt_value(Param::InstanceUrl, org_type.instance_url())
        .switch(Param::SetDefault, set_default);
    session.console.status(&format!("Connecting to {alias}"));
    let outcome = session.execute(&intent, OutputMode::Inherit)?;
    if !outcome.success() {
        session.console.failure(&format!("Failed to connect {alias}"));
        return Ok(Outcome::Failed(Action::Auth.label().to_string()));
    }

    session.console.success("Opened connection successfully");
    if org_type == OrgType::DevHub {
        ctx.pin_hub(&alias);
    }
    ctx.mark_stale();
    Ok(Outcome::Completed)
}
