//! Intent → external CLI invocation.
//!
//! Each [`Action`] owns a fixed flag layout; [`CommandBuilder::build`] walks
//! that layout in order, so the same intent always renders the same argv.
//! Absent parameters, `false` booleans and empty values emit nothing.

use crate::error::{DxError, Result};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    EnvList,
    Auth,
    EnvCreate,
    EnvDelete,
    EnvOpen,
    ConfigSet,
    ProjectCreate,
    SchemaDescribe,
    PasswordGenerate,
    UserDisplay,
}

impl Action {
    /// Every action, in declaration order.
    pub fn all() -> &'static [Action] {
        &[
            Action::EnvList,
            Action::Auth,
            Action::EnvCreate,
            Action::EnvDelete,
            Action::EnvOpen,
            Action::ConfigSet,
            Action::ProjectCreate,
            Action::SchemaDescribe,
            Action::PasswordGenerate,
            Action::UserDisplay,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::EnvList => "env_list",
            Action::Auth => "auth",
            Action::EnvCreate => "env_create",
            Action::EnvDelete => "env_delete",
            Action::EnvOpen => "env_open",
            Action::ConfigSet => "config_set",
            Action::ProjectCreate => "project_create",
            Action::SchemaDescribe => "schema_describe",
            Action::PasswordGenerate => "password_generate",
            Action::UserDisplay => "user_display",
        }
    }

    /// The platform CLI topic:command for this action.
    pub fn subcommand(self) -> &'static str {
        match self {
            Action::EnvList => "force:org:list",
            Action::Auth => "force:auth:web:login",
            Action::EnvCreate => "force:org:create",
            Action::EnvDelete => "force:org:delete",
            Action::EnvOpen => "force:org:open",
            Action::ConfigSet => "force:config:set",
            Action::ProjectCreate => "force:project:create",
            Action::SchemaDescribe => "force:schema:sobject:describe",
            Action::PasswordGenerate => "force:user:password:generate",
            Action::UserDisplay => "force:user:display",
        }
    }

    /// Human wording used in failure banners.
    pub fn label(self) -> &'static str {
        match self {
            Action::EnvList => "list orgs",
            Action::Auth => "connect org",
            Action::EnvCreate => "create scratch org",
            Action::EnvDelete => "delete scratch org",
            Action::EnvOpen => "open org",
            Action::ConfigSet => "set default",
            Action::ProjectCreate => "create project",
            Action::SchemaDescribe => "describe object",
            Action::PasswordGenerate => "generate password",
            Action::UserDisplay => "display user",
        }
    }

    fn layout(self) -> &'static [(Param, Slot)] {
        use Param::*;
        use Slot::*;
        match self {
            Action::EnvList => &[(Json, Flag("--json"))],
            Action::Auth => &[
                (Alias, Flag("-a")),
                (SetDefaultHub, Flag("-d")),
                (InstanceUrl, Flag("-r")),
                (SetDefault, Flag("-s")),
            ],
            Action::EnvCreate => &[
                (DurationDays, Flag("-d")),
                (Alias, Flag("-a")),
                (DefinitionFile, Flag("-f")),
                (TargetHub, Flag("-v")),
                (SetDefault, Flag("-s")),
            ],
            Action::EnvDelete => &[
                (TargetOrg, Flag("-u")),
                (TargetHub, Flag("-v")),
                (NoPrompt, Flag("-p")),
            ],
            Action::EnvOpen => &[(TargetOrg, Flag("-u"))],
            Action::ConfigSet => &[(ConfigPair, Positional), (Global, Flag("-g"))],
            Action::ProjectCreate => &[
                (ProjectName, Flag("-n")),
                (PackageDir, Flag("-p")),
                (Namespace, Flag("-s")),
                (Template, Flag("-t")),
                (Manifest, Flag("-x")),
            ],
            Action::SchemaDescribe => &[
                (SObject, Flag("-s")),
                (TargetOrg, Flag("-u")),
                (Tooling, Flag("-t")),
                (Json, Flag("--json")),
            ],
            Action::PasswordGenerate | Action::UserDisplay => {
                &[(TargetOrg, Flag("-u")), (TargetHub, Flag("-v"))]
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsing by name is the only way to name an action outside the enum, so it
/// is the one place [`DxError::UnsupportedAction`] is produced. A built
/// [`CommandIntent`] always carries a known action and cannot hit it.
impl std::str::FromStr for Action {
    type Err = DxError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Action::all()
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| DxError::UnsupportedAction(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Params
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Param {
    Alias,
    TargetOrg,
    TargetHub,
    DurationDays,
    DefinitionFile,
    SetDefault,
    SetDefaultHub,
    InstanceUrl,
    NoPrompt,
    ConfigPair,
    Global,
    ProjectName,
    PackageDir,
    Namespace,
    Template,
    Manifest,
    SObject,
    Tooling,
    Json,
}

impl Param {
    pub fn as_str(self) -> &'static str {
        match self {
            Param::Alias => "alias",
            Param::TargetOrg => "target_org",
            Param::TargetHub => "target_hub",
            Param::DurationDays => "duration_days",
            Param::DefinitionFile => "definition_file",
            Param::SetDefault => "set_default",
            Param::SetDefaultHub => "set_default_hub",
            Param::InstanceUrl => "instance_url",
            Param::NoPrompt => "no_prompt",
            Param::ConfigPair => "config_pair",
            Param::Global => "global",
            Param::ProjectName => "project_name",
            Param::PackageDir => "package_dir",
            Param::Namespace => "namespace",
            Param::Template => "template",
            Param::Manifest => "manifest",
            Param::SObject => "sobject",
            Param::Tooling => "tooling",
            Param::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Flag(&'static str),
    Positional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Switch(bool),
    Value(String),
}

// ---------------------------------------------------------------------------
// CommandIntent
// ---------------------------------------------------------------------------

/// What the workflow wants done. Built once, consumed by [`CommandBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandIntent {
    pub action: Action,
    params: BTreeMap<Param, ParamValue>,
}

impl CommandIntent {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            params: BTreeMap::new(),
        }
    }

    pub fn value(mut self, param: Param, value: impl Into<String>) -> Self {
        self.params.insert(param, ParamValue::Value(value.into()));
        self
    }

    pub fn opt_value(self, param: Param, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.value(param, v),
            None => self,
        }
    }

    pub fn switch(mut self, param: Param, on: bool) -> Self {
        self.params.insert(param, ParamValue::Switch(on));
        self
    }

    pub fn get(&self, param: Param) -> Option<&ParamValue> {
        self.params.get(&param)
    }
}

// ---------------------------------------------------------------------------
// ExternalCommand
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ExternalCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// True if `flag` appears as an argument.
    pub fn has_arg(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }

    /// The argument following `flag`, if any.
    pub fn arg_after(&self, flag: &str) -> Option<&str> {
        let i = self.args.iter().position(|a| a == flag)?;
        self.args.get(i + 1).map(String::as_str)
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| !c.is_whitespace() && !matches!(c, '\'' | '"' | '\\' | '$' | '`'));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

// ---------------------------------------------------------------------------
// CommandBuilder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CommandBuilder {
    program: String,
}

impl CommandBuilder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn build(&self, intent: &CommandIntent) -> Result<ExternalCommand> {
        let layout = intent.action.layout();

        if let Some(stray) = intent
            .params
            .keys()
            .find(|p| !layout.iter().any(|(known, _)| known == *p))
        {
            return Err(DxError::UnsupportedParameter {
                action: intent.action.to_string(),
                param: stray.as_str().to_string(),
            });
        }

        let mut args = vec![intent.action.subcommand().to_string()];
        for (param, slot) in layout {
            let Some(value) = intent.params.get(param) else {
                continue;
            };
            match (slot, value) {
                (_, ParamValue::Switch(false)) => {}
                (Slot::Flag(flag), ParamValue::Switch(true)) => args.push(flag.to_string()),
                (Slot::Positional, ParamValue::Switch(true)) => {}
                (_, ParamValue::Value(v)) if v.trim().is_empty() => {}
                (Slot::Flag(flag), ParamValue::Value(v)) => {
                    args.push(flag.to_string());
                    args.push(v.clone());
                }
                (Slot::Positional, ParamValue::Value(v)) => args.push(v.clone()),
            }
        }

        Ok(ExternalCommand {
            program: self.program.clone(),
            args,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sfdx() -> CommandBuilder {
        CommandBuilder::new("sfdx")
    }

    #[test]
    fn create_flags_follow_layout_order() {
        let intent = CommandIntent::new(Action::EnvCreate)
            .switch(Param::SetDefault, true)
            .value(Param::TargetHub, "H")
            .value(Param::DefinitionFile, "config/scratch-org-def.json")
            .value(Param::Alias, "A")
            .value(Param::DurationDays, "30");

        let cmd = sfdx().build(&intent).unwrap();
        assert_eq!(
            cmd.to_string(),
            "sfdx force:org:create -d 30 -a A -f config/scratch-org-def.json -v H -s"
        );
    }

    #[test]
    fn build_is_deterministic() {
        let intent = CommandIntent::new(Action::ProjectCreate)
            .value(Param::ProjectName, "Demo")
            .value(Param::PackageDir, "force-app")
            .value(Param::Template, "standard")
            .switch(Param::Manifest, true);
        let first = sfdx().build(&intent).unwrap().to_string();
        for _ in 0..5 {
            assert_eq!(sfdx().build(&intent).unwrap().to_string(), first);
        }
    }

    #[test]
    fn absent_false_and_empty_params_emit_nothing() {
        let intent = CommandIntent::new(Action::ProjectCreate)
            .value(Param::ProjectName, "Demo")
            .value(Param::Namespace, "  ")
            .switch(Param::Manifest, false);
        let cmd = sfdx().build(&intent).unwrap();
        assert_eq!(cmd.args, vec!["force:project:create", "-n", "Demo"]);
        assert!(!cmd.has_arg("-s"));
        assert!(!cmd.has_arg("-x"));
    }

    #[test]
    fn delete_passes_no_prompt() {
        let intent = CommandIntent::new(Action::EnvDelete)
            .value(Param::TargetOrg, "scratch1")
            .opt_value(Param::TargetHub, None::<String>)
            .switch(Param::NoPrompt, true);
        assert_eq!(
            sfdx().build(&intent).unwrap().to_string(),
            "sfdx force:org:delete -u scratch1 -p"
        );
    }

    #[test]
    fn config_set_pair_is_positional() {
        let intent = CommandIntent::new(Action::ConfigSet)
            .switch(Param::Global, true)
            .value(Param::ConfigPair, "defaultdevhubusername=hub1");
        assert_eq!(
            sfdx().build(&intent).unwrap().to_string(),
            "sfdx force:config:set defaultdevhubusername=hub1 -g"
        );
    }

    #[test]
    fn describe_with_tooling() {
        let intent = CommandIntent::new(Action::SchemaDescribe)
            .switch(Param::Json, true)
            .switch(Param::Tooling, true)
            .value(Param::TargetOrg, "dev")
            .value(Param::SObject, "ApexClass");
        assert_eq!(
            sfdx().build(&intent).unwrap().to_string(),
            "sfdx force:schema:sobject:describe -s ApexClass -u dev -t --json"
        );
    }

    #[test]
    fn stray_parameter_is_rejected() {
        let intent = CommandIntent::new(Action::EnvOpen)
            .value(Param::TargetOrg, "org")
            .switch(Param::NoPrompt, true);
        let err = sfdx().build(&intent).unwrap_err();
        assert!(matches!(err, DxError::UnsupportedParameter { .. }));
    }

    #[test]
    fn unknown_action_name_is_unsupported() {
        assert!(matches!(
            "org_explode".parse::<Action>(),
            Err(DxError::UnsupportedAction(_))
        ));
        for action in Action::all() {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), *action);
        }
    }

    #[test]
    fn display_quotes_whitespace() {
        let cmd = ExternalCommand::new("say", ["Your project was created!"]);
        assert_eq!(cmd.to_string(), "say 'Your project was created!'");
        let cmd = ExternalCommand::new("code", ["/tmp/it's"]);
        assert_eq!(cmd.to_string(), r"code '/tmp/it'\''s'");
    }
}
