use crate::command::{Action, CommandBuilder, CommandIntent, Param};
use crate::error::{DxError, Result};
use crate::runner::{CommandRunner, OutputMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSummary {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub createable: bool,
    #[serde(default)]
    pub updateable: bool,
    #[serde(default)]
    pub external_id: bool,
}

impl FieldSummary {
    /// `Id` is usable as an upsert key even though it is not flagged.
    pub fn is_external_id(&self) -> bool {
        self.external_id || self.name == "Id"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SObjectDescribe {
    pub label: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSummary>,
}

impl SObjectDescribe {
    pub fn createable(&self) -> Vec<&FieldSummary> {
        self.fields.iter().filter(|f| f.createable).collect()
    }

    pub fn updateable(&self) -> Vec<&FieldSummary> {
        self.fields.iter().filter(|f| f.updateable).collect()
    }

    pub fn external_ids(&self) -> Vec<&FieldSummary> {
        self.fields.iter().filter(|f| f.is_external_id()).collect()
    }
}

/// Parse `force:schema:sobject:describe --json` output, with or without the
/// `result` envelope.
pub fn parse_describe(json: &str) -> Result<SObjectDescribe> {
    let mut value: serde_json::Value = serde_json::from_str(json)?;
    let body = match value.get_mut("result") {
        Some(result) => result.take(),
        None => value,
    };
    Ok(serde_json::from_value(body)?)
}

pub fn describe<R: CommandRunner + ?Sized>(
    builder: &CommandBuilder,
    runner: &mut R,
    sobject: &str,
    target_org: &str,
    tooling: bool,
) -> Result<SObjectDescribe> {
    let intent = CommandIntent::new(Action::SchemaDescribe)
        .value(Param::SObject, sobject)
        .value(Param::TargetOrg, target_org)
        .switch(Param::Tooling, tooling)
        .switch(Param::Json, true);
    let cmd = builder.build(&intent)?;
    tracing::info!(command = %cmd, "describing sobject");

    let outcome = runner.run(&cmd, OutputMode::Capture)?;
    tracing::debug!(code = outcome.code, "describe finished");
    if !outcome.success() {
        return Err(DxError::ExternalCommandFailed {
            action: Action::SchemaDescribe.label().to_string(),
            code: outcome.code,
        });
    }
    parse_describe(&outcome.stdout)
}
