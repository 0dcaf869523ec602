use crate::output::{print_json, print_table};
use anyhow::Context;
use dx_core::config::Config;
use dx_core::schema::{self, FieldSummary};
use std::path::Path;

pub fn run(
    root: &Path,
    config: &Config,
    sobject: &str,
    target_org: &str,
    tooling: bool,
    json: bool,
) -> anyhow::Result<()> {
    let (builder, mut runner) = super::plain(root, config);
    let describe = schema::describe(&builder, &mut runner, sobject, target_org, tooling)
        .with_context(|| format!("failed to describe {sobject} in '{target_org}'"))?;

    if json {
        #[derive(serde::Serialize)]
        struct DescribeOutput<'a> {
            label: &'a str,
            name: &'a str,
            fields: &'a [FieldSummary],
            createable: Vec<&'a str>,
            updateable: Vec<&'a str>,
            external_ids: Vec<&'a str>,
        }

        return print_json(&DescribeOutput {
            label: &describe.label,
            name: &describe.name,
            fields: &describe.fields,
            createable: field_names(describe.createable()),
            updateable: field_names(describe.updateable()),
            external_ids: field_names(describe.external_ids()),
        });
    }

    println!("{} ({})", describe.label, describe.name);
    println!();
    let flag = |on: bool| String::from(if on { "yes" } else { "" });
    let rows = describe
        .fields
        .iter()
        .map(|f| {
            vec![
                f.name.clone(),
                f.label.clone(),
                flag(f.createable),
                flag(f.updateable),
                flag(f.is_external_id()),
            ]
        })
        .collect();
    print_table(&["FIELD", "LABEL", "CREATE", "UPDATE", "EXTERNAL ID"], rows);
    Ok(())
}

fn field_names(fields: Vec<&FieldSummary>) -> Vec<&str> {
    fields.into_iter().map(|f| f.name.as_str()).collect()
}
