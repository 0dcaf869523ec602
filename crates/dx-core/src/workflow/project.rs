use super::{Outcome, Session};
use crate::command::{Action, CommandIntent, Param};
use crate::context::WorkflowContext;
use crate::error::Result;
use crate::io;
use crate::paths::{self, FORCEIGNORE_FILE, GITIGNORE_FILE, README_FILE};
use crate::prompt::{require_value, valid_name, ConfirmPrompt, Console, InputPrompt};
use crate::runner::{CommandRunner, OutputMode};
use crate::templates;

pub const DEFAULT_PROJECT_NAME: &str = "MyProject";

/// Files the scaffolder writes that get replaced by our own.
const SCAFFOLD_BOILERPLATE: &[&str] = &[README_FILE, "README.md", GITIGNORE_FILE, FORCEIGNORE_FILE];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectAnswers {
    pub name: String,
    pub package_dir: String,
    pub namespace: String,
    pub include_readme: bool,
    pub description: Option<String>,
}

/// The description only feeds the README.
pub fn asks_description(include_readme: bool) -> bool {
    include_readme
}

pub fn name_prompt(root: &std::path::Path) -> InputPrompt {
    InputPrompt::new(
        "project_name",
        format!("Project Name ? {}/", root.display()),
    )
    .default_value(DEFAULT_PROJECT_NAME)
    .validate(valid_name)
}

fn collect<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    ctx: &mut WorkflowContext,
    preset_name: Option<&str>,
) -> Result<ProjectAnswers> {
    let name = match preset_name {
        Some(name) => {
            paths::validate_name(name)?;
            name.to_string()
        }
        None => {
            let prompt = name_prompt(&session.root);
            session.text(ctx, prompt)?
        }
    };
    let package_dir = session.text(
        ctx,
        InputPrompt::new("package_dir", "App Folder Name ?")
            .default_value(session.config.default_package_dir.clone())
            .validate(require_value),
    )?;
    let namespace = session.text(
        ctx,
        InputPrompt::new("namespace", "Namespace (optional)").default_value(""),
    )?;
    let include_readme = session.confirm(
        ctx,
        ConfirmPrompt::new("include_readme", "Include ReadMe file", true),
    )?;
    let description = if asks_description(include_readme) {
        session
            .console
            .editor("description", "Description (optional)")?
    } else {
        None
    };

    Ok(ProjectAnswers {
        name,
        package_dir,
        namespace,
        include_readme,
        description,
    })
}

/// Scaffold a project, then swap in our README and ignore files.
pub fn run<R: CommandRunner, C: Console>(
    session: &mut Session<R, C>,
    ctx: &mut WorkflowContext,
    preset_name: Option<&str>,
) -> Result<Outcome> {
    let answers = collect(session, ctx, preset_name)?;

    let intent = CommandIntent::new(Action::ProjectCreate)
        .value(Param::ProjectName, answers.name.as_str())
        .value(Param::PackageDir, answers.package_dir.as_str())
        .value(Param::Namespace, answers.namespace.as_str())
        .value(Param::Template, session.config.project_template.as_str())
        .switch(Param::Manifest, true);
    let outcome = session.execute(&intent, OutputMode::Inherit)?;
    if !outcome.success() {
        session.console.failure("Failed to create a project");
        return Ok(Outcome::Failed(Action::ProjectCreate.label().to_string()));
    }

    let project = paths::project_dir(&session.root, &answers.name);
    for name in SCAFFOLD_BOILERPLATE {
        if io::remove_if_exists(&project.join(name))? {
            tracing::debug!(file = name, "removed scaffolded file");
        }
    }
    let readme = answers.include_readme.then(|| {
        templates::render_readme(
            &answers.name,
            &answers.package_dir,
            answers.description.as_deref().unwrap_or_default(),
        )
    });
    templates::write_project_files(&project, readme.as_deref())?;
    session.console.success("Created project successfully");

    ctx.created_project = Some(project.clone());
    ctx.mark_stale();

    session.console.status("Your project is ready! - Launching editor");
    session.open_in_editor(&project);
    session.say("Your project was created!");
    Ok(Outcome::Completed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeRunner, ScriptedConsole};
    use crate::workflow::tests::{context, session};
    use tempfile::TempDir;

    const LIST: &str = r#"{"result":{"nonScratchOrgs":[{"alias":"hub1","isDevHub":true}]}}"#;

    #[test]
    fn without_readme_skips_readme_but_writes_ignores() {
        let dir = TempDir::new().unwrap();
        let console = ScriptedConsole::new().yes("include_readme", false);
        let mut s = session(dir.path(), FakeRunner::new(), console);
        let mut ctx = context(LIST);

        let outcome = run(&mut s, &mut ctx, Some("Demo")).unwrap();

        assert_eq!(outcome, Outcome::Completed);
        let project = dir.path().join("Demo");
        assert!(!project.join(README_FILE).exists());
        assert!(project.join(GITIGNORE_FILE).exists());
        assert!(project.join(FORCEIGNORE_FILE).exists());
        assert!(!s.console.was_asked("description"));
        assert!(!s.console.was_asked("project_name"));
        assert_eq!(ctx.created_project, Some(project));
        assert!(ctx.is_stale());
    }

    #[test]
    fn command_uses_answers_and_manifest_flag() {
        let dir = TempDir::new().unwrap();
        let console = ScriptedConsole::new()
            .text("project_name", "Shop")
            .text("namespace", "acme")
            .edit("description", Some("Storefront\n"));
        let mut s = session(dir.path(), FakeRunner::new(), console);
        let mut ctx = context(LIST);

        run(&mut s, &mut ctx, None).unwrap();

        assert_eq!(
            s.runner.rendered()[0],
            "sfdx force:project:create -n Shop -p force-app -s acme -t standard -x"
        );
        let readme = std::fs::read_to_string(dir.path().join("Shop").join(README_FILE)).unwrap();
        assert!(readme.contains("Storefront"));
        assert_eq!(ctx.last_selection["namespace"], "acme");
        // editor launch follows the scaffold
        assert!(s.runner.rendered()[1].starts_with("code "));
    }

    #[test]
    fn empty_namespace_is_omitted() {
        let dir = TempDir::new().unwrap();
        let mut s = session(dir.path(), FakeRunner::new(), ScriptedConsole::new());
        let mut ctx = context(LIST);
        run(&mut s, &mut ctx, Some("Demo")).unwrap();
        assert!(!s.runner.calls[0].0.has_arg("-s"));
    }

    #[test]
    fn scaffolded_boilerplate_is_replaced() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("Demo");
        std::fs::create_dir(&project).unwrap();
        std::fs::write(project.join("README.md"), "generated").unwrap();
        std::fs::write(project.join(GITIGNORE_FILE), "generated").unwrap();

        let mut s = session(dir.path(), FakeRunner::new(), ScriptedConsole::new());
        let mut ctx = context(LIST);
        run(&mut s, &mut ctx, Some("Demo")).unwrap();

        assert!(!project.join("README.md").exists());
        assert!(project.join(README_FILE).exists());
        assert_eq!(
            std::fs::read_to_string(project.join(GITIGNORE_FILE)).unwrap(),
            templates::GITIGNORE
        );
    }

    #[test]
    fn failed_scaffold_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut s = session(
            dir.path(),
            FakeRunner::new().fail("force:project:create", 1),
            ScriptedConsole::new(),
        );
        let mut ctx = context(LIST);

        let outcome = run(&mut s, &mut ctx, Some("Demo")).unwrap();

        assert!(matches!(outcome, Outcome::Failed(_)));
        assert!(!dir.path().join("Demo").exists());
        assert_eq!(s.console.failures, vec!["Failed to create a project"]);
        assert_eq!(s.runner.calls.len(), 1);
        assert!(ctx.created_project.is_none());
    }

    #[test]
    fn invalid_preset_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut s = session(dir.path(), FakeRunner::new(), ScriptedConsole::new());
        let mut ctx = context(LIST);
        assert!(run(&mut s, &mut ctx, Some("bad name")).is_err());
        assert!(s.runner.calls.is_empty());
    }
}
