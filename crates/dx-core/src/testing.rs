//! Scripted console and recording runner for driving workflows in tests.

use crate::command::ExternalCommand;
use crate::error::{DxError, Result};
use crate::inventory::Banner;
use crate::prompt::{ConfirmPrompt, Console, InputPrompt, MultiSelectPrompt, Pick, SelectPrompt};
use crate::runner::{CommandOutcome, CommandRunner, OutputMode};
use std::collections::{HashMap, VecDeque};

// ---------------------------------------------------------------------------
// FakeRunner
// ---------------------------------------------------------------------------

/// Records every command. Responses are matched by substring of the rendered
/// invocation; unmatched commands succeed with empty output.
#[derive(Default)]
pub struct FakeRunner {
    responses: Vec<(String, CommandOutcome)>,
    unstartable: Vec<String>,
    pub calls: Vec<(ExternalCommand, OutputMode)>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, pattern: &str, outcome: CommandOutcome) -> Self {
        self.responses.push((pattern.to_string(), outcome));
        self
    }

    pub fn fail(self, pattern: &str, code: i32) -> Self {
        self.respond(
            pattern,
            CommandOutcome {
                code,
                stdout: String::new(),
            },
        )
    }

    pub fn stdout(self, pattern: &str, stdout: &str) -> Self {
        self.respond(
            pattern,
            CommandOutcome {
                code: 0,
                stdout: stdout.to_string(),
            },
        )
    }

    pub fn unstartable(mut self, program: &str) -> Self {
        self.unstartable.push(program.to_string());
        self
    }

    pub fn rendered(&self) -> Vec<String> {
        self.calls.iter().map(|(c, _)| c.to_string()).collect()
    }

    pub fn count(&self, pattern: &str) -> usize {
        self.rendered().iter().filter(|c| c.contains(pattern)).count()
    }

    pub fn find(&self, pattern: &str) -> Option<&ExternalCommand> {
        self.calls
            .iter()
            .map(|(c, _)| c)
            .find(|c| c.to_string().contains(pattern))
    }
}

impl CommandRunner for FakeRunner {
    fn run(&mut self, cmd: &ExternalCommand, mode: OutputMode) -> Result<CommandOutcome> {
        self.calls.push((cmd.clone(), mode));
        if self.unstartable.contains(&cmd.program) {
            return Err(DxError::CliNotInstalled(cmd.program.clone()));
        }
        let rendered = cmd.to_string();
        Ok(self
            .responses
            .iter()
            .find(|(pattern, _)| rendered.contains(pattern.as_str()))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// ScriptedConsole
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Answer {
    Text(String),
    Yes(bool),
    Pick(Pick),
    Many(Vec<String>),
    Edit(Option<String>),
}

/// Answers prompts by name, in order. Unscripted prompts take their
/// default; an unscripted text prompt without a default panics.
#[derive(Default)]
pub struct ScriptedConsole {
    answers: HashMap<&'static str, VecDeque<Answer>>,
    pub asked: Vec<&'static str>,
    pub banners: Vec<Banner>,
    pub statuses: Vec<String>,
    pub successes: Vec<String>,
    pub failures: Vec<String>,
}

impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, name: &'static str, answer: Answer) -> Self {
        self.answers.entry(name).or_default().push_back(answer);
        self
    }

    pub fn text(self, name: &'static str, value: &str) -> Self {
        self.push(name, Answer::Text(value.to_string()))
    }

    pub fn yes(self, name: &'static str, value: bool) -> Self {
        self.push(name, Answer::Yes(value))
    }

    pub fn pick(self, name: &'static str, value: &str) -> Self {
        self.push(name, Answer::Pick(Pick::Value(value.to_string())))
    }

    pub fn cancel(self, name: &'static str) -> Self {
        self.push(name, Answer::Pick(Pick::Cancelled))
    }

    pub fn many(self, name: &'static str, values: &[&str]) -> Self {
        self.push(
            name,
            Answer::Many(values.iter().map(|v| v.to_string()).collect()),
        )
    }

    pub fn edit(self, name: &'static str, value: Option<&str>) -> Self {
        self.push(name, Answer::Edit(value.map(str::to_string)))
    }

    pub fn was_asked(&self, name: &str) -> bool {
        self.asked.iter().any(|n| *n == name)
    }

    fn next(&mut self, name: &'static str) -> Option<Answer> {
        self.asked.push(name);
        self.answers.get_mut(name).and_then(VecDeque::pop_front)
    }
}

impl Console for ScriptedConsole {
    fn input(&mut self, prompt: &InputPrompt) -> Result<String> {
        match self.next(prompt.name) {
            Some(Answer::Text(v)) => Ok(v),
            Some(other) => panic!("prompt '{}' scripted with {other:?}", prompt.name),
            None if prompt.default.is_some() => Ok(String::new()),
            None => panic!("unscripted text prompt '{}'", prompt.name),
        }
    }

    fn confirm(&mut self, prompt: &ConfirmPrompt) -> Result<bool> {
        match self.next(prompt.name) {
            Some(Answer::Yes(v)) => Ok(v),
            Some(other) => panic!("prompt '{}' scripted with {other:?}", prompt.name),
            None => Ok(prompt.default),
        }
    }

    fn select(&mut self, prompt: &SelectPrompt) -> Result<Pick> {
        match self.next(prompt.name) {
            Some(Answer::Pick(Pick::Cancelled)) => {
                assert!(prompt.cancellable, "prompt '{}' has no cancel", prompt.name);
                Ok(Pick::Cancelled)
            }
            Some(Answer::Pick(Pick::Value(v))) => {
                assert!(
                    prompt.choices.iter().any(|c| c.value == v),
                    "'{v}' is not a choice of '{}'",
                    prompt.name
                );
                Ok(Pick::Value(v))
            }
            Some(other) => panic!("prompt '{}' scripted with {other:?}", prompt.name),
            None => {
                let index = prompt.default_index().unwrap_or(0);
                match prompt.choices.get(index) {
                    Some(choice) => Ok(Pick::Value(choice.value.clone())),
                    None => panic!("unscripted empty select '{}'", prompt.name),
                }
            }
        }
    }

    fn multi_select(&mut self, prompt: &MultiSelectPrompt) -> Result<Vec<String>> {
        match self.next(prompt.name) {
            Some(Answer::Many(v)) => Ok(v),
            Some(other) => panic!("prompt '{}' scripted with {other:?}", prompt.name),
            None if prompt.min > 0 => Ok(prompt
                .choices
                .iter()
                .take(prompt.min)
                .map(|c| c.value.clone())
                .collect()),
            None => Ok(Vec::new()),
        }
    }

    fn editor(&mut self, name: &'static str, _message: &str) -> Result<Option<String>> {
        match self.next(name) {
            Some(Answer::Edit(v)) => Ok(v),
            Some(other) => panic!("prompt '{name}' scripted with {other:?}"),
            None => Ok(None),
        }
    }

    fn banner(&mut self, banner: &Banner) {
        self.banners.push(banner.clone());
    }

    fn status(&mut self, message: &str) {
        self.statuses.push(message.to_string());
    }

    fn busy(&mut self, message: &str) {
        self.statuses.push(message.to_string());
    }

    fn success(&mut self, message: &str) {
        self.successes.push(message.to_string());
    }

    fn failure(&mut self, message: &str) {
        self.failures.push(message.to_string());
    }
}
