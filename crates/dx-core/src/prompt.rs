//! Prompt and display seam.
//!
//! A [`Console`] only asks and shows; validation and re-prompting happen in
//! [`ask_text`] / [`ask_many`] so every front end behaves the same way.
//! Select prompts may carry a cancel entry, answered as [`Pick::Cancelled`].

use crate::error::Result;
use crate::inventory::Banner;

pub type Validator = fn(&str) -> std::result::Result<(), String>;

// ---------------------------------------------------------------------------
// Prompt definitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct InputPrompt {
    pub name: &'static str,
    pub message: String,
    pub default: Option<String>,
    pub validate: Option<Validator>,
}

impl InputPrompt {
    pub fn new(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            message: message.into(),
            default: None,
            validate: None,
        }
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn validate(mut self, validator: Validator) -> Self {
        self.validate = Some(validator);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ConfirmPrompt {
    pub name: &'static str,
    pub message: String,
    pub default: bool,
}

impl ConfirmPrompt {
    pub fn new(name: &'static str, message: impl Into<String>, default: bool) -> Self {
        Self {
            name,
            message: message.into(),
            default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub value: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Label and value are the same string.
    pub fn same(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectPrompt {
    pub name: &'static str,
    pub message: String,
    pub choices: Vec<Choice>,
    /// Value of the preselected choice.
    pub default: Option<String>,
    pub cancellable: bool,
}

impl SelectPrompt {
    pub fn new(name: &'static str, message: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            name,
            message: message.into(),
            choices,
            default: None,
            cancellable: false,
        }
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn cancellable(mut self) -> Self {
        self.cancellable = true;
        self
    }

    /// Index of the default choice, if it is one of the choices.
    pub fn default_index(&self) -> Option<usize> {
        let default = self.default.as_deref()?;
        self.choices.iter().position(|c| c.value == default)
    }
}

#[derive(Debug, Clone)]
pub struct MultiSelectPrompt {
    pub name: &'static str,
    pub message: String,
    pub choices: Vec<Choice>,
    pub min: usize,
    pub min_message: String,
}

impl MultiSelectPrompt {
    pub fn new(name: &'static str, message: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            name,
            message: message.into(),
            choices,
            min: 0,
            min_message: String::new(),
        }
    }

    pub fn require_one(mut self, message: impl Into<String>) -> Self {
        self.min = 1;
        self.min_message = message.into();
        self
    }
}

/// Answer to a select prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pick {
    Value(String),
    Cancelled,
}

impl Pick {
    pub fn value(&self) -> Option<&str> {
        match self {
            Pick::Value(v) => Some(v),
            Pick::Cancelled => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

pub trait Console {
    /// Raw text answer; an empty string means "take the default".
    fn input(&mut self, prompt: &InputPrompt) -> Result<String>;
    fn confirm(&mut self, prompt: &ConfirmPrompt) -> Result<bool>;
    fn select(&mut self, prompt: &SelectPrompt) -> Result<Pick>;
    /// Values of the chosen entries.
    fn multi_select(&mut self, prompt: &MultiSelectPrompt) -> Result<Vec<String>>;
    /// Multi-line text in an external editor; `None` if nothing was saved.
    fn editor(&mut self, name: &'static str, message: &str) -> Result<Option<String>>;

    fn banner(&mut self, banner: &Banner);
    /// A step that is about to run in the foreground.
    fn status(&mut self, message: &str);
    /// A step that runs silently; ended by `success` or `failure`.
    fn busy(&mut self, message: &str);
    fn success(&mut self, message: &str);
    fn failure(&mut self, message: &str);
}

impl<T: Console + ?Sized> Console for &mut T {
    fn input(&mut self, prompt: &InputPrompt) -> Result<String> {
        (**self).input(prompt)
    }
    fn confirm(&mut self, prompt: &ConfirmPrompt) -> Result<bool> {
        (**self).confirm(prompt)
    }
    fn select(&mut self, prompt: &SelectPrompt) -> Result<Pick> {
        (**self).select(prompt)
    }
    fn multi_select(&mut self, prompt: &MultiSelectPrompt) -> Result<Vec<String>> {
        (**self).multi_select(prompt)
    }
    fn editor(&mut self, name: &'static str, message: &str) -> Result<Option<String>> {
        (**self).editor(name, message)
    }
    fn banner(&mut self, banner: &Banner) {
        (**self).banner(banner)
    }
    fn status(&mut self, message: &str) {
        (**self).status(message)
    }
    fn busy(&mut self, message: &str) {
        (**self).busy(message)
    }
    fn success(&mut self, message: &str) {
        (**self).success(message)
    }
    fn failure(&mut self, message: &str) {
        (**self).failure(message)
    }
}

// ---------------------------------------------------------------------------
// Validated asks
// ---------------------------------------------------------------------------

/// Ask until the answer (or the default, for an empty answer) validates.
pub fn ask_text<C: Console + ?Sized>(console: &mut C, prompt: &InputPrompt) -> Result<String> {
    loop {
        let raw = console.input(prompt)?;
        let answer = match raw.trim() {
            "" => prompt.default.clone().unwrap_or_default(),
            trimmed => trimmed.to_string(),
        };
        match prompt.validate.map_or(Ok(()), |v| v(&answer)) {
            Ok(()) => return Ok(answer),
            Err(msg) => console.failure(&msg),
        }
    }
}

/// Ask until at least `prompt.min` entries are chosen.
pub fn ask_many<C: Console + ?Sized>(
    console: &mut C,
    prompt: &MultiSelectPrompt,
) -> Result<Vec<String>> {
    loop {
        let chosen = console.multi_select(prompt)?;
        if chosen.len() >= prompt.min {
            return Ok(chosen);
        }
        console.failure(&prompt.min_message);
    }
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

pub fn require_value(value: &str) -> std::result::Result<(), String> {
    if value.trim().is_empty() {
        Err("Please enter a value".to_string())
    } else {
        Ok(())
    }
}

pub fn valid_name(value: &str) -> std::result::Result<(), String> {
    crate::paths::validate_name(value).map_err(|e| e.to_string())
}

pub fn valid_days(value: &str) -> std::result::Result<(), String> {
    match value.trim().parse::<u32>() {
        Ok(days) if (1..=30).contains(&days) => Ok(()),
        _ => Err("Number of days must be between 1 and 30".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
