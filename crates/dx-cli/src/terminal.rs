use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Editor, Input, MultiSelect, Select};
use dx_core::inventory::Banner;
use dx_core::prompt::{ConfirmPrompt, Console, InputPrompt, MultiSelectPrompt, Pick, SelectPrompt};
use dx_core::{DxError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const CANCEL_LABEL: &str = "Cancel";

fn prompt_err(e: impl std::fmt::Display) -> DxError {
    DxError::Prompt(e.to_string())
}

/// Interactive terminal front end.
#[derive(Default)]
pub struct TerminalConsole {
    theme: ColorfulTheme,
    spinner: Option<ProgressBar>,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self::default()
    }

    fn stop_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

impl Console for TerminalConsole {
    fn input(&mut self, prompt: &InputPrompt) -> Result<String> {
        self.stop_spinner();
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt.message.as_str())
            .allow_empty(true);
        if let Some(default) = prompt.default.as_deref().filter(|d| !d.is_empty()) {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(prompt_err)
    }

    fn confirm(&mut self, prompt: &ConfirmPrompt) -> Result<bool> {
        self.stop_spinner();
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt.message.as_str())
            .default(prompt.default)
            .interact()
            .map_err(prompt_err)
    }

    fn select(&mut self, prompt: &SelectPrompt) -> Result<Pick> {
        self.stop_spinner();
        let mut labels: Vec<String> = prompt.choices.iter().map(|c| c.label.clone()).collect();
        if prompt.cancellable {
            labels.push(style(CANCEL_LABEL).reverse().to_string());
        }
        if labels.is_empty() {
            return Err(DxError::Prompt(format!("'{}' has nothing to choose", prompt.name)));
        }

        let index = Select::with_theme(&self.theme)
            .with_prompt(prompt.message.as_str())
            .items(&labels)
            .default(prompt.default_index().unwrap_or(0))
            .interact_opt()
            .map_err(prompt_err)?;

        // Esc counts as cancel where a cancel entry is offered.
        Ok(match index.and_then(|i| prompt.choices.get(i)) {
            Some(choice) => Pick::Value(choice.value.clone()),
            None if prompt.cancellable => Pick::Cancelled,
            None => return self.select(prompt),
        })
    }

    fn multi_select(&mut self, prompt: &MultiSelectPrompt) -> Result<Vec<String>> {
        self.stop_spinner();
        let labels: Vec<&str> = prompt.choices.iter().map(|c| c.label.as_str()).collect();
        let picked = MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt.message.as_str())
            .items(&labels)
            .interact()
            .map_err(prompt_err)?;
        Ok(picked
            .into_iter()
            .filter_map(|i| prompt.choices.get(i))
            .map(|c| c.value.clone())
            .collect())
    }

    fn editor(&mut self, _name: &'static str, message: &str) -> Result<Option<String>> {
        self.stop_spinner();
        println!("{} {}", style("?").yellow().bold(), message);
        Editor::new().edit("").map_err(prompt_err)
    }

    fn banner(&mut self, banner: &Banner) {
        self.stop_spinner();
        let text = banner.to_string();
        let width = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let rule = "─".repeat(width + 4);
        println!();
        println!("  {}", style(&rule).dim());
        for (i, line) in text.lines().enumerate() {
            let line = match banner {
                Banner::Welcome { .. } if i == 0 => style(line).red().bold().underlined(),
                Banner::Welcome { .. } => style(line).cyan(),
                _ => style(line).red().bold(),
            };
            println!("    {line}");
        }
        println!("  {}", style(&rule).dim());
        println!();
    }

    fn status(&mut self, message: &str) {
        self.stop_spinner();
        println!("  {} {}", style("›").cyan(), style(message).magenta());
    }

    fn busy(&mut self, message: &str) {
        self.stop_spinner();
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.yellow} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(pb);
    }

    fn success(&mut self, message: &str) {
        self.stop_spinner();
        println!("  {} {}", style("✓").green().bold(), style(message).green());
    }

    fn failure(&mut self, message: &str) {
        self.stop_spinner();
        eprintln!("  {} {}", style("✗").red().bold(), style(message).red());
    }
}
