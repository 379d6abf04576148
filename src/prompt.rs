use crate::error::{Result, SetupError};
use inquire::validator::{ErrorMessage, Validation};
use inquire::{Confirm, CustomUserError, InquireError, Select, Text};
use std::sync::Arc;

/// Checks a candidate answer. `Err` carries the message shown before the
/// question is asked again.
pub type Validator = Arc<dyn Fn(&str) -> std::result::Result<(), String> + Send + Sync>;

/// The questions the setup flow needs answered.
///
/// `text` only returns once `validator` accepted the value; rejected input is
/// re-asked, never surfaced as an error.
pub trait Prompter {
    fn select(&mut self, message: &str, choices: &[&str]) -> Result<usize>;
    fn text(&mut self, message: &str, default: Option<&str>, validator: Validator)
        -> Result<String>;
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;
}

/// Interactive prompts on the controlling terminal.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn select(&mut self, message: &str, choices: &[&str]) -> Result<usize> {
        Select::new(message, choices.to_vec())
            .raw_prompt()
            .map(|picked| picked.index)
            .map_err(prompt_error)
    }

    fn text(
        &mut self,
        message: &str,
        default: Option<&str>,
        validator: Validator,
    ) -> Result<String> {
        let check = move |input: &str| -> std::result::Result<Validation, CustomUserError> {
            Ok(match validator(input) {
                Ok(()) => Validation::Valid,
                Err(msg) => Validation::Invalid(ErrorMessage::Custom(msg)),
            })
        };
        let mut prompt = Text::new(message).with_validator(check);
        if let Some(default) = default {
            prompt = prompt.with_default(default);
        }
        prompt.prompt().map_err(prompt_error)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        Confirm::new(message)
            .with_default(default)
            .prompt()
            .map_err(prompt_error)
    }
}

fn prompt_error(err: InquireError) -> SetupError {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            SetupError::Interrupted
        }
        other => SetupError::Prompt(other.to_string()),
    }
}
