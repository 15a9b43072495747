//! User prompting.
//!
//! The pipeline never talks to the terminal directly; it goes through the
//! [`Prompter`] trait so the resolver can be driven by a scripted stub in
//! tests and by other front ends later. The only implementation shipped
//! here is [`TerminalPrompter`], built on `inquire`.
//!
//! Backing out (ESC) and interrupting (Ctrl-C) both surface as `None`.
//! There is no error channel: a prompt that cannot be shown is logged and
//! counts as the user declining.

use inquire::{InquireError, Select, Text};

/// Source of user decisions during a lookup.
pub trait Prompter {
    /// Ask for free text. `None` means the user backed out.
    fn input(&self, label: &str) -> Option<String>;

    /// Ask the user to pick one of `options`, shown in the given order.
    /// Returns the index of the chosen option, or `None` if the user
    /// backed out.
    fn choose(&self, label: &str, options: &[String]) -> Option<usize>;
}

/// Interactive prompter for the CLI.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&self, label: &str) -> Option<String> {
        match Text::new(label).prompt_skippable() {
            Ok(answer) => answer,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => None,
            Err(e) => {
                tracing::warn!("text prompt failed: {e}");
                None
            }
        }
    }

    fn choose(&self, label: &str, options: &[String]) -> Option<usize> {
        // raw_prompt keeps the selected index; ESC arrives as
        // OperationCanceled rather than a skip value.
        match Select::new(label, options.to_vec()).raw_prompt() {
            Ok(choice) => Some(choice.index),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => None,
            Err(e) => {
                tracing::warn!("selection prompt failed: {e}");
                None
            }
        }
    }
}
