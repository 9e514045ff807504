use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::cli::core::CommandError;

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}

/// Prompt for free-form text, optionally pre-filled and optionally allowing an empty answer.
pub fn prompt_text(
    theme: &ColorfulTheme,
    prompt: &str,
    initial: Option<&str>,
    allow_empty: bool,
) -> Result<String, CommandError> {
    let mut input = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(allow_empty);
    if let Some(initial) = initial {
        input = input.with_initial_text(initial);
    }
    input.interact_text().map_err(CommandError::from)
}

/// Let the user pick one entry from `items`; `None` when the list is empty.
pub fn select_item(
    theme: &ColorfulTheme,
    prompt: &str,
    items: &[&str],
    default: usize,
) -> Result<Option<usize>, CommandError> {
    if items.is_empty() {
        return Ok(None);
    }
    Select::with_theme(theme)
        .with_prompt(prompt)
        .items(items)
        .default(default.min(items.len() - 1))
        .interact_opt()
        .map_err(CommandError::from)
}
