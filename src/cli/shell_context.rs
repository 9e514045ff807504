//! Shared runtime state for CLI interactions and command execution.

use dialoguer::theme::ColorfulTheme;

use crate::{
    config::{Config, ConfigManager},
    core::ExpenseManager,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: ExpenseManager,
    pub theme: ColorfulTheme,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn status(&self) -> String {
        format!(
            "ShellContext {{ running: {}, last_command: {:?}, categories: {}, expenses: {} }}",
            self.running,
            self.last_command,
            self.manager.categories().len(),
            self.manager.expenses().len()
        )
    }
}
