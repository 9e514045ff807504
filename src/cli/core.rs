//! Core CLI dispatch, error reporting, and shell context helpers.

use std::{io, sync::Arc};

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::{
    config::ConfigManager,
    core::{
        utils::PathResolver, validation::parse_calendar_date, ExpenseError, ExpenseManager,
        SystemClock,
    },
    domain::ExpenseId,
    storage::JsonFileStore,
};

pub use crate::core::errors::CliError;

use super::commands;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    /// Builds a context backed by the on-disk data directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base = PathResolver::base_dir();
        let store = JsonFileStore::new(PathResolver::data_dir_in(&base))?;
        let manager = ExpenseManager::open(Box::new(store), Arc::new(SystemClock))?;
        let config_manager = ConfigManager::with_base_dir(base)?;
        Self::with_parts(mode, manager, config_manager)
    }

    /// Builds a context from explicit parts.
    pub fn with_parts(
        mode: CliMode,
        manager: ExpenseManager,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        output::set_preferences(OutputPreferences {
            plain_mode: mode == CliMode::Script,
        });

        let config = config_manager.load()?;
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let context = ShellContext {
            mode,
            registry,
            manager,
            theme: ColorfulTheme::default(),
            config,
            config_manager,
            last_command: None,
            running: true,
        };
        context.report_load_warnings();
        Ok(context)
    }

    pub(crate) fn report_load_warnings(&self) {
        for warning in self.manager.load_warnings() {
            cli_io_warning(warning);
        }
    }

    pub(crate) fn is_interactive(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        format!("expenses ({})> ", self.manager.categories().len())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Tokenizes and dispatches one line of input.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match super::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };

        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };

        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.last_command = Some(line.trim().to_string());

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Did you mean `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    /// Asks before a destructive action. Script mode and disabled confirmations always proceed.
    pub(crate) fn confirm_deletion(&self, prompt: &str) -> Result<bool, CommandError> {
        if !self.is_interactive() || !self.config.confirm_deletions {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(ExpenseError::CategoryUnchanged) => {
                output::warning("Category name unchanged.");
                Ok(())
            }
            CommandError::Core(ExpenseError::UnknownCategory(name)) => {
                output::error(ExpenseError::UnknownCategory(name));
                output::hint("Use `category list` to see available categories.");
                Ok(())
            }
            CommandError::Core(err) if !err.is_validation() && self.mode == CliMode::Script => {
                Err(CliError::Core(err))
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }

    pub(crate) fn format_amount(&self, amount: f64) -> String {
        self.config.format_amount(amount)
    }
}

fn cli_io_warning(message: &str) {
    output::warning(format!("Stored data: {message}"));
}

/// Converts a 1-based position typed by the user into a registry index.
pub(crate) fn parse_position(input: &str) -> Result<usize, CommandError> {
    match input.trim().parse::<usize>() {
        Ok(position) if position > 0 => Ok(position - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "invalid position `{}` (use the number shown by `category list`)",
            input
        ))),
    }
}

pub(crate) fn parse_expense_id(input: &str) -> Result<ExpenseId, CommandError> {
    input
        .trim()
        .trim_start_matches('#')
        .parse::<u64>()
        .map(ExpenseId)
        .map_err(|_| CommandError::InvalidArguments(format!("invalid expense id `{}`", input)))
}

pub(crate) fn parse_reference_date(input: &str) -> Result<NaiveDate, CommandError> {
    parse_calendar_date(input).ok_or_else(|| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] ExpenseError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Command(message) => CommandError::InvalidArguments(message),
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::core::FixedClock;
    use crate::storage::MemoryStore;

    pub(crate) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    /// Script-mode context over an in-memory store and a temporary config directory.
    pub(crate) fn script_context() -> (ShellContext, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let manager = ExpenseManager::open(
            Box::new(MemoryStore::new()),
            Arc::new(FixedClock(today())),
        )
        .expect("open manager");
        let config_manager =
            ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("config manager");
        let context = ShellContext::with_parts(CliMode::Script, manager, config_manager)
            .expect("context");
        (context, dir)
    }

    pub(crate) fn run(context: &mut ShellContext, lines: &[&str]) {
        for line in lines {
            match context.process_line(line) {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => break,
                Err(err) => context.report_error(err).expect("report error"),
            }
        }
    }
}
