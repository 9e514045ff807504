//! Command table for the expense shell.

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// A top-level shell command with its alternate spellings and sub-actions.
pub struct CommandEntry {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub subcommands: &'static [&'static str],
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            aliases: &[],
            subcommands: &[],
            description,
            usage,
            handler,
        }
    }

    pub const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// First words accepted after the command, offered by tab completion.
    pub const fn subcommands(mut self, subcommands: &'static [&'static str]) -> Self {
        self.subcommands = subcommands;
        self
    }

    fn answers_to(&self, word: &str) -> bool {
        self.name == word || self.aliases.contains(&word)
    }
}

/// Commands in registration order. Names and aliases share one namespace.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry` unless one of its spellings is already taken.
    pub fn register(&mut self, entry: CommandEntry) -> bool {
        let taken = std::iter::once(entry.name)
            .chain(entry.aliases.iter().copied())
            .any(|word| self.get(word).is_some());
        if taken {
            tracing::warn!(command = entry.name, "duplicate command ignored");
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Looks a command up by name or alias, ignoring ASCII case.
    pub fn get(&self, word: &str) -> Option<&CommandEntry> {
        let word = word.to_ascii_lowercase();
        self.entries.iter().find(|entry| entry.answers_to(&word))
    }

    pub fn list(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// Every accepted spelling, primary names first.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        let primary = self.entries.iter().map(|entry| entry.name);
        let aliases = self
            .entries
            .iter()
            .flat_map(|entry| entry.aliases.iter().copied());
        primary.chain(aliases)
    }

    pub fn handler(&self, word: &str) -> Option<CommandHandler> {
        self.get(word).map(|entry| entry.handler)
    }

    pub fn subcommands(&self, word: &str) -> &'static [&'static str] {
        match self.get(word) {
            Some(entry) => entry.subcommands,
            None => &[],
        }
    }
}
