pub mod category;
pub mod config;
pub mod expense;
pub mod summary;
pub mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(category::definitions());
    commands.extend(expense::definitions());
    commands.extend(summary::definitions());
    commands.extend(config::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in all_definitions() {
        registry.register(entry);
    }
}

/// Splits `args` into positional words and `--flag value` pairs.
///
/// Only flags listed in `known` are accepted; each must be followed by a value.
pub(crate) fn split_options<'a>(
    args: &[&'a str],
    known: &[&str],
) -> Result<(Vec<&'a str>, Vec<(&'a str, &'a str)>), CommandError> {
    let mut positional = Vec::new();
    let mut options = Vec::new();
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        if let Some(flag) = arg.strip_prefix("--") {
            if !known.contains(&flag) {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `{}`",
                    arg
                )));
            }
            let value = iter.next().ok_or_else(|| {
                CommandError::InvalidArguments(format!("option `{}` needs a value", arg))
            })?;
            options.push((flag, value));
        } else {
            positional.push(arg);
        }
    }
    Ok((positional, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_is_registered_once() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "help", "version", "clear", "reload", "exit", "category", "expense", "summary",
                "config", "quit"
            ]
        );
        assert_eq!(registry.list().len(), 9);
    }

    #[test]
    fn options_are_separated_from_words() {
        let (words, options) =
            split_options(&["Food", "--date", "2024-06-01", "lunch"], &["date"]).unwrap();
        assert_eq!(words, vec!["Food", "lunch"]);
        assert_eq!(options, vec![("date", "2024-06-01")]);

        assert!(split_options(&["--date"], &["date"]).is_err());
        assert!(split_options(&["--colour", "red"], &["date"]).is_err());
    }
}
