use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Context as ReadlineContext, Editor, Helper,
};

use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::output::info as output_info;
use crate::cli::registry::CommandRegistry;

/// Environment variable that switches the shell into line-by-line script mode.
pub const SCRIPT_ENV: &str = "EXPENSE_CORE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    let outcome = match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    };
    tracing::debug!(status = %context.status(), "shell finished");
    outcome
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::from_registry(&context.registry)));

    output_info("Type `help` to list commands, `exit` to leave.");

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    editor.add_history_entry(line.trim()).ok();
                }
                if execute_line(context, &line)? == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        if !context.running || execute_line(context, &line?)? == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

/// Runs one input line. Blank lines and lines starting with `#` are skipped.
fn execute_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CliError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || is_comment(trimmed) {
        return Ok(LoopControl::Continue);
    }
    match context.process_line(trimmed) {
        Ok(control) => Ok(control),
        Err(err) => context.report_error(err).map(|()| LoopControl::Continue),
    }
}

/// A leading `#` followed by a digit is an expense id, not a comment.
fn is_comment(line: &str) -> bool {
    let mut chars = line.chars();
    chars.next() == Some('#') && !chars.next().is_some_and(|c| c.is_ascii_digit())
}

/// Two-level completion: command spellings, then that command's first words.
struct CommandHelper {
    commands: Vec<(&'static str, &'static [&'static str])>,
}

impl CommandHelper {
    fn from_registry(registry: &CommandRegistry) -> Self {
        let mut commands: Vec<_> = registry
            .names()
            .map(|name| (name, registry.subcommands(name)))
            .collect();
        commands.sort_by_key(|(name, _)| *name);
        Self { commands }
    }

    fn candidates(&self, words: &[&str], needle: &str) -> Vec<Pair> {
        let needle = needle.to_ascii_lowercase();
        let options: Vec<&'static str> = match words {
            [] => self.commands.iter().map(|(name, _)| *name).collect(),
            [command] => {
                let command = command.to_ascii_lowercase();
                self.commands
                    .iter()
                    .find(|(name, _)| *name == command)
                    .map(|(_, subcommands)| subcommands.to_vec())
                    .unwrap_or_default()
            }
            _ => Vec::new(),
        };
        options
            .into_iter()
            .filter(|option| option.starts_with(&needle))
            .map(|option| Pair {
                display: option.to_string(),
                replacement: option.to_string(),
            })
            .collect()
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let words: Vec<&str> = prefix[..start].split_whitespace().collect();
        Ok((start, self.candidates(&words, &prefix[start..])))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

/// Splits a line into shell-style words, honouring quotes.
///
/// Unlike a POSIX shell, `#` at the start of a word is literal so `#12` can name an expense.
pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    shell_words::split(&escape_word_hashes(input)).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

fn escape_word_hashes(input: &str) -> Cow<'_, str> {
    if !input.contains('#') {
        return Cow::Borrowed(input);
    }

    let mut escaped = String::with_capacity(input.len() + 4);
    let mut quote: Option<char> = None;
    let mut word_start = true;
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        match (quote, c) {
            (None, '#') if word_start => escaped.push_str("\\#"),
            (None, '\\') => {
                escaped.push(c);
                if let Some(next) = chars.next() {
                    escaped.push(next);
                }
            }
            (None, '\'' | '"') => {
                quote = Some(c);
                escaped.push(c);
            }
            (Some('"'), '\\') => {
                escaped.push(c);
                if let Some(next) = chars.next() {
                    escaped.push(next);
                }
            }
            (Some(open), _) if open == c => {
                quote = None;
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
        word_start = quote.is_none() && c.is_whitespace();
    }
    Cow::Owned(escaped)
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not parse input: {}", self.message)
    }
}
