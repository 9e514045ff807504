use std::io::{stdout, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output::{info, section, success, warning};
use crate::cli::registry::CommandEntry;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new("clear", "Clear the screen", "clear", cmd_clear),
        CommandEntry::new(
            "reload",
            "Reload categories and expenses from disk",
            "reload",
            cmd_reload,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit).aliases(&["quit"]),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    section(format!("Expense Core {}", meta.version));
    info(format!("  Build hash : {} ({})", meta.git_hash, meta.git_status));
    info(format!("  Built at   : {}", meta.timestamp));
    info(format!("  Target     : {}", meta.target));
    info(format!("  Profile    : {}", meta.profile));
    info(format!("  Rustc      : {}", meta.rustc));
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.is_interactive() {
        return Ok(());
    }
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    out.flush()?;
    Ok(())
}

fn cmd_reload(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.manager.reload()?;
    context.report_load_warnings();
    let categories = context.manager.categories().len();
    let expenses = context.manager.expenses().len();
    if categories == 0 && expenses == 0 {
        warning("No stored data found.");
    }
    success(format!(
        "Reloaded {} categories and {} expenses.",
        categories, expenses
    ));
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
