use crate::cli::core::{parse_position, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{info, success, warning};
use crate::cli::registry::CommandEntry;
use crate::cli::ui::{Table, TableColumn};
use crate::core::ExpenseError;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "category",
        "Manage expense categories",
        "category <add <name>|rename <#> <name>|remove <#>|list>",
        cmd_category,
    )
    .subcommands(&["add", "rename", "remove", "list"])]
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(action) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: category <add|rename|remove|list>".into(),
        ));
    };

    match action.to_lowercase().as_str() {
        "add" => handle_add(context, &args[1..]),
        "rename" | "edit" => handle_rename(context, &args[1..]),
        "remove" | "delete" => handle_remove(context, &args[1..]),
        "list" => handle_list(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown category subcommand `{}`",
            other
        ))),
    }
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = if args.is_empty() {
        if !context.is_interactive() {
            return Err(CommandError::InvalidArguments(
                "usage: category add <name>".into(),
            ));
        }
        io::prompt_text(&context.theme, "Category name", None, false)?
    } else {
        args.join(" ")
    };

    let name = context.manager.add_category(&raw)?;
    success(format!("Added category `{}`.", name));
    Ok(())
}

fn handle_rename(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (index, raw) = match args {
        [position, rest @ ..] if !rest.is_empty() => (parse_position(position)?, rest.join(" ")),
        [position] if context.is_interactive() => {
            let index = parse_position(position)?;
            if index >= context.manager.categories().len() {
                return Err(missing_position(index));
            }
            (index, prompt_new_name(context, index)?)
        }
        [] if context.is_interactive() => match select_category(context, "Rename which category?")? {
            Some(index) => (index, prompt_new_name(context, index)?),
            None => return Ok(()),
        },
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: category rename <#> <new name>".into(),
            ))
        }
    };

    let name = context
        .manager
        .rename_category(index, &raw)
        .map_err(|err| match err {
            ExpenseError::CategoryIndexOutOfRange(index) => missing_position(index),
            other => other.into(),
        })?;
    success(format!("Category {} is now `{}`.", index + 1, name));
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let index = match args.first() {
        Some(position) => parse_position(position)?,
        None if context.is_interactive() => {
            match select_category(context, "Remove which category?")? {
                Some(index) => index,
                None => return Ok(()),
            }
        }
        None => {
            return Err(CommandError::InvalidArguments(
                "usage: category remove <#>".into(),
            ))
        }
    };

    let Some(current) = context.manager.categories().get(index).map(str::to_string) else {
        return Err(missing_position(index));
    };
    if !context.confirm_deletion(&format!("Remove category `{}`?", current))? {
        info("Operation cancelled.");
        return Ok(());
    }

    let removed = context.manager.remove_category(index)?;
    success(format!("Removed category `{}`.", removed));

    let still_used = context
        .manager
        .expenses()
        .iter()
        .filter(|expense| expense.category == removed)
        .count();
    if still_used > 0 {
        warning(format!(
            "{} expense(s) still reference `{}`; they are kept as recorded.",
            still_used, removed
        ));
    }
    Ok(())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let categories = context.manager.categories();
    if categories.is_empty() {
        info("No categories yet. Add one with `category add <name>`.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Category").max_width(50),
        TableColumn::right("Expenses"),
    ]);
    for (index, name) in categories.iter().enumerate() {
        let count = context
            .manager
            .expenses()
            .iter()
            .filter(|expense| expense.category == name)
            .count();
        table.push_row(vec![(index + 1).to_string(), name.to_string(), count.to_string()]);
    }
    info(table.render());
    Ok(())
}

fn missing_position(index: usize) -> CommandError {
    CommandError::InvalidArguments(format!(
        "no category at position {} (see `category list`)",
        index + 1
    ))
}

fn select_category(context: &ShellContext, prompt: &str) -> Result<Option<usize>, CommandError> {
    let names: Vec<&str> = context.manager.categories().iter().collect();
    if names.is_empty() {
        info("No categories yet.");
        return Ok(None);
    }
    io::select_item(&context.theme, prompt, &names, 0)
}

fn prompt_new_name(context: &ShellContext, index: usize) -> Result<String, CommandError> {
    let current = context.manager.categories().get(index);
    io::prompt_text(&context.theme, "New name", current, false)
}
