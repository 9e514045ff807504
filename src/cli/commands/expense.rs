use crate::cli::commands::split_options;
use crate::cli::core::{parse_expense_id, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{info, success};
use crate::cli::registry::CommandEntry;
use crate::cli::ui::{Table, TableColumn};
use crate::core::services::ExpenseInput;
use crate::domain::{Displayable, Expense};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "expense",
        "Record, edit, and list expenses",
        "expense <add <category> <amount> [--date YYYY-MM-DD] [description]|edit <id> [--category C] [--amount A] [--date D] [--description T]|delete <id>|list|show <id>>",
        cmd_expense,
    )
    .subcommands(&["add", "edit", "delete", "list", "show"])]
}

fn cmd_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(action) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: expense <add|edit|delete|list|show>".into(),
        ));
    };

    match action.to_lowercase().as_str() {
        "add" => handle_add(context, &args[1..]),
        "edit" => handle_edit(context, &args[1..]),
        "delete" | "remove" => handle_delete(context, &args[1..]),
        "list" => handle_list(context),
        "show" => handle_show(context, &args[1..]),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown expense subcommand `{}`",
            other
        ))),
    }
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let input = if args.is_empty() && context.is_interactive() {
        match add_wizard(context)? {
            Some(input) => input,
            None => return Ok(()),
        }
    } else {
        let (words, options) = split_options(args, &["date"])?;
        let [category, amount, description @ ..] = words.as_slice() else {
            return Err(CommandError::InvalidArguments(
                "usage: expense add <category> <amount> [--date YYYY-MM-DD] [description]".into(),
            ));
        };
        let date = options
            .iter()
            .rev()
            .find(|(flag, _)| *flag == "date")
            .map(|(_, value)| value.to_string())
            .unwrap_or_else(|| today_text(context));
        ExpenseInput::new(*category, *amount, date, description.join(" "))
    };

    let id = context.manager.save_expense(&input, None)?;
    let expense = context.manager.expense(id)?;
    success(format!(
        "Recorded expense #{}: {} {} on {}.",
        id,
        expense.category,
        context.format_amount(expense.amount),
        expense.date.format(DATE_FORMAT)
    ));
    Ok(())
}

fn handle_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (words, options) = split_options(args, &["category", "amount", "date", "description"])?;
    let [raw_id] = words.as_slice() else {
        return Err(CommandError::InvalidArguments(
            "usage: expense edit <id> [--category C] [--amount A] [--date D] [--description T]"
                .into(),
        ));
    };
    let id = parse_expense_id(raw_id)?;
    let existing = context
        .manager
        .expense(id)?;
    let mut input = input_from(existing);

    if options.is_empty() {
        if !context.is_interactive() {
            return Err(CommandError::InvalidArguments(
                "nothing to change; pass at least one --option".into(),
            ));
        }
        input = edit_wizard(context, input)?;
    } else {
        for (flag, value) in options {
            let slot = match flag {
                "category" => &mut input.category,
                "amount" => &mut input.amount,
                "date" => &mut input.date,
                _ => &mut input.description,
            };
            *slot = value.to_string();
        }
    }

    context.manager.save_expense(&input, Some(id))?;
    success(format!("Updated expense #{}.", id));
    Ok(())
}

fn handle_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw_id] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: expense delete <id>".into(),
        ));
    };
    let id = parse_expense_id(raw_id)?;
    let existing = context
        .manager
        .expense(id)?;
    let prompt = format!("Delete expense #{} [{}]?", id, existing.display_label());
    if !context.confirm_deletion(&prompt)? {
        info("Operation cancelled.");
        return Ok(());
    }

    context.manager.delete_expense(id)?;
    success(format!("Deleted expense #{}.", id));
    Ok(())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let expenses = context.manager.list_expenses();
    if expenses.is_empty() {
        info("No expenses recorded yet.");
        return Ok(());
    }
    info(expense_table(context, &expenses).render());
    if expenses
        .iter()
        .any(|expense| context.manager.is_orphaned(expense))
    {
        info("* category no longer exists");
    }
    Ok(())
}

fn handle_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw_id] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: expense show <id>".into(),
        ));
    };
    let id = parse_expense_id(raw_id)?;
    let expense = context
        .manager
        .expense(id)?;

    info(format!("Expense #{}", expense.id));
    let marker = if context.manager.is_orphaned(expense) {
        " (category removed)"
    } else {
        ""
    };
    info(format!("  Category   : {}{}", expense.category, marker));
    info(format!("  Amount     : {}", context.format_amount(expense.amount)));
    info(format!("  Date       : {}", expense.date.format(DATE_FORMAT)));
    if !expense.description.is_empty() {
        info(format!("  Description: {}", expense.description));
    }
    Ok(())
}

/// Tabulates expenses; orphaned categories are suffixed with `*`.
pub(crate) fn expense_table(context: &ShellContext, expenses: &[&Expense]) -> Table {
    let mut table = Table::new(vec![
        TableColumn::right("ID"),
        TableColumn::left("Date"),
        TableColumn::left("Category").max_width(30),
        TableColumn::right("Amount"),
        TableColumn::left("Description").max_width(40),
    ]);
    for expense in expenses {
        let mut category = expense.category.clone();
        if context.manager.is_orphaned(expense) {
            category.push('*');
        }
        table.push_row(vec![
            expense.id.to_string(),
            expense.date.format(DATE_FORMAT).to_string(),
            category,
            context.format_amount(expense.amount),
            expense.description.clone(),
        ]);
    }
    table
}

fn today_text(context: &ShellContext) -> String {
    context.manager.today().format(DATE_FORMAT).to_string()
}

fn input_from(expense: &Expense) -> ExpenseInput {
    ExpenseInput::new(
        expense.category.clone(),
        format!("{:.2}", expense.amount),
        expense.date.format(DATE_FORMAT).to_string(),
        expense.description.clone(),
    )
}

fn add_wizard(context: &ShellContext) -> Result<Option<ExpenseInput>, CommandError> {
    let names: Vec<&str> = context.manager.categories().iter().collect();
    let Some(index) = io::select_item(&context.theme, "Category", &names, 0)? else {
        if names.is_empty() {
            info("Add a category first with `category add <name>`.");
        }
        return Ok(None);
    };

    let amount = io::prompt_text(&context.theme, "Amount", None, false)?;
    let today = today_text(context);
    let date = io::prompt_text(
        &context.theme,
        "Date (YYYY-MM-DD)",
        Some(today.as_str()),
        false,
    )?;
    let description = io::prompt_text(&context.theme, "Description", None, true)?;
    Ok(Some(ExpenseInput::new(
        names[index],
        amount,
        date,
        description,
    )))
}

fn edit_wizard(context: &ShellContext, current: ExpenseInput) -> Result<ExpenseInput, CommandError> {
    let names: Vec<&str> = context.manager.categories().iter().collect();
    let category = match names.iter().position(|name| *name == current.category) {
        Some(selected) => {
            match io::select_item(&context.theme, "Category", &names, selected)? {
                Some(index) => names[index].to_string(),
                None => current.category.clone(),
            }
        }
        None => io::prompt_text(
            &context.theme,
            "Category",
            Some(current.category.as_str()),
            false,
        )?,
    };
    let amount = io::prompt_text(
        &context.theme,
        "Amount",
        Some(current.amount.as_str()),
        false,
    )?;
    let date = io::prompt_text(
        &context.theme,
        "Date (YYYY-MM-DD)",
        Some(current.date.as_str()),
        false,
    )?;
    let description = io::prompt_text(
        &context.theme,
        "Description",
        Some(current.description.as_str()),
        true,
    )?;
    Ok(ExpenseInput::new(category, amount, date, description))
}
