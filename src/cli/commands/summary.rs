use chrono::NaiveDate;

use crate::cli::commands::expense::expense_table;
use crate::cli::core::{parse_reference_date, CommandError, CommandResult, ShellContext};
use crate::cli::output::{hint, info, section};
use crate::cli::registry::CommandEntry;
use crate::cli::ui::{Table, TableColumn};
use crate::core::validation::{normalize_period, parse_calendar_date};
use crate::domain::Period;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "summary",
        "Total expenses for a day, week, month, or all time",
        "summary [daily|weekly|monthly|total] [YYYY-MM-DD]",
        cmd_summary,
    )
    .subcommands(&Period::NAMES)]
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (period, reference) = parse_arguments(context.config.default_period, args)?;
    let summary = context.manager.summary(period, reference);

    match &summary.window {
        Some(window) => section(format!("{} summary ({})", capitalized(period), window)),
        None => section(format!("{} summary", capitalized(period))),
    }

    if summary.entries.is_empty() {
        info("No expenses in this period.");
    } else if period == Period::Total {
        let mut table = Table::new(vec![
            TableColumn::left("Category").max_width(30),
            TableColumn::right("Count"),
            TableColumn::right("Total"),
        ]);
        for row in summary.by_category() {
            table.push_row(vec![
                row.category.clone(),
                row.count.to_string(),
                context.format_amount(row.total()),
            ]);
        }
        info(table.render());
    } else {
        info(expense_table(context, &summary.entries).render());
    }

    info(format!("Total: {}", context.format_amount(summary.total())));
    Ok(())
}

/// Reads `[period] [date]`; a lone date uses the default period.
fn parse_arguments(
    default: Period,
    args: &[&str],
) -> Result<(Period, Option<NaiveDate>), CommandError> {
    match args {
        [] => Ok((default, None)),
        [single] => match parse_calendar_date(single) {
            Some(date) => Ok((default, Some(date))),
            None => Ok((period_or_daily(single), None)),
        },
        [period, date] => Ok((period_or_daily(period), Some(parse_reference_date(date)?))),
        _ => Err(CommandError::InvalidArguments(
            "usage: summary [period] [YYYY-MM-DD]".into(),
        )),
    }
}

/// Unrecognized period words summarize the day instead of failing.
fn period_or_daily(input: &str) -> Period {
    if input.parse::<Period>().is_err() {
        hint(format!("unknown period `{input}`, showing daily"));
    }
    normalize_period(input)
}

fn capitalized(period: Period) -> String {
    let name = period.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
