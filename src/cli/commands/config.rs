use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{info, section, success};
use crate::cli::registry::CommandEntry;
use crate::config::Config;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change preferences",
        "config [show|set <key> <value>|path]",
        cmd_config,
    )
    .subcommands(&["show", "set", "path"])]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::KEYS.join("|")
                )));
            }
            let key = args[1].to_lowercase();
            let value = args[2..].join(" ");
            set_config_value(context, &key, &value)
        }
        "path" => {
            info(context.config_manager.path().display());
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{}`",
            other
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    section("Configuration");
    let config = &context.config;
    info(format!("  currency_symbol   : {}", config.currency_symbol));
    info(format!("  default_period    : {}", config.default_period));
    info(format!("  confirm_deletions : {}", config.confirm_deletions));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut updated = context.config.clone();
    updated.set(key, value)?;
    context.config_manager.save(&updated)?;
    context.config = updated;
    success(format!("Updated `{}`.", key));
    Ok(())
}
