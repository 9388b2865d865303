//! Dashboard, statistics, settings and the export/import/clear flows.

use std::path::PathBuf;

use crate::cli::args::{parse_choice, ParsedArgs};
use crate::cli::context::{CliMode, ShellContext};
use crate::cli::errors::{CommandError, CommandResult};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::{DataService, StatsPeriod, SummaryService, Totals};
use crate::currency::{self, format_currency, format_date, CurrencyCode};
use crate::domain::{CloudProvider, Language, ThemePreference};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "dashboard",
            "Show this month's totals and recent activity",
            "dashboard",
            cmd_dashboard,
        ),
        CommandEntry::new(
            "stats",
            "Show statistics for a period",
            "stats [week|month|year]",
            cmd_stats,
        ),
        CommandEntry::new(
            "settings",
            "Show or change app settings",
            "settings show | settings set <language|currency|theme|cloud-sync|cloud-provider|default-wallet> <value>",
            cmd_settings,
        ),
        CommandEntry::new(
            "config",
            "Show or change shell preferences",
            "config show | config set <color|export-dir|unlock-warnings|biometrics-hardware> <value>",
            cmd_config,
        ),
        CommandEntry::new(
            "export",
            "Export transactions, products and settings to JSON",
            "export [directory]",
            cmd_export,
        ),
        CommandEntry::new(
            "import",
            "Import transactions and products from an export file",
            "import <file>",
            cmd_import,
        ),
        CommandEntry::new(
            "clear-data",
            "Back up, then delete all transactions and products",
            "clear-data --yes --force",
            cmd_clear_data,
        ),
    ]
}

fn print_totals(totals: &Totals, currency: &CurrencyCode) {
    output::info(format!("  Income   : {}", format_currency(totals.income, currency)));
    output::info(format!("  Sales    : {}", format_currency(totals.sales, currency)));
    output::info(format!("  Expenses : {}", format_currency(totals.expenses, currency)));
    output::info(format!("  Balance  : {}", format_currency(totals.balance(), currency)));
}

fn cmd_dashboard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let repo = &context.app.repository;
    let overview = SummaryService::monthly_overview(repo);
    output::section(format!("Dashboard ({})", overview.month_start.format("%B %Y")));
    print_totals(&overview.totals, &overview.currency);
    output::section("Recent");
    if overview.recent.is_empty() {
        output::info("No transactions yet.");
    }
    for txn in &overview.recent {
        output::info(format!(
            "  {:<12} {:<14} {:>12}  {}",
            format_date(txn.date, repo.clock()),
            txn.category.label(),
            format_currency(txn.amount, &txn.currency),
            txn.description
        ));
    }
    Ok(())
}

fn cmd_stats(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = ParsedArgs::parse(args)?;
    let period = args
        .positional(0)
        .map(parse_choice::<StatsPeriod>)
        .transpose()?
        .unwrap_or(StatsPeriod::Month);
    let stats = SummaryService::statistics(&context.app.repository, period);
    output::section(format!("Statistics ({})", stats.period));
    print_totals(&stats.totals, &stats.currency);
    output::section("Top expenses");
    if stats.top_expenses.is_empty() {
        output::info("No expenses in this period.");
    }
    for share in &stats.top_expenses {
        output::info(format!(
            "  {:<14} {:>12}  {:>5.1}%",
            share.category.label(),
            format_currency(share.total, &stats.currency),
            share.share
        ));
    }
    if !stats.daily_expenses.is_empty() {
        output::section("Daily expenses");
        for day in &stats.daily_expenses {
            output::info(format!(
                "  {}  {:>12}",
                day.date.format("%a %d"),
                format_currency(day.amount, &stats.currency)
            ));
        }
    }
    Ok(())
}

fn cmd_settings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = ParsedArgs::parse(args)?;
    let repo = &context.app.repository;
    match args.positional(0).unwrap_or("show") {
        "show" => {
            let settings = repo.settings();
            output::section("Settings");
            output::info(format!("  language       : {}", settings.language));
            output::info(format!("  currency       : {}", settings.currency));
            output::info(format!("  theme          : {}", settings.theme));
            output::info(format!("  cloud-sync     : {}", on_off(settings.cloud_sync)));
            output::info(format!(
                "  cloud-provider : {}",
                settings
                    .cloud_provider
                    .map(|provider| provider.to_string())
                    .unwrap_or_else(|| "-".into())
            ));
            output::info(format!(
                "  default-wallet : {}",
                settings.default_wallet.as_deref().unwrap_or("-")
            ));
            Ok(())
        }
        "set" => {
            let field = args.require(1, "field")?;
            let value = args.require(2, "value")?;
            let mut settings = repo.settings();
            match field {
                "language" => settings.language = parse_choice::<Language>(value)?,
                "currency" => {
                    if !currency::is_supported(value) {
                        return Err(CommandError::InvalidArguments(format!(
                            "unsupported currency `{value}`"
                        )));
                    }
                    settings.currency = CurrencyCode::from(value);
                }
                "theme" => settings.theme = parse_choice::<ThemePreference>(value)?,
                "cloud-sync" => settings.cloud_sync = parse_on_off(value)?,
                "cloud-provider" => {
                    settings.cloud_provider = Some(parse_choice::<CloudProvider>(value)?)
                }
                "default-wallet" => {
                    if repo.wallets().find(value).is_none() {
                        return Err(CommandError::Message(format!("Wallet `{value}` not found.")));
                    }
                    settings.default_wallet = Some(value.to_string());
                }
                other => {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown setting `{other}`"
                    )))
                }
            }
            repo.save_settings(&settings)?;
            output::success(format!("{field} set to {value}."));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown settings action `{other}`"
        ))),
    }
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = ParsedArgs::parse(args)?;
    match args.positional(0).unwrap_or("show") {
        "show" => {
            output::section("Shell configuration");
            output::info(format!("  file                : {}", context.config_manager.path().display()));
            output::info(format!("  color               : {}", on_off(context.config.ui_color_enabled)));
            output::info(format!("  export-dir          : {}", context.export_dir().display()));
            output::info(format!("  unlock-warnings     : {}", context.config.unlock_warning_threshold));
            output::info(format!("  biometrics-hardware : {}", on_off(context.config.biometrics_hardware)));
            Ok(())
        }
        "set" => {
            let field = args.require(1, "field")?;
            let value = args.require(2, "value")?;
            match field {
                "color" => {
                    context.config.ui_color_enabled = parse_on_off(value)?;
                    output::set_color_enabled(
                        context.config.ui_color_enabled && context.mode == CliMode::Interactive,
                    );
                }
                "export-dir" => context.config.export_dir = Some(PathBuf::from(value)),
                "unlock-warnings" => {
                    context.config.unlock_warning_threshold = match value.parse::<u32>() {
                        Ok(threshold) if threshold > 0 => threshold,
                        _ => {
                            return Err(CommandError::InvalidArguments(
                                "unlock-warnings must be a positive integer".into(),
                            ))
                        }
                    }
                }
                "biometrics-hardware" => {
                    context.config.biometrics_hardware = parse_on_off(value)?;
                    output::info("Takes effect the next time the shell starts.");
                }
                other => {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown config field `{other}`"
                    )))
                }
            }
            context.save_config()?;
            output::success(format!("{field} set to {value}."));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}`"
        ))),
    }
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = ParsedArgs::parse(args)?;
    let dir = args
        .positional(0)
        .map(PathBuf::from)
        .unwrap_or_else(|| context.export_dir());
    let path = DataService::export_to_file(&context.app.repository, &dir)?;
    output::success(format!("Exported to {}", path.display()));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = ParsedArgs::parse(args)?;
    let path = PathBuf::from(args.require(0, "file")?);
    let summary = DataService::import_from_file(&context.app.repository, &path)?;
    let describe = |count: Option<usize>| match count {
        Some(count) => count.to_string(),
        None => "skipped".to_string(),
    };
    output::success(format!(
        "Imported transactions: {}, products: {}",
        describe(summary.transactions),
        describe(summary.products)
    ));
    Ok(())
}

fn cmd_clear_data(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = ParsedArgs::parse(args)?;
    let confirmed = match context.mode {
        CliMode::Script => args.flag("--yes") && args.flag("--force"),
        CliMode::Interactive => {
            cli_io::confirm_action(
                &context.theme,
                "Delete all transactions and products?",
                false,
            )? && cli_io::confirm_action(
                &context.theme,
                "This cannot be undone. Continue?",
                false,
            )?
        }
    };
    if !confirmed {
        output::info("Nothing cleared.");
        if context.mode == CliMode::Script {
            output::info("Script mode needs --yes --force.");
        }
        return Ok(());
    }
    let backup_dir = context.export_dir();
    match DataService::clear_all_with_backup(&context.app.repository, &backup_dir)? {
        Some(path) => output::info(format!("Backup written to {}", path.display())),
        None => output::warning("Backup failed; data cleared anyway."),
    }
    output::success("Transactions and products cleared.");
    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn parse_on_off(value: &str) -> Result<bool, CommandError> {
    match value {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(CommandError::InvalidArguments(format!(
            "expected `on` or `off`, got `{other}`"
        ))),
    }
}
