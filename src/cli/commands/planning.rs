//! Wallets, savings goals, recurring definitions and budgets.

use crate::cli::args::{parse_choice, parse_date_arg, ParsedArgs};
use crate::cli::context::ShellContext;
use crate::cli::errors::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::{BudgetAlert, BudgetService, GoalService, RecurringService};
use crate::currency::{format_currency, generate_id};
use crate::domain::{
    Budget, BudgetPeriod, FinancialGoal, Frequency, GoalCategory, RecurringTransaction,
    TransactionCategory, TransactionType, Wallet, WalletKind,
};
use crate::validation::{sanitize_text, validate_amount, validate_text};

const NAME_MAX_LEN: usize = 40;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "wallet",
            "Manage wallets",
            "wallet add <name> <cash|bank|card|savings|other> [--balance N] [--color HEX] | wallet list | wallet delete <id> --yes",
            cmd_wallet,
        ),
        CommandEntry::new(
            "goal",
            "Manage savings goals",
            "goal add <name> <target> <deadline> [--category NAME] | goal list | goal fund <id> <amount> | goal delete <id> --yes",
            cmd_goal,
        ),
        CommandEntry::new(
            "recurring",
            "Manage recurring income and expenses",
            "recurring add <income|expense> <amount> <category> <daily|weekly|monthly|yearly> [description] [--start DATE] [--end DATE] | recurring list | recurring toggle <id> <on|off> | recurring delete <id> --yes",
            cmd_recurring,
        ),
        CommandEntry::new(
            "budget",
            "Manage category budgets",
            "budget add <category> <amount> <weekly|monthly|yearly> | budget list | budget delete <id> --yes",
            cmd_budget,
        ),
    ]
}

fn unknown_action(group: &str, action: &str) -> CommandError {
    CommandError::InvalidArguments(format!("unknown {group} action `{action}`"))
}

fn delete_record(
    context: &ShellContext,
    args: &ParsedArgs<'_>,
    label: &str,
    remove: impl FnOnce(&str) -> Result<bool, CommandError>,
) -> CommandResult {
    let id = args.require(1, "id")?;
    if !context.confirm(args, &format!("Delete {label} {id}?"))? {
        output::info("Nothing deleted.");
        return Ok(());
    }
    if remove(id)? {
        output::success(format!("Deleted {label} {id}."));
    } else {
        output::warning(format!("No {label} with id {id}."));
    }
    Ok(())
}

fn cmd_wallet(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = ParsedArgs::parse(args)?;
    match args.require(0, "add|list|delete")? {
        "add" => {
            let name = validate_text(args.require(1, "name")?, "Name", 1, NAME_MAX_LEN)?;
            let kind: WalletKind = parse_choice(args.require(2, "type")?)?;
            let currency = context.currency();
            let repo = &context.app.repository;
            let mut wallet = Wallet::new(
                generate_id(Some("wallet"), repo.clock()),
                name,
                kind,
                currency,
                repo.clock().now(),
            );
            if let Some(balance) = args.option("balance") {
                wallet.balance = balance.trim().parse::<f64>().map_err(|_| {
                    CommandError::InvalidArguments("balance must be a number".into())
                })?;
            }
            if let Some(color) = args.option("color") {
                wallet.color = sanitize_text(color);
            }
            repo.wallets().save(&wallet)?;
            output::success(format!("Wallet {} created (id: {})", wallet.name, wallet.id));
            Ok(())
        }
        "list" => {
            let wallets = context.app.repository.wallets().all();
            output::section("Wallets");
            let mut total = 0.0;
            for wallet in &wallets {
                total += wallet.balance;
                output::info(format!(
                    "  {:<16} {:<8} {:>12}  [{}]",
                    wallet.name,
                    wallet.kind,
                    format_currency(wallet.balance, &wallet.currency),
                    wallet.id
                ));
            }
            output::info(format!(
                "  Total balance: {}",
                format_currency(total, &context.currency())
            ));
            Ok(())
        }
        "delete" => delete_record(context, &args, "wallet", |id| {
            Ok(context.app.repository.wallets().delete_by_id(id)?)
        }),
        other => Err(unknown_action("wallet", other)),
    }
}

fn cmd_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = ParsedArgs::parse(args)?;
    match args.require(0, "add|list|fund|delete")? {
        "add" => {
            let name = validate_text(args.require(1, "name")?, "Name", 2, NAME_MAX_LEN)?;
            let target = validate_amount(args.require(2, "target")?)?;
            let repo = &context.app.repository;
            let now = repo.clock().now();
            let deadline = parse_date_arg(args.require(3, "deadline")?, now)?;
            let category = args
                .option("category")
                .map(parse_choice::<GoalCategory>)
                .transpose()?
                .unwrap_or(GoalCategory::Savings);
            let goal = FinancialGoal::new(
                generate_id(Some("goal"), repo.clock()),
                name,
                target,
                context.currency(),
                deadline,
                category,
                now,
            );
            repo.goals().save(&goal)?;
            output::success(format!("Goal {} created (id: {})", goal.name, goal.id));
            Ok(())
        }
        "list" => {
            let goals = context.app.repository.goals().all();
            output::section("Goals");
            if goals.is_empty() {
                output::info("No goals yet.");
            }
            for goal in &goals {
                let progress = GoalService::progress(goal);
                let marker = if progress.completed { " (completed)" } else { "" };
                output::info(format!(
                    "  {:<18} {} / {}  {:.0}%{}  due {}  [{}]",
                    goal.name,
                    format_currency(goal.current_amount, &goal.currency),
                    format_currency(goal.target_amount, &goal.currency),
                    progress.percentage,
                    marker,
                    goal.deadline.format("%Y-%m-%d"),
                    goal.id
                ));
            }
            Ok(())
        }
        "fund" => {
            let id = args.require(1, "id")?;
            let amount = validate_amount(args.require(2, "amount")?)?;
            let goal = GoalService::add_to_goal(&context.app.repository, id, amount)?;
            let progress = GoalService::progress(&goal);
            output::success(format!(
                "Added {} to {}. {:.0}% reached.",
                format_currency(amount, &goal.currency),
                goal.name,
                progress.percentage
            ));
            if progress.completed {
                output::success("Goal completed!");
            }
            Ok(())
        }
        "delete" => delete_record(context, &args, "goal", |id| {
            Ok(context.app.repository.goals().delete_by_id(id)?)
        }),
        other => Err(unknown_action("goal", other)),
    }
}

fn cmd_recurring(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = ParsedArgs::parse(args)?;
    match args.require(0, "add|list|toggle|delete")? {
        "add" => add_recurring(context, &args),
        "list" => {
            let items = RecurringService::list(&context.app.repository);
            output::section("Recurring");
            if items.is_empty() {
                output::info("No recurring definitions.");
            }
            for item in &items {
                let state = if item.active { "active" } else { "paused" };
                output::info(format!(
                    "  {:<8} {:<8} {:<14} {:>12}  {:<7} {}  [{}]",
                    item.kind,
                    item.frequency,
                    item.category.label(),
                    format_currency(item.amount, &item.currency),
                    state,
                    item.description,
                    item.id
                ));
            }
            Ok(())
        }
        "toggle" => {
            let id = args.require(1, "id")?;
            let active = match args.require(2, "on|off")? {
                "on" => true,
                "off" => false,
                other => {
                    return Err(CommandError::InvalidArguments(format!(
                        "expected `on` or `off`, got `{other}`"
                    )))
                }
            };
            RecurringService::set_active(&context.app.repository, id, active)?;
            output::success(format!(
                "Recurring {id} {}.",
                if active { "activated" } else { "paused" }
            ));
            Ok(())
        }
        "delete" => delete_record(context, &args, "recurring definition", |id| {
            Ok(context.app.repository.recurring().delete_by_id(id)?)
        }),
        other => Err(unknown_action("recurring", other)),
    }
}

fn add_recurring(context: &mut ShellContext, args: &ParsedArgs<'_>) -> CommandResult {
    let kind: TransactionType = parse_choice(args.require(1, "type")?)?;
    if kind == TransactionType::Sale {
        return Err(CommandError::InvalidArguments(
            "recurring definitions are income or expense".into(),
        ));
    }
    let amount = validate_amount(args.require(2, "amount")?)?;
    let category: TransactionCategory = parse_choice(args.require(3, "category")?)?;
    if !category.is_allowed_for(kind) {
        return Err(CommandError::InvalidArguments(format!(
            "category `{category}` is not offered for {kind}"
        )));
    }
    let frequency: Frequency = parse_choice(args.require(4, "frequency")?)?;
    let currency = context.currency();
    let repo = &context.app.repository;
    let now = repo.clock().now();
    let start = match args.option("start") {
        Some(raw) => parse_date_arg(raw, now)?,
        None => now,
    };
    let description = args
        .rest(5)
        .map(|text| sanitize_text(&text))
        .unwrap_or_else(|| category.label().to_string());
    let mut item = RecurringTransaction::new(
        generate_id(Some("rec"), repo.clock()),
        kind,
        amount,
        currency,
        category,
        description,
        frequency,
        start,
    );
    if let Some(raw) = args.option("end") {
        let end = parse_date_arg(raw, now)?;
        if end < start {
            return Err(CommandError::InvalidArguments(
                "end date must not be before the start date".into(),
            ));
        }
        item = item.with_end_date(end);
    }
    repo.recurring().save(&item)?;
    output::success(format!("Recurring {kind} saved (id: {})", item.id));
    Ok(())
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = ParsedArgs::parse(args)?;
    match args.require(0, "add|list|delete")? {
        "add" => {
            let category: TransactionCategory = parse_choice(args.require(1, "category")?)?;
            if !category.is_allowed_for(TransactionType::Expense) {
                return Err(CommandError::InvalidArguments(format!(
                    "budgets track expense categories, not `{category}`"
                )));
            }
            let amount = validate_amount(args.require(2, "amount")?)?;
            let period: BudgetPeriod = parse_choice(args.require(3, "period")?)?;
            let currency = context.currency();
            let repo = &context.app.repository;
            let budget = Budget::new(
                generate_id(Some("budget"), repo.clock()),
                category,
                amount,
                currency,
                period,
                repo.clock().now(),
            );
            repo.budgets().save(&budget)?;
            output::success(format!(
                "Budget for {} saved (id: {})",
                category.label(),
                budget.id
            ));
            Ok(())
        }
        "list" => {
            let statuses = BudgetService::statuses(&context.app.repository);
            output::section("Budgets");
            if statuses.is_empty() {
                output::info("No budgets yet.");
            }
            for status in &statuses {
                let budget = &status.budget;
                output::info(format!(
                    "  {:<14} {:<8} {} / {}  {:.0}%  since {}  [{}]",
                    budget.category.label(),
                    budget.period,
                    format_currency(status.spent, &budget.currency),
                    format_currency(budget.amount, &budget.currency),
                    status.percentage,
                    status.period_start,
                    budget.id
                ));
                match status.alert {
                    Some(BudgetAlert::Exceeded) => output::warning(format!(
                        "{} budget exceeded.",
                        budget.category.label()
                    )),
                    Some(BudgetAlert::NearLimit) => output::warning(format!(
                        "{} budget is close to its limit.",
                        budget.category.label()
                    )),
                    None => {}
                }
            }
            Ok(())
        }
        "delete" => delete_record(context, &args, "budget", |id| {
            Ok(context.app.repository.budgets().delete_by_id(id)?)
        }),
        other => Err(unknown_action("budget", other)),
    }
}
