use chrono::Duration;

use crate::cli::args::{parse_choice, parse_date_arg, parse_limit, ParsedArgs};
use crate::cli::context::ShellContext;
use crate::cli::errors::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::currency::{format_currency, format_date, generate_id, CurrencyCode};
use crate::domain::{Transaction, TransactionCategory, TransactionType};
use crate::validation::{sanitize_text, validate_amount};

const DEFAULT_LIST_LIMIT: usize = 20;
const DEFAULT_TOP_LIMIT: usize = 5;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "tx",
            "Record and browse transactions",
            "tx add <income|expense> <amount> <category> [description] [--date YYYY-MM-DD] [--wallet ID] [--notes TEXT] | tx list [--type TYPE] [--limit N] | tx range <from> <to> | tx category <category> | tx delete <id> --yes",
            cmd_tx,
        ),
        CommandEntry::new(
            "top",
            "Rank categories by total amount",
            "top <income|expense|sale> [limit]",
            cmd_top,
        ),
        CommandEntry::new(
            "categories",
            "List categories offered per transaction type",
            "categories [income|expense|sale]",
            cmd_categories,
        ),
    ]
}

fn cmd_tx(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = ParsedArgs::parse(args)?;
    match args.require(0, "add|list|range|category|delete")? {
        "add" => add(context, &args),
        "list" => list(context, &args),
        "range" => range(context, &args),
        "category" => by_category(context, &args),
        "delete" => delete(context, &args),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown tx action `{other}`"
        ))),
    }
}

fn add(context: &mut ShellContext, args: &ParsedArgs<'_>) -> CommandResult {
    let kind: TransactionType = parse_choice(args.require(1, "type")?)?;
    if kind == TransactionType::Sale {
        return Err(CommandError::InvalidArguments(
            "sales are recorded with `product sell`".into(),
        ));
    }
    let amount = validate_amount(args.require(2, "amount")?)?;
    let category: TransactionCategory = parse_choice(args.require(3, "category")?)?;
    if !category.is_allowed_for(kind) {
        return Err(CommandError::InvalidArguments(format!(
            "category `{category}` is not offered for {kind}"
        )));
    }
    let repo = &context.app.repository;
    let now = repo.clock().now();
    let date = match args.option("date") {
        Some(raw) => parse_date_arg(raw, now)?,
        None => now,
    };
    let currency = args
        .option("currency")
        .map(CurrencyCode::from)
        .unwrap_or_else(|| context.currency());
    let description = args
        .rest(4)
        .map(|text| sanitize_text(&text))
        .unwrap_or_else(|| category.label().to_string());

    let mut txn = Transaction::new(
        generate_id(Some("tx"), repo.clock()),
        kind,
        amount,
        currency,
        category,
        date,
    )
    .with_description(description);
    if let Some(wallet_id) = args.option("wallet") {
        if repo.wallets().find(wallet_id).is_none() {
            return Err(CommandError::Message(format!("Wallet `{wallet_id}` not found.")));
        }
        txn = txn.with_wallet(wallet_id);
    }
    txn.notes = args.option("notes").map(sanitize_text);

    repo.transactions().save(&txn)?;
    output::success(format!(
        "Recorded {} {} (id: {})",
        kind,
        format_currency(amount, &txn.currency),
        txn.id
    ));
    Ok(())
}

fn list(context: &mut ShellContext, args: &ParsedArgs<'_>) -> CommandResult {
    let limit = parse_limit(args.option("limit"), DEFAULT_LIST_LIMIT)?;
    let kind = args
        .option("type")
        .map(parse_choice::<TransactionType>)
        .transpose()?;
    let mut items: Vec<Transaction> = context
        .app
        .repository
        .transactions()
        .all()
        .into_iter()
        .filter(|txn| kind.map_or(true, |kind| txn.kind == kind))
        .collect();
    items.sort_by(|a, b| b.date.cmp(&a.date));
    items.truncate(limit);
    print_transactions(context, "Transactions", &items);
    Ok(())
}

fn range(context: &mut ShellContext, args: &ParsedArgs<'_>) -> CommandResult {
    let repo = &context.app.repository;
    let now = repo.clock().now();
    let from_raw = args.require(1, "from")?;
    let to_raw = args.require(2, "to")?;
    let start = parse_date_arg(from_raw, now)?;
    let mut end = parse_date_arg(to_raw, now)?;
    if is_plain_date(to_raw) {
        // A bare end date covers the whole day.
        end = end + Duration::days(1) - Duration::milliseconds(1);
    }
    if end < start {
        return Err(CommandError::InvalidArguments(
            "<to> must not be before <from>".into(),
        ));
    }
    let items = repo.transactions_by_date_range(start, end);
    print_transactions(context, &format!("Transactions {from_raw} .. {to_raw}"), &items);
    Ok(())
}

fn by_category(context: &mut ShellContext, args: &ParsedArgs<'_>) -> CommandResult {
    let category: TransactionCategory = parse_choice(args.require(1, "category")?)?;
    let items = context.app.repository.transactions_by_category(category);
    print_transactions(context, &format!("Category: {}", category.label()), &items);
    Ok(())
}

fn delete(context: &mut ShellContext, args: &ParsedArgs<'_>) -> CommandResult {
    let id = args.require(1, "id")?;
    if !context.confirm(args, &format!("Delete transaction {id}?"))? {
        output::info("Nothing deleted.");
        return Ok(());
    }
    if context.app.repository.transactions().delete_by_id(id)? {
        output::success(format!("Transaction {id} deleted."));
    } else {
        output::warning(format!("No transaction with id {id}."));
    }
    Ok(())
}

fn cmd_top(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = ParsedArgs::parse(args)?;
    let kind: TransactionType = parse_choice(args.require(0, "type")?)?;
    let limit = parse_limit(args.positional(1), DEFAULT_TOP_LIMIT)?;
    let currency = context.currency();
    let ranked = context.app.repository.top_categories(kind, limit);
    output::section(format!("Top {kind} categories"));
    if ranked.is_empty() {
        output::info("No transactions yet.");
    }
    for (position, entry) in ranked.iter().enumerate() {
        output::info(format!(
            "  {}. {:<14} {:>14}",
            position + 1,
            entry.category.label(),
            format_currency(entry.total, &currency)
        ));
    }
    Ok(())
}

fn cmd_categories(_context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = ParsedArgs::parse(args)?;
    let kinds = match args.positional(0) {
        Some(raw) => vec![parse_choice::<TransactionType>(raw)?],
        None => TransactionType::ALL.to_vec(),
    };
    for kind in kinds {
        output::section(format!("{kind} categories"));
        for category in TransactionCategory::for_type(kind) {
            output::info(format!("  {:<14} {}", category.as_str(), category.label()));
        }
    }
    Ok(())
}

fn print_transactions(context: &ShellContext, title: &str, items: &[Transaction]) {
    output::section(title);
    if items.is_empty() {
        output::info("No transactions.");
        return;
    }
    let clock = context.app.repository.clock();
    for txn in items {
        let sign = if txn.kind == TransactionType::Expense { "-" } else { "+" };
        output::info(format!(
            "  {:<12} {:<8} {:<14} {}{:>12}  {}  [{}]",
            format_date(txn.date, clock),
            txn.kind,
            txn.category.label(),
            sign,
            format_currency(txn.amount, &txn.currency),
            txn.description,
            txn.id
        ));
    }
}

fn is_plain_date(raw: &str) -> bool {
    raw.trim().len() == 10
}
