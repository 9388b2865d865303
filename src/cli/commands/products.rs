use crate::cli::args::ParsedArgs;
use crate::cli::context::ShellContext;
use crate::cli::errors::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::SalesService;
use crate::currency::{format_currency, generate_id, CurrencyCode};
use crate::domain::Product;
use crate::validation::{sanitize_text, validate_amount, validate_quantity, validate_stock, validate_text};

const NAME_MAX_LEN: usize = 60;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "product",
        "Manage inventory and sell products",
        "product add <name> <price> <stock> [--cost N] [--category TEXT] [--description TEXT] | product list | product sell <id> <quantity> | product delete <id> --yes",
        cmd_product,
    )]
}

fn cmd_product(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = ParsedArgs::parse(args)?;
    match args.require(0, "add|list|sell|delete")? {
        "add" => add(context, &args),
        "list" => list(context),
        "sell" => sell(context, &args),
        "delete" => delete(context, &args),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown product action `{other}`"
        ))),
    }
}

fn add(context: &mut ShellContext, args: &ParsedArgs<'_>) -> CommandResult {
    let name = validate_text(args.require(1, "name")?, "Name", 2, NAME_MAX_LEN)?;
    let price = validate_amount(args.require(2, "price")?)?;
    let stock = validate_stock(args.require(3, "stock")?)?;
    let currency = args
        .option("currency")
        .map(CurrencyCode::from)
        .unwrap_or_else(|| context.currency());

    let repo = &context.app.repository;
    let mut product = Product::new(
        generate_id(Some("prod"), repo.clock()),
        name,
        price,
        currency,
        stock,
        repo.clock().now(),
    );
    if let Some(cost) = args.option("cost") {
        product = product.with_cost(validate_amount(cost)?);
    }
    if let Some(category) = args.option("category") {
        product = product.with_category(sanitize_text(category));
    }
    if let Some(description) = args.option("description") {
        product.description = sanitize_text(description);
    }

    repo.products().save(&product)?;
    output::success(format!("Product {} created (id: {})", product.name, product.id));
    Ok(())
}

fn list(context: &mut ShellContext) -> CommandResult {
    let products = context.app.repository.products().all();
    output::section("Products");
    if products.is_empty() {
        output::info("No products yet.");
        return Ok(());
    }
    for product in &products {
        let margin = product
            .unit_margin()
            .map(|margin| format!("  margin {}", format_currency(margin, &product.currency)))
            .unwrap_or_default();
        let stock = if product.in_stock() {
            format!("{} in stock", product.stock)
        } else {
            "out of stock".to_string()
        };
        output::info(format!(
            "  {:<20} {:>12}  {}{}  [{}]",
            product.name,
            format_currency(product.price, &product.currency),
            stock,
            margin,
            product.id
        ));
    }
    Ok(())
}

fn sell(context: &mut ShellContext, args: &ParsedArgs<'_>) -> CommandResult {
    let id = args.require(1, "id")?;
    let repo = &context.app.repository;
    let product = repo
        .product_by_id(id)
        .ok_or_else(|| CommandError::Message(format!("Product `{id}` not found.")))?;
    let quantity = validate_quantity(args.require(2, "quantity")?, product.stock)?;
    let receipt = SalesService::sell_product(repo, id, quantity, &product.currency)?;
    output::success(format!(
        "Sold {}x {} for {}. {} left in stock.",
        quantity,
        receipt.product.name,
        format_currency(receipt.transaction.amount, &receipt.transaction.currency),
        receipt.product.stock
    ));
    Ok(())
}

fn delete(context: &mut ShellContext, args: &ParsedArgs<'_>) -> CommandResult {
    let id = args.require(1, "id")?;
    if !context.confirm(args, &format!("Delete product {id}?"))? {
        output::info("Nothing deleted.");
        return Ok(());
    }
    if context.app.repository.products().delete_by_id(id)? {
        output::success(format!("Product {id} deleted."));
    } else {
        output::warning(format!("No product with id {id}."));
    }
    Ok(())
}
