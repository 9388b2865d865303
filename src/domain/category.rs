use super::common::string_enum;
use super::transaction::TransactionType;

string_enum! {
    /// Category attached to transactions, recurring definitions and budgets.
    pub enum TransactionCategory("category") {
        Food => "food",
        Transport => "transport",
        Entertainment => "entertainment",
        Health => "health",
        Shopping => "shopping",
        Services => "services",
        Salary => "salary",
        Business => "business",
        Sale => "sale",
        Other => "other",
    }
}

string_enum! {
    /// Icon names the presentation layer knows how to draw for categories.
    pub enum CategoryIcon("icon") {
        Restaurant => "restaurant",
        Car => "car",
        GameController => "game-controller",
        Medical => "medical",
        Cart => "cart",
        Construct => "construct",
        EllipsisHorizontal => "ellipsis-horizontal",
        Cash => "cash",
        Briefcase => "briefcase",
        AddCircle => "add-circle",
        Storefront => "storefront",
    }
}

/// Presentation metadata for a category as offered for one transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub category: TransactionCategory,
    pub kind: TransactionType,
    pub label: &'static str,
    pub icon: CategoryIcon,
    pub color: &'static str,
}

const fn info(
    category: TransactionCategory,
    kind: TransactionType,
    label: &'static str,
    icon: CategoryIcon,
    color: &'static str,
) -> CategoryInfo {
    CategoryInfo {
        category,
        kind,
        label,
        icon,
        color,
    }
}

/// Default category table. `Other` appears once per type it is offered for.
pub const DEFAULT_CATEGORIES: &[CategoryInfo] = &[
    info(TransactionCategory::Food, TransactionType::Expense, "Food", CategoryIcon::Restaurant, "#FF6B6B"),
    info(TransactionCategory::Transport, TransactionType::Expense, "Transport", CategoryIcon::Car, "#4ECDC4"),
    info(TransactionCategory::Entertainment, TransactionType::Expense, "Entertainment", CategoryIcon::GameController, "#45B7D1"),
    info(TransactionCategory::Health, TransactionType::Expense, "Health", CategoryIcon::Medical, "#96CEB4"),
    info(TransactionCategory::Shopping, TransactionType::Expense, "Shopping", CategoryIcon::Cart, "#FFEAA7"),
    info(TransactionCategory::Services, TransactionType::Expense, "Services", CategoryIcon::Construct, "#DDA15E"),
    info(TransactionCategory::Other, TransactionType::Expense, "Other", CategoryIcon::EllipsisHorizontal, "#95A5A6"),
    info(TransactionCategory::Salary, TransactionType::Income, "Salary", CategoryIcon::Cash, "#00D2D3"),
    info(TransactionCategory::Business, TransactionType::Income, "Business", CategoryIcon::Briefcase, "#55E6C1"),
    info(TransactionCategory::Other, TransactionType::Income, "Other", CategoryIcon::AddCircle, "#7BED8D"),
    info(TransactionCategory::Sale, TransactionType::Sale, "Sale", CategoryIcon::Storefront, "#FDA7DF"),
];

impl TransactionCategory {
    /// Categories a user may pick for the given transaction type.
    pub fn for_type(kind: TransactionType) -> Vec<TransactionCategory> {
        DEFAULT_CATEGORIES
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| entry.category)
            .collect()
    }

    pub fn is_allowed_for(&self, kind: TransactionType) -> bool {
        DEFAULT_CATEGORIES
            .iter()
            .any(|entry| entry.kind == kind && entry.category == *self)
    }

    /// First metadata entry for the category; `Other` resolves to its expense flavour.
    pub fn info(&self) -> &'static CategoryInfo {
        DEFAULT_CATEGORIES
            .iter()
            .find(|entry| entry.category == *self)
            .unwrap_or(&DEFAULT_CATEGORIES[DEFAULT_CATEGORIES.len() - 1])
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }

    pub fn color(&self) -> &'static str {
        self.info().color
    }
}
