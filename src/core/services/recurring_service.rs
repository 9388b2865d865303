use crate::domain::RecurringTransaction;
use crate::errors::{OperationError, OperationResult};
use crate::repository::Repository;

/// Definitions are stored and toggled only; nothing turns them into transactions.
pub struct RecurringService;

impl RecurringService {
    pub fn set_active(
        repo: &Repository,
        id: &str,
        active: bool,
    ) -> OperationResult<RecurringTransaction> {
        let updated = repo.recurring().modify(|items| {
            let item = items
                .iter_mut()
                .find(|item| item.id == id)
                .ok_or_else(|| OperationError::RecurringNotFound(id.to_string()))?;
            item.active = active;
            Ok::<_, OperationError>(item.clone())
        })?;
        tracing::info!(id, active, "recurring transaction toggled");
        Ok(updated)
    }

    /// Active definitions first, each group in stored order.
    pub fn list(repo: &Repository) -> Vec<RecurringTransaction> {
        let mut items = repo.recurring().all();
        items.sort_by_key(|item| !item.active);
        items
    }
}
