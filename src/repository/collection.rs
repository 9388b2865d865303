use std::sync::{Mutex, MutexGuard};

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    domain::Identifiable,
    errors::{StoreError, StoreResult},
    storage::KeyValueStore,
};

pub(crate) fn lock(mutex: &Mutex<()>) -> MutexGuard<'_, ()> {
    // The guarded data is `()`, so a poisoned lock carries no broken state.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle on one persisted collection. Cheap to create; borrow it from the
/// [`Repository`](super::Repository) whenever needed.
pub struct Collection<'a, T> {
    store: &'a dyn KeyValueStore,
    key: &'static str,
    lock: &'a Mutex<()>,
    seed: Option<Vec<T>>,
}

impl<'a, T> Collection<'a, T>
where
    T: Identifiable + Serialize + DeserializeOwned + Clone,
{
    pub(crate) fn new(store: &'a dyn KeyValueStore, key: &'static str, lock: &'a Mutex<()>) -> Self {
        Self {
            store,
            key,
            lock,
            seed: None,
        }
    }

    /// Records written the first time the key is found absent.
    pub(crate) fn with_seed(mut self, seed: Vec<T>) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Every record, or an empty list when the key is absent or unreadable.
    pub fn all(&self) -> Vec<T> {
        let _guard = lock(self.lock);
        match self.load() {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(key = self.key, error = %err, "failed to read collection");
                Vec::new()
            }
        }
    }

    pub fn find(&self, id: &str) -> Option<T> {
        self.all().into_iter().find(|item| item.id() == id)
    }

    /// Replaces the record with the same id, or appends it.
    pub fn save(&self, item: &T) -> StoreResult<()> {
        self.modify(|items| {
            match items.iter_mut().find(|existing| existing.id() == item.id()) {
                Some(existing) => *existing = item.clone(),
                None => items.push(item.clone()),
            }
            Ok::<_, StoreError>(())
        })
    }

    /// Removes the record with `id`. Returns whether anything was removed; an
    /// unknown id leaves the stored collection untouched.
    pub fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        let _guard = lock(self.lock);
        let mut items = self.load_for_write()?;
        let before = items.len();
        items.retain(|item| item.id() != id);
        if items.len() == before {
            return Ok(false);
        }
        self.write(&items)?;
        Ok(true)
    }

    /// Runs `apply` over the loaded collection under the collection lock and
    /// writes the result back when `apply` succeeds. Nothing is written on error.
    pub fn modify<R, E>(&self, apply: impl FnOnce(&mut Vec<T>) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let _guard = lock(self.lock);
        let mut items = self.load_for_write()?;
        let outcome = apply(&mut items)?;
        self.write(&items)?;
        Ok(outcome)
    }

    /// Overwrites the whole collection.
    pub fn replace_all(&self, items: &[T]) -> StoreResult<()> {
        let _guard = lock(self.lock);
        self.write(items)
    }

    fn load(&self) -> StoreResult<Vec<T>> {
        match self.store.get(self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => match &self.seed {
                Some(seed) => {
                    self.write(seed)?;
                    tracing::info!(key = self.key, count = seed.len(), "seeded collection");
                    Ok(seed.clone())
                }
                None => Ok(Vec::new()),
            },
        }
    }

    /// Like `load`, but an undecodable document counts as empty so the next
    /// write replaces it. Store failures still propagate.
    fn load_for_write(&self) -> StoreResult<Vec<T>> {
        match self.load() {
            Err(StoreError::Serialization(err)) => {
                tracing::warn!(key = self.key, error = %err, "collection is malformed, overwriting it");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn write(&self, items: &[T]) -> StoreResult<()> {
        let json = serde_json::to_string(items)?;
        self.store.set(self.key, &json)?;
        tracing::debug!(key = self.key, count = items.len(), "wrote collection");
        Ok(())
    }
}
