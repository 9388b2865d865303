//! File-level export and the guarded "clear everything" flow.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::errors::StoreResult;
use crate::repository::Repository;
use crate::utils::ensure_dir;

const BACKUP_PREFIX: &str = "cartera_backup";
const EXPORT_PREFIX: &str = "cartera_export";

pub struct DataService;

impl DataService {
    /// Writes the export document to `<dir>/cartera_export_<timestamp>.json`.
    pub fn export_to_file(repo: &Repository, dir: &Path) -> StoreResult<PathBuf> {
        let stamp = repo.clock().now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("{EXPORT_PREFIX}_{stamp}.json"));
        write_export(repo, &path)?;
        tracing::info!(path = %path.display(), "export written");
        Ok(path)
    }

    /// Reads an export document from disk and imports it.
    pub fn import_from_file(
        repo: &Repository,
        path: &Path,
    ) -> StoreResult<crate::repository::ImportSummary> {
        let json = fs::read_to_string(path)?;
        repo.import_data(&json)
    }

    /// Attempts a backup export, then clears transactions and products.
    ///
    /// A failed backup is logged and does not stop the clear. Returns the
    /// backup path when one was written.
    pub fn clear_all_with_backup(repo: &Repository, backup_dir: &Path) -> StoreResult<Option<PathBuf>> {
        let date = repo.clock().today().format("%Y-%m-%d");
        let path = backup_dir.join(format!("{BACKUP_PREFIX}_{date}.json"));
        let backup = match write_export(repo, &path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "backup written before clearing data");
                Some(path)
            }
            Err(err) => {
                tracing::error!(error = %err, "backup before clearing data failed");
                None
            }
        };
        repo.clear_all_data()?;
        Ok(backup)
    }
}

fn write_export(repo: &Repository, path: &Path) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = repo.export_data()?;
    fs::write(path, json)?;
    Ok(())
}
