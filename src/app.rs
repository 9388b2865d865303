//! Process-wide context wiring storage, the auth gate and the clock.

use std::{path::Path, sync::Arc};

use crate::config::Config;
use crate::errors::StoreResult;
use crate::repository::Repository;
use crate::security::{
    AuthGate, BiometricAuthenticator, BiometricOutcome, FileSecretStore, NoBiometrics,
    ScriptedBiometrics, SecretStore,
};
use crate::storage::{JsonFileStore, KeyValueStore};
use crate::time::{Clock, SystemClock};
use crate::utils::PathResolver;

/// Built once at start-up and handed to whatever drives the app.
pub struct AppContext {
    pub repository: Repository,
    pub auth: AuthGate,
    clock: Arc<dyn Clock>,
}

impl AppContext {
    /// Assembles a context from injected parts and initializes the auth gate.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        secrets: Arc<dyn SecretStore>,
        biometrics: Arc<dyn BiometricAuthenticator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let auth = AuthGate::new(secrets, biometrics);
        auth.initialize();
        Self {
            repository: Repository::new(store, clock.clone()),
            auth,
            clock,
        }
    }

    /// File-backed context rooted at `data_dir`.
    pub fn open(data_dir: &Path, config: &Config) -> StoreResult<Self> {
        let store = JsonFileStore::new(PathResolver::store_dir_in(data_dir))?;
        let secrets = FileSecretStore::new(PathResolver::secure_dir_in(data_dir))?;
        let biometrics: Arc<dyn BiometricAuthenticator> = if config.biometrics_hardware {
            Arc::new(ScriptedBiometrics::new(true, BiometricOutcome::Success))
        } else {
            Arc::new(NoBiometrics)
        };
        tracing::debug!(data_dir = %data_dir.display(), "opening app context");
        Ok(Self::new(
            Arc::new(store),
            Arc::new(secrets),
            biometrics,
            Arc::new(SystemClock),
        ))
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("repository", &self.repository)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}
