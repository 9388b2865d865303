#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use cartera_core::{
    repository::Repository,
    security::{AuthGate, BiometricAuthenticator, MemorySecretStore, ScriptedBiometrics},
    storage::{JsonFileStore, MemoryStore},
    time::FixedClock,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that outlives the calling test.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Wednesday 2024-05-15 at noon UTC.
pub fn clock() -> FixedClock {
    clock_on(2024, 5, 15)
}

pub fn clock_on(year: i32, month: u32, day: u32) -> FixedClock {
    FixedClock::at_date(NaiveDate::from_ymd_opt(year, month, day).expect("valid date"))
}

pub fn memory_repository(clock: FixedClock) -> (Repository, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (Repository::new(store.clone(), Arc::new(clock)), store)
}

/// Repository over JSON files in a fresh directory.
pub fn file_repository(clock: FixedClock) -> (Repository, PathBuf) {
    let dir = temp_dir();
    let store = JsonFileStore::new(dir.join("store")).expect("create json store");
    (Repository::new(Arc::new(store), Arc::new(clock)), dir)
}

pub struct GateFixture {
    pub gate: AuthGate,
    pub secrets: Arc<MemorySecretStore>,
    pub sensor: Arc<ScriptedBiometrics>,
}

/// An initialized gate over in-memory secrets and a scripted sensor.
pub fn gate_with(secrets: Arc<MemorySecretStore>, sensor: Arc<ScriptedBiometrics>) -> GateFixture {
    let biometrics: Arc<dyn BiometricAuthenticator> = sensor.clone();
    let gate = AuthGate::new(secrets.clone(), biometrics);
    gate.initialize();
    GateFixture {
        gate,
        secrets,
        sensor,
    }
}
