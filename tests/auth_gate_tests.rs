mod common;

use std::sync::{Arc, Mutex};

use cartera_core::errors::AuthError;
use cartera_core::security::{
    digest, BiometricOutcome, LockState, MemorySecretStore, ScriptedBiometrics, SecretStore,
    BIOMETRICS_ENABLED_KEY, PIN_KEY,
};
use common::gate_with;

fn sensor(available: bool) -> Arc<ScriptedBiometrics> {
    Arc::new(ScriptedBiometrics::new(available, BiometricOutcome::Success))
}

#[test]
fn first_run_has_no_pin_and_is_open() {
    let fx = gate_with(Arc::new(MemorySecretStore::new()), sensor(false));
    let snapshot = fx.gate.snapshot();
    assert_eq!(snapshot.state, LockState::NoPin);
    assert!(!snapshot.is_locked);
    assert!(snapshot.is_setup);
    assert!(!snapshot.has_pin);
}

#[test]
fn stored_pin_locks_on_start_and_unlocks_with_the_right_pin() {
    let secrets = Arc::new(MemorySecretStore::new());
    secrets.set(PIN_KEY, &digest::digest("4821")).unwrap();

    let fx = gate_with(secrets, sensor(false));
    assert_eq!(fx.gate.lock_state(), LockState::Locked);
    assert!(!fx.gate.unlock("1111"));
    assert!(fx.gate.is_locked());
    assert!(fx.gate.unlock("4821"));
    assert_eq!(fx.gate.lock_state(), LockState::Unlocked);
}

#[test]
fn pin_is_never_stored_in_clear() {
    let fx = gate_with(Arc::new(MemorySecretStore::new()), sensor(false));
    fx.gate.setup_pin("2468").unwrap();
    let stored = fx.secrets.get(PIN_KEY).unwrap().expect("pin stored");
    assert_ne!(stored, "2468");
    assert!(!stored.contains("2468"));
}

#[test]
fn enabled_biometrics_challenge_once_on_start() {
    let secrets = Arc::new(MemorySecretStore::new());
    secrets.set(PIN_KEY, &digest::digest("1234")).unwrap();
    secrets.set(BIOMETRICS_ENABLED_KEY, "true").unwrap();
    let scanner = sensor(true);

    let fx = gate_with(secrets, scanner.clone());
    assert_eq!(scanner.prompts(), 1);
    assert_eq!(fx.gate.lock_state(), LockState::Unlocked);
}

#[test]
fn cancelled_biometrics_leave_the_gate_locked() {
    let secrets = Arc::new(MemorySecretStore::new());
    secrets.set(PIN_KEY, &digest::digest("1234")).unwrap();
    secrets.set(BIOMETRICS_ENABLED_KEY, "true").unwrap();
    let scanner = Arc::new(ScriptedBiometrics::new(true, BiometricOutcome::Cancelled));

    let fx = gate_with(secrets, scanner.clone());
    assert!(fx.gate.is_locked());
    assert!(!fx.gate.unlock_with_biometrics());
    scanner.set_answer(BiometricOutcome::Success);
    assert!(fx.gate.unlock_with_biometrics());
    assert!(!fx.gate.is_locked());
}

#[test]
fn biometrics_cannot_be_enabled_without_hardware() {
    let fx = gate_with(Arc::new(MemorySecretStore::new()), sensor(false));
    fx.gate.setup_pin("1234").unwrap();
    assert!(matches!(
        fx.gate.enable_biometrics(true),
        Err(AuthError::BiometricsUnavailable)
    ));
    assert!(!fx.gate.biometrics_enabled());
}

#[test]
fn change_pin_requires_the_current_pin() {
    let fx = gate_with(Arc::new(MemorySecretStore::new()), sensor(false));
    fx.gate.setup_pin("1234").unwrap();

    assert!(!fx.gate.change_pin("9999", "5678").unwrap());
    assert!(matches!(
        fx.gate.change_pin("1234", "12ab"),
        Err(AuthError::InvalidPinFormat)
    ));
    assert!(fx.gate.change_pin("1234", "5678").unwrap());

    fx.gate.lock();
    assert!(!fx.gate.unlock("1234"));
    assert!(fx.gate.unlock("5678"));
}

#[test]
fn remove_pin_clears_secrets_and_opens_the_gate() {
    let fx = gate_with(Arc::new(MemorySecretStore::new()), sensor(true));
    fx.gate.setup_pin("1234").unwrap();
    fx.gate.enable_biometrics(true).unwrap();

    assert!(!fx.gate.remove_pin("0000").unwrap());
    assert!(fx.gate.has_pin());
    assert!(fx.gate.remove_pin("1234").unwrap());
    assert_eq!(fx.gate.lock_state(), LockState::NoPin);
    assert!(!fx.gate.biometrics_enabled());
    assert_eq!(fx.secrets.get(PIN_KEY).unwrap(), None);
    assert_eq!(fx.secrets.get(BIOMETRICS_ENABLED_KEY).unwrap(), None);
}

#[test]
fn unreadable_secrets_start_without_a_pin() {
    let secrets = Arc::new(MemorySecretStore::new());
    secrets.set(PIN_KEY, &digest::digest("1234")).unwrap();
    secrets.set_unavailable(true);

    let fx = gate_with(secrets, sensor(false));
    assert_eq!(fx.gate.lock_state(), LockState::NoPin);
    assert!(!fx.gate.unlock("1234"));
}

#[test]
fn listeners_see_each_state_change_until_unsubscribed() {
    let fx = gate_with(Arc::new(MemorySecretStore::new()), sensor(false));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let id = fx
        .gate
        .subscribe(move |snapshot| sink.lock().unwrap().push(snapshot.state));

    fx.gate.setup_pin("1234").unwrap();
    fx.gate.lock();
    assert!(fx.gate.unsubscribe(id));
    fx.gate.unlock("1234");

    assert_eq!(
        *seen.lock().unwrap(),
        vec![LockState::Unlocked, LockState::Locked]
    );
}
