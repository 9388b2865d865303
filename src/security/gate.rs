//! PIN/biometric lock gate deciding whether the rest of the app is reachable.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::errors::{AuthError, AuthResult};
use crate::validation::validate_pin;

use super::biometrics::{BiometricAuthenticator, BiometricOutcome};
use super::digest::{self, PinCheck};
use super::secret_store::SecretStore;

pub const PIN_KEY: &str = "user_pin";
pub const BIOMETRICS_ENABLED_KEY: &str = "biometrics_enabled";
const BIOMETRIC_PROMPT: &str = "Unlock Cartera";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// `initialize` has not run yet.
    Uninitialized,
    /// No PIN is stored; the app never locks.
    NoPin,
    Locked,
    Unlocked,
}

/// Observable view of the gate after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub state: LockState,
    pub is_locked: bool,
    pub is_setup: bool,
    pub has_pin: bool,
    pub has_biometrics: bool,
    pub biometrics_enabled: bool,
}

#[derive(Debug, Clone, Copy)]
struct GateState {
    lock: LockState,
    has_biometrics: bool,
    biometrics_enabled: bool,
}

impl GateState {
    fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            state: self.lock,
            is_locked: matches!(self.lock, LockState::Locked | LockState::Uninitialized),
            is_setup: self.lock != LockState::Uninitialized,
            has_pin: matches!(self.lock, LockState::Locked | LockState::Unlocked),
            has_biometrics: self.has_biometrics,
            biometrics_enabled: self.biometrics_enabled,
        }
    }
}

pub type SubscriptionId = usize;
type Listener = Box<dyn Fn(&AuthSnapshot) + Send + Sync>;

/// Lock gate over a secret store and a biometric prompt.
///
/// Listeners run after every transition that changes the snapshot, outside the
/// state lock. A listener must not subscribe or unsubscribe from its callback.
pub struct AuthGate {
    secrets: Arc<dyn SecretStore>,
    biometrics: Arc<dyn BiometricAuthenticator>,
    state: Mutex<GateState>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_listener: Mutex<SubscriptionId>,
}

impl AuthGate {
    pub fn new(secrets: Arc<dyn SecretStore>, biometrics: Arc<dyn BiometricAuthenticator>) -> Self {
        Self {
            secrets,
            biometrics,
            state: Mutex::new(GateState {
                lock: LockState::Uninitialized,
                has_biometrics: false,
                biometrics_enabled: false,
            }),
            listeners: Mutex::new(Vec::new()),
            next_listener: Mutex::new(0),
        }
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.state().snapshot()
    }

    pub fn lock_state(&self) -> LockState {
        self.state().lock
    }

    pub fn is_locked(&self) -> bool {
        self.snapshot().is_locked
    }

    pub fn is_setup(&self) -> bool {
        self.snapshot().is_setup
    }

    pub fn has_pin(&self) -> bool {
        self.snapshot().has_pin
    }

    pub fn has_biometrics(&self) -> bool {
        self.state().has_biometrics
    }

    pub fn biometrics_enabled(&self) -> bool {
        self.state().biometrics_enabled
    }

    pub fn subscribe(&self, listener: impl Fn(&AuthSnapshot) + Send + Sync + 'static) -> SubscriptionId {
        let id = {
            let mut next = lock(&self.next_listener);
            *next += 1;
            *next
        };
        lock(&self.listeners).push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = lock(&self.listeners);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Reads the stored secret and settles the cold-start state.
    ///
    /// With a PIN present the gate locks and, when biometrics are available and
    /// enabled, issues one biometric challenge. Any storage failure leaves the
    /// app unlocked without a PIN.
    pub fn initialize(&self) -> AuthSnapshot {
        let has_biometrics = self.biometrics.is_available();
        let stored = self.secrets.get(PIN_KEY).and_then(|pin| {
            let enabled = self.secrets.get(BIOMETRICS_ENABLED_KEY)?;
            Ok((pin.is_some(), enabled.as_deref() == Some("true")))
        });

        let biometrics_on = match stored {
            Ok((has_pin, enabled)) => {
                let biometrics_on = enabled && has_biometrics;
                self.transition(|state| {
                    state.lock = if has_pin {
                        LockState::Locked
                    } else {
                        LockState::NoPin
                    };
                    state.has_biometrics = has_biometrics;
                    state.biometrics_enabled = biometrics_on;
                });
                tracing::info!(has_pin, biometrics_on, "auth gate initialized");
                has_pin && biometrics_on
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not read auth secrets, starting unlocked");
                self.transition(|state| {
                    state.lock = LockState::NoPin;
                    state.has_biometrics = has_biometrics;
                    state.biometrics_enabled = false;
                });
                false
            }
        };

        if biometrics_on {
            self.unlock_with_biometrics();
        }
        self.snapshot()
    }

    /// Stores a digest of `pin` and unlocks. No previous PIN is required.
    pub fn setup_pin(&self, pin: &str) -> AuthResult<()> {
        validate_pin(pin).map_err(|_| AuthError::InvalidPinFormat)?;
        self.secrets.set(PIN_KEY, &digest::digest(pin)).map_err(|err| {
            tracing::error!(error = %err, "failed to store PIN");
            AuthError::from(err)
        })?;
        self.transition(|state| state.lock = LockState::Unlocked);
        tracing::info!("PIN set");
        Ok(())
    }

    /// Unlocks when `pin` matches the stored digest. Mismatches, a missing PIN
    /// and unreadable storage all return `false`.
    pub fn unlock(&self, pin: &str) -> bool {
        let stored = match self.secrets.get(PIN_KEY) {
            Ok(Some(stored)) => stored,
            Ok(None) => return false,
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored PIN");
                return false;
            }
        };
        let check = digest::verify(pin, &stored);
        if check == PinCheck::LegacyMatch {
            match self.secrets.set(PIN_KEY, &digest::digest(pin)) {
                Ok(()) => tracing::info!("upgraded legacy PIN digest"),
                Err(err) => tracing::warn!(error = %err, "could not upgrade legacy PIN digest"),
            }
        }
        if !check.is_match() {
            tracing::warn!("unlock rejected");
            return false;
        }
        self.transition(|state| state.lock = LockState::Unlocked);
        tracing::info!("unlocked with PIN");
        true
    }

    /// Runs the biometric prompt; any outcome other than success leaves the
    /// state untouched.
    pub fn unlock_with_biometrics(&self) -> bool {
        if !self.biometrics.is_available() {
            return false;
        }
        match self.biometrics.authenticate(BIOMETRIC_PROMPT) {
            BiometricOutcome::Success => {
                self.transition(|state| {
                    if state.lock == LockState::Locked {
                        state.lock = LockState::Unlocked;
                    }
                });
                tracing::info!("unlocked with biometrics");
                true
            }
            outcome => {
                tracing::debug!(?outcome, "biometric unlock declined");
                false
            }
        }
    }

    pub fn enable_biometrics(&self, enabled: bool) -> AuthResult<()> {
        if enabled && !self.has_biometrics() {
            return Err(AuthError::BiometricsUnavailable);
        }
        let value = if enabled { "true" } else { "false" };
        self.secrets.set(BIOMETRICS_ENABLED_KEY, value)?;
        self.transition(|state| state.biometrics_enabled = enabled);
        tracing::info!(enabled, "biometric unlock preference changed");
        Ok(())
    }

    /// Replaces the PIN after verifying `old_pin`. A wrong `old_pin` returns
    /// `Ok(false)` and changes nothing.
    pub fn change_pin(&self, old_pin: &str, new_pin: &str) -> AuthResult<bool> {
        validate_pin(new_pin).map_err(|_| AuthError::InvalidPinFormat)?;
        if !self.unlock(old_pin) {
            return Ok(false);
        }
        self.setup_pin(new_pin)?;
        Ok(true)
    }

    /// Erases the PIN and the biometrics flag after verifying `pin`.
    pub fn remove_pin(&self, pin: &str) -> AuthResult<bool> {
        if !self.unlock(pin) {
            return Ok(false);
        }
        // Flag first, so a failed delete never leaves a lock without a stored PIN.
        self.secrets.delete(BIOMETRICS_ENABLED_KEY)?;
        self.transition(|state| state.biometrics_enabled = false);
        self.secrets.delete(PIN_KEY)?;
        self.transition(|state| state.lock = LockState::NoPin);
        tracing::info!("PIN removed");
        Ok(true)
    }

    /// Locks an unlocked gate. Without a PIN this does nothing.
    pub fn lock(&self) -> bool {
        let mut locked = false;
        self.transition(|state| {
            if state.lock == LockState::Unlocked {
                state.lock = LockState::Locked;
                locked = true;
            }
        });
        if locked {
            tracing::info!("locked");
        }
        locked
    }

    fn state(&self) -> MutexGuard<'_, GateState> {
        lock(&self.state)
    }

    fn transition(&self, apply: impl FnOnce(&mut GateState)) {
        let (before, after) = {
            let mut state = self.state();
            let before = state.snapshot();
            apply(&mut state);
            (before, state.snapshot())
        };
        if before != after {
            for (_, listener) in lock(&self.listeners).iter() {
                listener(&after);
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("state", &self.snapshot())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{StoreError, StoreResult};
    use crate::security::{MemorySecretStore, NoBiometrics};

    /// Memory secrets whose `delete` fails for one key.
    struct StuckKey {
        inner: MemorySecretStore,
        key: &'static str,
    }

    impl SecretStore for StuckKey {
        fn get(&self, key: &str) -> StoreResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> StoreResult<()> {
            self.inner.set(key, value)
        }

        fn delete(&self, key: &str) -> StoreResult<()> {
            if key == self.key {
                return Err(StoreError::Unavailable(format!("cannot delete {key}")));
            }
            self.inner.delete(key)
        }
    }

    fn gate_with_stuck_key(key: &'static str) -> (AuthGate, Arc<StuckKey>) {
        let secrets = Arc::new(StuckKey {
            inner: MemorySecretStore::new(),
            key,
        });
        let gate = AuthGate::new(secrets.clone(), Arc::new(NoBiometrics));
        gate.initialize();
        gate.setup_pin("1234").unwrap();
        (gate, secrets)
    }

    fn gate() -> (AuthGate, Arc<MemorySecretStore>) {
        let secrets = Arc::new(MemorySecretStore::new());
        (AuthGate::new(secrets.clone(), Arc::new(NoBiometrics)), secrets)
    }

    #[test]
    fn starts_uninitialized_and_locked() {
        let (gate, _) = gate();
        let snapshot = gate.snapshot();
        assert_eq!(snapshot.state, LockState::Uninitialized);
        assert!(snapshot.is_locked);
        assert!(!snapshot.is_setup);
    }

    #[test]
    fn lock_without_pin_is_a_no_op() {
        let (gate, _) = gate();
        gate.initialize();
        assert!(!gate.lock());
        assert_eq!(gate.lock_state(), LockState::NoPin);
    }

    #[test]
    fn setup_rejects_malformed_pins() {
        let (gate, secrets) = gate();
        gate.initialize();
        assert!(matches!(gate.setup_pin("12a4"), Err(AuthError::InvalidPinFormat)));
        assert_eq!(secrets.get(PIN_KEY).unwrap(), None);
    }

    #[test]
    fn legacy_digest_is_upgraded_after_unlock() {
        let (gate, secrets) = gate();
        secrets.set(PIN_KEY, &digest::legacy_digest("1234")).unwrap();
        gate.initialize();
        assert!(gate.is_locked());
        assert!(gate.unlock("1234"));
        let stored = secrets.get(PIN_KEY).unwrap().unwrap();
        assert!(stored.starts_with("v1$"));
        assert!(gate.lock());
        assert!(gate.unlock("1234"));
    }

    #[test]
    fn remove_pin_failing_on_the_flag_keeps_a_working_pin() {
        let (gate, secrets) = gate_with_stuck_key(BIOMETRICS_ENABLED_KEY);
        assert!(gate.remove_pin("1234").is_err());
        assert!(gate.has_pin());
        assert!(secrets.get(PIN_KEY).unwrap().is_some());
        assert!(gate.lock());
        assert!(gate.unlock("1234"));
    }

    #[test]
    fn remove_pin_failing_on_the_pin_can_still_lock_and_unlock() {
        let (gate, secrets) = gate_with_stuck_key(PIN_KEY);
        assert!(gate.remove_pin("1234").is_err());
        assert!(!gate.biometrics_enabled());
        assert!(secrets.get(PIN_KEY).unwrap().is_some());
        assert!(gate.lock());
        assert!(gate.unlock("1234"));
    }

    #[test]
    fn remove_pin_ends_without_a_lock() {
        let (gate, secrets) = gate();
        gate.initialize();
        gate.setup_pin("1234").unwrap();
        assert!(gate.remove_pin("1234").unwrap());
        assert_eq!(gate.lock_state(), LockState::NoPin);
        assert_eq!(secrets.get(PIN_KEY).unwrap(), None);
        assert!(!gate.lock());
    }
}
