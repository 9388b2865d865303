pub mod biometrics;
pub mod digest;
pub mod gate;
pub mod secret_store;

pub use biometrics::{BiometricAuthenticator, BiometricOutcome, NoBiometrics, ScriptedBiometrics};
pub use gate::{AuthGate, AuthSnapshot, LockState, SubscriptionId, BIOMETRICS_ENABLED_KEY, PIN_KEY};
pub use secret_store::{FileSecretStore, MemorySecretStore, SecretStore};
