use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

/// Result of one biometric prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiometricOutcome {
    Success,
    Failure,
    /// The user dismissed the prompt.
    Cancelled,
}

/// Platform biometric prompt.
pub trait BiometricAuthenticator: Send + Sync {
    /// Hardware present and at least one biometric enrolled.
    fn is_available(&self) -> bool;
    fn authenticate(&self, prompt: &str) -> BiometricOutcome;
}

/// For hosts without a sensor.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBiometrics;

impl BiometricAuthenticator for NoBiometrics {
    fn is_available(&self) -> bool {
        false
    }

    fn authenticate(&self, _prompt: &str) -> BiometricOutcome {
        BiometricOutcome::Failure
    }
}

/// A sensor that always answers the same way until told otherwise.
#[derive(Debug)]
pub struct ScriptedBiometrics {
    available: bool,
    answer: Mutex<BiometricOutcome>,
    prompts: AtomicUsize,
}

impl ScriptedBiometrics {
    pub fn new(available: bool, answer: BiometricOutcome) -> Self {
        Self {
            available,
            answer: Mutex::new(answer),
            prompts: AtomicUsize::new(0),
        }
    }

    pub fn set_answer(&self, answer: BiometricOutcome) {
        *self.answer.lock().unwrap_or_else(|p| p.into_inner()) = answer;
    }

    /// Number of prompts shown so far.
    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

impl BiometricAuthenticator for ScriptedBiometrics {
    fn is_available(&self) -> bool {
        self.available
    }

    fn authenticate(&self, prompt: &str) -> BiometricOutcome {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(prompt, "biometric prompt");
        if !self.available {
            return BiometricOutcome::Failure;
        }
        *self.answer.lock().unwrap_or_else(|p| p.into_inner())
    }
}
