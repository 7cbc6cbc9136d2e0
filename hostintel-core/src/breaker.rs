//! One-way latch that silences the unit for the rest of a run once it finds
//! itself without credentials.
//!
//! Unlike a failure-counting breaker this one never half-opens: a missing
//! API key is a run-fatal condition for this unit only, and the rest of the
//! pipeline keeps going.

use tracing::error;

use crate::{module::MODULE_NAME, options::ModuleOptions};

/// Outcome of a credential check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialCheck {
    Present,
    /// This call found the credential missing and tripped the breaker.
    Tripped,
    /// The breaker tripped earlier in the run.
    AlreadyTripped,
}

impl CredentialCheck {
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Present)
    }
}

#[derive(Debug, Default)]
pub struct CircuitBreaker {
    tripped: bool,
}

impl CircuitBreaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped
    }

    /// Reports a missing credential exactly once, on the call that trips the
    /// breaker. Once tripped, the options are never looked at again.
    pub fn check_credential(&mut self, options: &ModuleOptions) -> CredentialCheck {
        if self.tripped {
            return CredentialCheck::AlreadyTripped;
        }
        if options.has_credential() {
            return CredentialCheck::Present;
        }

        error!(
            module = MODULE_NAME,
            "module enabled without an API key; skipping its work for the rest of the scan"
        );
        self.tripped = true;
        CredentialCheck::Tripped
    }
}
