//! Search parameters
//!
//! The slot count and plaintext modulus are properties of the HE context. They
//! are carried here as one immutable value and handed to every component that
//! depends on them.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::math::is_prime;
use crate::runtime::HeRuntime;

/// Smallest modulus able to hold 7-bit ASCII character codes
pub const MIN_PLAINTEXT_MODULUS: u64 = 127;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Number of slots per ciphertext (power of two)
    pub slot_count: usize,

    /// Plaintext modulus p (prime, at least 127)
    pub plaintext_modulus: u64,

    /// Worker threads for per-entry mask computation.
    /// `None` runs on the global rayon pool.
    pub threads: Option<usize>,
}

impl SearchParams {
    /// 32 slots with p = 257, enough for short country and capital names
    pub fn demo() -> Self {
        Self::ascii(32)
    }

    /// `slot_count` slots with the smallest prime above the 8-bit range
    pub fn ascii(slot_count: usize) -> Self {
        Self {
            slot_count,
            plaintext_modulus: 257,
            threads: None,
        }
    }

    pub fn with_modulus(mut self, plaintext_modulus: u64) -> Self {
        self.plaintext_modulus = plaintext_modulus;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Check that the parameters can carry the equality search
    pub fn validate(&self) -> Result<()> {
        if self.slot_count == 0 || !self.slot_count.is_power_of_two() {
            return Err(SearchError::Configuration(format!(
                "slot count {} is not a power of two",
                self.slot_count
            )));
        }

        if !is_prime(self.plaintext_modulus) {
            return Err(SearchError::Configuration(format!(
                "plaintext modulus {} is not prime",
                self.plaintext_modulus
            )));
        }

        if self.plaintext_modulus < MIN_PLAINTEXT_MODULUS {
            return Err(SearchError::Configuration(format!(
                "plaintext modulus {} is below {}",
                self.plaintext_modulus, MIN_PLAINTEXT_MODULUS
            )));
        }

        // String lengths must be representable as slot values
        if self.slot_count as u64 >= self.plaintext_modulus {
            return Err(SearchError::Configuration(format!(
                "slot count {} must be below the plaintext modulus {}",
                self.slot_count, self.plaintext_modulus
            )));
        }

        if self.threads == Some(0) {
            return Err(SearchError::Configuration(
                "thread count must be positive".into(),
            ));
        }

        Ok(())
    }
}

/// Check that a runtime can carry the equality search. Must pass before any
/// data is encrypted under it.
pub fn validate_runtime<R: HeRuntime>(rt: &R) -> Result<()> {
    if !rt.is_modular_arithmetic() {
        return Err(SearchError::Configuration(
            "equality search needs exact modular arithmetic".into(),
        ));
    }
    SearchParams {
        slot_count: rt.slot_count(),
        plaintext_modulus: rt.plaintext_modulus(),
        threads: None,
    }
    .validate()
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::demo()
    }
}
