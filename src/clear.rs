//! In-the-clear HE runtime
//!
//! Ciphertexts are plain slot vectors tagged with the modulus they live under.
//! Nothing is hidden, but every operation follows the same contract a real
//! scheme exposes, which makes this runtime the reference for testing and
//! benchmarking the search algorithm independently of cryptographic cost.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Result, SearchError};
use crate::params::SearchParams;
use crate::runtime::HeRuntime;
use crate::slots::SlotRing;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCiphertext {
    slots: Vec<u64>,
    modulus: u64,
}

/// Snapshot of the operations performed by a [`ClearRuntime`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OpCounts {
    pub encryptions: u64,
    pub decryptions: u64,
    pub additions: u64,
    pub multiplications: u64,
    pub rotations: u64,
}

#[derive(Debug, Default)]
struct Counters {
    encryptions: AtomicU64,
    decryptions: AtomicU64,
    additions: AtomicU64,
    multiplications: AtomicU64,
    rotations: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Debug)]
pub struct ClearRuntime {
    ring: SlotRing,
    counters: Counters,
}

impl ClearRuntime {
    pub fn new(params: &SearchParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            ring: SlotRing::new(params.slot_count, params.plaintext_modulus),
            counters: Counters::default(),
        })
    }

    pub fn ring(&self) -> &SlotRing {
        &self.ring
    }

    pub fn op_counts(&self) -> OpCounts {
        let c = &self.counters;
        OpCounts {
            encryptions: c.encryptions.load(Ordering::Relaxed),
            decryptions: c.decryptions.load(Ordering::Relaxed),
            additions: c.additions.load(Ordering::Relaxed),
            multiplications: c.multiplications.load(Ordering::Relaxed),
            rotations: c.rotations.load(Ordering::Relaxed),
        }
    }

    fn check(&self, ct: &ClearCiphertext) -> Result<()> {
        if ct.slots.len() != self.ring.slot_count() {
            return Err(SearchError::IncompatibleCiphertext(format!(
                "ciphertext has {} slots, runtime expects {}",
                ct.slots.len(),
                self.ring.slot_count()
            )));
        }
        if ct.modulus != self.ring.modulus() {
            return Err(SearchError::IncompatibleCiphertext(format!(
                "ciphertext modulus {} differs from runtime modulus {}",
                ct.modulus,
                self.ring.modulus()
            )));
        }
        if let Some(v) = ct.slots.iter().find(|&&v| v >= ct.modulus) {
            return Err(SearchError::IncompatibleCiphertext(format!(
                "slot value {} out of range for modulus {}",
                v, ct.modulus
            )));
        }
        Ok(())
    }

    fn check_pair(&self, a: &ClearCiphertext, b: &ClearCiphertext) -> Result<()> {
        self.check(a)?;
        self.check(b)
    }
}

impl HeRuntime for ClearRuntime {
    type Ciphertext = ClearCiphertext;

    fn slot_count(&self) -> usize {
        self.ring.slot_count()
    }

    fn plaintext_modulus(&self) -> u64 {
        self.ring.modulus()
    }

    fn is_modular_arithmetic(&self) -> bool {
        true
    }

    fn encode_encrypt(&self, slots: &[u64]) -> Result<ClearCiphertext> {
        let slots = self.ring.encode(slots).ok_or_else(|| {
            SearchError::IncompatibleCiphertext(format!(
                "plaintext has {} values, runtime has {} slots",
                slots.len(),
                self.ring.slot_count()
            ))
        })?;
        Counters::bump(&self.counters.encryptions);
        Ok(ClearCiphertext {
            slots,
            modulus: self.ring.modulus(),
        })
    }

    fn decrypt_decode(&self, ct: &ClearCiphertext) -> Result<Vec<u64>> {
        self.check(ct)?;
        Counters::bump(&self.counters.decryptions);
        Ok(ct.slots.clone())
    }

    fn add_eq(&self, a: &mut ClearCiphertext, b: &ClearCiphertext) -> Result<()> {
        self.check_pair(a, b)?;
        Counters::bump(&self.counters.additions);
        self.ring.add_eq(&mut a.slots, &b.slots);
        Ok(())
    }

    fn sub_eq(&self, a: &mut ClearCiphertext, b: &ClearCiphertext) -> Result<()> {
        self.check_pair(a, b)?;
        Counters::bump(&self.counters.additions);
        self.ring.sub_eq(&mut a.slots, &b.slots);
        Ok(())
    }

    fn mul_eq(&self, a: &mut ClearCiphertext, b: &ClearCiphertext) -> Result<()> {
        self.check_pair(a, b)?;
        Counters::bump(&self.counters.multiplications);
        self.ring.mul_eq(&mut a.slots, &b.slots);
        Ok(())
    }

    fn negate_eq(&self, a: &mut ClearCiphertext) -> Result<()> {
        self.check(a)?;
        self.ring.neg_eq(&mut a.slots);
        Ok(())
    }

    fn add_scalar_eq(&self, a: &mut ClearCiphertext, c: u64) -> Result<()> {
        self.check(a)?;
        Counters::bump(&self.counters.additions);
        self.ring.cadd(&mut a.slots, c);
        Ok(())
    }

    fn rotate_eq(&self, a: &mut ClearCiphertext, steps: i64) -> Result<()> {
        self.check(a)?;
        Counters::bump(&self.counters.rotations);
        self.ring.rotate(&mut a.slots, steps);
        Ok(())
    }
}

/// Forwards to a [`ClearRuntime`] but reports approximate arithmetic
#[cfg(test)]
pub(crate) struct Approximate(pub ClearRuntime);

#[cfg(test)]
impl HeRuntime for Approximate {
    type Ciphertext = <ClearRuntime as HeRuntime>::Ciphertext;

    fn slot_count(&self) -> usize {
        self.0.slot_count()
    }
    fn plaintext_modulus(&self) -> u64 {
        self.0.plaintext_modulus()
    }
    fn is_modular_arithmetic(&self) -> bool {
        false
    }
    fn encode_encrypt(&self, slots: &[u64]) -> Result<Self::Ciphertext> {
        self.0.encode_encrypt(slots)
    }
    fn decrypt_decode(&self, ct: &Self::Ciphertext) -> Result<Vec<u64>> {
        self.0.decrypt_decode(ct)
    }
    fn add_eq(&self, a: &mut Self::Ciphertext, b: &Self::Ciphertext) -> Result<()> {
        self.0.add_eq(a, b)
    }
    fn sub_eq(&self, a: &mut Self::Ciphertext, b: &Self::Ciphertext) -> Result<()> {
        self.0.sub_eq(a, b)
    }
    fn mul_eq(&self, a: &mut Self::Ciphertext, b: &Self::Ciphertext) -> Result<()> {
        self.0.mul_eq(a, b)
    }
    fn negate_eq(&self, a: &mut Self::Ciphertext) -> Result<()> {
        self.0.negate_eq(a)
    }
    fn add_scalar_eq(&self, a: &mut Self::Ciphertext, c: u64) -> Result<()> {
        self.0.add_scalar_eq(a, c)
    }
    fn rotate_eq(&self, a: &mut Self::Ciphertext, steps: i64) -> Result<()> {
        self.0.rotate_eq(a, steps)
    }
}
