//! The HE runtime capability set
//!
//! The search algorithm only ever talks to an encryption scheme through this
//! trait. Every binary operation mutates its left operand in place, so callers
//! clone a ciphertext before handing it to any `*_eq` method when the original
//! must survive.

use crate::error::Result;

pub trait HeRuntime: Sync {
    /// Encrypted slot vector
    type Ciphertext: Clone + Send + Sync;

    /// Number of slots per ciphertext
    fn slot_count(&self) -> usize;

    /// Plaintext modulus p
    fn plaintext_modulus(&self) -> u64;

    /// True when slot arithmetic is exact over Z_p rather than approximate
    fn is_modular_arithmetic(&self) -> bool;

    /// Encrypt a slot vector of at most `slot_count()` entries, zero-padded
    fn encode_encrypt(&self, slots: &[u64]) -> Result<Self::Ciphertext>;

    /// Decrypt into exactly `slot_count()` values in `0..p`
    fn decrypt_decode(&self, ct: &Self::Ciphertext) -> Result<Vec<u64>>;

    fn add_eq(&self, a: &mut Self::Ciphertext, b: &Self::Ciphertext) -> Result<()>;

    fn sub_eq(&self, a: &mut Self::Ciphertext, b: &Self::Ciphertext) -> Result<()>;

    fn mul_eq(&self, a: &mut Self::Ciphertext, b: &Self::Ciphertext) -> Result<()>;

    fn square_eq(&self, a: &mut Self::Ciphertext) -> Result<()> {
        let b = a.clone();
        self.mul_eq(a, &b)
    }

    fn negate_eq(&self, a: &mut Self::Ciphertext) -> Result<()>;

    /// Add `c` to every slot
    fn add_scalar_eq(&self, a: &mut Self::Ciphertext, c: u64) -> Result<()>;

    /// Cyclic shift by `steps` slots; slot i receives slot (i + steps) mod n
    fn rotate_eq(&self, a: &mut Self::Ciphertext, steps: i64) -> Result<()>;
}
