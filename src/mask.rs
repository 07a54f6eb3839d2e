//! Homomorphic equality test
//!
//! For an encrypted key `k` and query `q` over Z_p with p prime:
//!
//! 1. `d = k - q` is zero exactly in the slots where the characters agree.
//! 2. `d^(p-1)` maps every non-zero slot to 1 and keeps zero slots at 0
//!    (Fermat's little theorem).
//! 3. `1 - d^(p-1)` is 1 on agreeing slots and 0 elsewhere.
//! 4. Multiplying the vector with rotated copies of itself ANDs all slots
//!    together in log2(n) rounds, leaving the verdict replicated in every slot.
//!
//! None of these steps touch the caller's ciphertexts: inputs are borrowed and
//! all in-place arithmetic runs on owned clones.

use tracing::trace;

use crate::error::{Result, SearchError};
use crate::runtime::HeRuntime;

/// Raise `ct` to the power `exp` by square-and-multiply, least significant
/// bit first. Uses `floor(log2(exp))` squarings and at most as many extra
/// multiplications.
pub fn pow_eq<R: HeRuntime>(rt: &R, ct: &mut R::Ciphertext, exp: u64) -> Result<()> {
    if exp == 0 {
        return Err(SearchError::Configuration(
            "homomorphic exponent must be positive".into(),
        ));
    }

    let mut acc: Option<R::Ciphertext> = None;
    let mut e = exp;
    while e > 1 {
        if e & 1 == 1 {
            match acc.as_mut() {
                Some(y) => rt.mul_eq(y, ct)?,
                None => acc = Some(ct.clone()),
            }
        }
        rt.square_eq(ct)?;
        e >>= 1;
    }

    if let Some(y) = acc {
        rt.mul_eq(ct, &y)?;
    }
    Ok(())
}

/// AND together all slots of a {0, 1} vector. Afterwards every slot holds 1
/// if all input slots were 1, and 0 otherwise.
///
/// The slot count must be a power of two.
pub fn reduce_and<R: HeRuntime>(rt: &R, ct: &mut R::Ciphertext) -> Result<()> {
    let n = rt.slot_count();
    if !n.is_power_of_two() {
        return Err(SearchError::Configuration(format!(
            "slot reduction needs a power-of-two slot count, got {n}"
        )));
    }

    let mut step = 1usize;
    while step < n {
        let mut tmp = ct.clone();
        rt.rotate_eq(&mut tmp, -(step as i64))?;
        rt.mul_eq(ct, &tmp)?;
        step <<= 1;
    }
    Ok(())
}

/// Per-slot match vector: 1 where `key` and `query` agree, 0 elsewhere
pub fn slot_matches<R: HeRuntime>(
    rt: &R,
    key: &R::Ciphertext,
    query: &R::Ciphertext,
) -> Result<R::Ciphertext> {
    let p = rt.plaintext_modulus();

    let mut ct = key.clone();
    rt.sub_eq(&mut ct, query)?;
    pow_eq(rt, &mut ct, p - 1)?;
    rt.negate_eq(&mut ct)?;
    rt.add_scalar_eq(&mut ct, 1)?;
    Ok(ct)
}

/// Equality mask of one store key against the query: all ones on a full match,
/// all zeros otherwise
pub fn compute_mask<R: HeRuntime>(
    rt: &R,
    key: &R::Ciphertext,
    query: &R::Ciphertext,
) -> Result<R::Ciphertext> {
    let mut ct = slot_matches(rt, key, query)?;
    reduce_and(rt, &mut ct)?;
    trace!("equality mask computed");
    Ok(ct)
}
