use crate::error::{Result, SearchError};
use crate::runtime::HeRuntime;

/// `mask * value`: the value itself under an all-ones mask, zeros otherwise
pub fn masked_value<R: HeRuntime>(
    rt: &R,
    mut mask: R::Ciphertext,
    value: &R::Ciphertext,
) -> Result<R::Ciphertext> {
    rt.mul_eq(&mut mask, value)?;
    Ok(mask)
}

/// Running homomorphic sum of masked values, folded in arrival order
pub struct Accumulator<'a, R: HeRuntime> {
    rt: &'a R,
    sum: Option<R::Ciphertext>,
    count: usize,
}

impl<'a, R: HeRuntime> Accumulator<'a, R> {
    pub fn new(rt: &'a R) -> Self {
        Self {
            rt,
            sum: None,
            count: 0,
        }
    }

    pub fn push(&mut self, masked: R::Ciphertext) -> Result<()> {
        match self.sum.as_mut() {
            Some(sum) => self.rt.add_eq(sum, &masked)?,
            None => self.sum = Some(masked),
        }
        self.count += 1;
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// The aggregate. An empty accumulator yields an encryption of all zeros.
    pub fn finish(self) -> Result<R::Ciphertext> {
        match self.sum {
            Some(sum) => Ok(sum),
            None => self.rt.encode_encrypt(&[]),
        }
    }
}

/// Sum of `masks[i] * values[i]` over all entries, in input order
pub fn accumulate<R: HeRuntime>(
    rt: &R,
    masks: &[R::Ciphertext],
    values: &[R::Ciphertext],
) -> Result<R::Ciphertext> {
    if masks.len() != values.len() {
        return Err(SearchError::IncompatibleCiphertext(format!(
            "{} masks for {} values",
            masks.len(),
            values.len()
        )));
    }

    let mut acc = Accumulator::new(rt);
    for (mask, value) in masks.iter().zip(values) {
        acc.push(masked_value(rt, mask.clone(), value)?)?;
    }
    acc.finish()
}
