use crate::math::*;
use rand::prelude::*;

/// Defines the ring of slot vectors Z_p^n
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRing {
    /// Slot count
    n: usize,
    /// Plaintext modulus
    p: u64,
}

impl SlotRing {
    /// Initialize a slot ring
    pub fn new(n: usize, p: u64) -> Self {
        Self { n, p }
    }

    pub fn slot_count(&self) -> usize {
        self.n
    }

    pub fn modulus(&self) -> u64 {
        self.p
    }

    /// Zero vector
    pub fn zero(&self) -> Vec<u64> {
        vec![0u64; self.n]
    }

    /// Reduce a short vector into the ring, zero-padding the tail.
    /// Returns `None` when `x` has more than `n` entries.
    pub fn encode(&self, x: &[u64]) -> Option<Vec<u64>> {
        if x.len() > self.n {
            return None;
        }
        let mut out = self.zero();
        for (o, v) in out.iter_mut().zip(x) {
            *o = v % self.p;
        }
        Some(out)
    }

    /// Add a vector
    pub fn add_eq(&self, a: &mut [u64], b: &[u64]) {
        for (x, y) in a.iter_mut().zip(b) {
            *x = modadd(*x, *y, self.p);
        }
    }

    /// Subtract a vector
    pub fn sub_eq(&self, a: &mut [u64], b: &[u64]) {
        for (x, y) in a.iter_mut().zip(b) {
            *x = modsub(*x, *y, self.p);
        }
    }

    /// Multiply slot-wise
    pub fn mul_eq(&self, a: &mut [u64], b: &[u64]) {
        for (x, y) in a.iter_mut().zip(b) {
            *x = modmul(*x, *y, self.p);
        }
    }

    /// Negate every slot
    pub fn neg_eq(&self, a: &mut [u64]) {
        for x in a.iter_mut() {
            *x = modneg(*x, self.p);
        }
    }

    /// Add a constant to every slot
    pub fn cadd(&self, a: &mut [u64], b: u64) {
        for x in a.iter_mut() {
            *x = modadd(*x, b, self.p);
        }
    }

    /// Cyclic rotation: slot i receives slot (i + k) mod n.
    /// Negative steps rotate towards higher indices.
    pub fn rotate(&self, a: &mut [u64], k: i64) {
        if a.is_empty() {
            return;
        }
        let shift = k.rem_euclid(a.len() as i64) as usize;
        a.rotate_left(shift);
    }

    /// Sample a vector with uniformly random slots
    pub fn sample_uniform(&self) -> Vec<u64> {
        let mut rng = rand::rng();
        (0..self.n).map(|_| rng.random_range(0..self.p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 8;
    const P: u64 = 257;

    #[test]
    fn test_encode_pads() {
        let r = SlotRing::new(N, P);
        assert_eq!(r.encode(&[1, 2, 300]), Some(vec![1, 2, 43, 0, 0, 0, 0, 0]));
        assert_eq!(r.encode(&[0; N + 1]), None);
    }

    #[test]
    fn test_sub_then_add() {
        let r = SlotRing::new(N, P);
        let a = r.sample_uniform();
        let b = r.sample_uniform();
        let mut c = a.clone();
        r.sub_eq(&mut c, &b);
        r.add_eq(&mut c, &b);
        assert_eq!(c, a);
    }

    #[test]
    fn test_neg_cadd() {
        let r = SlotRing::new(N, P);
        let mut a = vec![1, 0, 1, 1, 0, 0, 1, 0];
        r.neg_eq(&mut a);
        r.cadd(&mut a, 1);
        assert_eq!(a, vec![0, 1, 0, 0, 1, 1, 0, 1]);
    }

    #[test]
    fn test_rotate() {
        let r = SlotRing::new(N, P);
        let mut a: Vec<u64> = (0..N as u64).collect();
        r.rotate(&mut a, 1);
        assert_eq!(a, vec![1, 2, 3, 4, 5, 6, 7, 0]);
        r.rotate(&mut a, -3);
        assert_eq!(a, vec![6, 7, 0, 1, 2, 3, 4, 5]);
        r.rotate(&mut a, 2 + N as i64);
        assert_eq!(a, (0..N as u64).collect::<Vec<_>>());
    }

    #[test]
    fn test_sample_in_range() {
        let r = SlotRing::new(N, P);
        assert!(r.sample_uniform().iter().all(|&x| x < P));
        assert_eq!(r.sample_uniform().len(), N);
    }
}
