/// Returns a * b mod m
pub fn modmul(a: u64, b: u64, m: u64) -> u64 {
    let mul = (a % m) as u128 * (b % m) as u128;
    (mul % (m as u128)) as u64
}

/// Returns a + b mod m
pub fn modadd(a: u64, b: u64, m: u64) -> u64 {
    (((a % m) as u128 + (b % m) as u128) % m as u128) as u64
}

/// Returns a - b mod m
pub fn modsub(a: u64, b: u64, m: u64) -> u64 {
    modadd(a, m - (b % m), m)
}

/// Returns -a mod m
pub fn modneg(a: u64, m: u64) -> u64 {
    (m - (a % m)) % m
}

/// Returns a^b mod m
pub fn modexp(x: u64, y: u64, p: u64) -> u64 {
    let (mut i, mut r, mut z) = (y, 1 % p, x % p);
    while i != 0 {
        if i & 1 == 1 {
            r = modmul(r, z, p);
        }
        z = modmul(z, z, p);
        i >>= 1;
    }
    r
}

/// Miller-Rabin witnesses that are sufficient for every 64-bit integer
const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Deterministic Miller-Rabin prime test
pub fn is_prime(p: u64) -> bool {
    if p < 2 {
        return false;
    }
    for &w in WITNESSES.iter() {
        if p == w {
            return true;
        }
        if p % w == 0 {
            return false;
        }
    }

    let s = (p - 1).trailing_zeros();
    let d = (p - 1) >> s;
    'witness: for &a in WITNESSES.iter() {
        let mut t = modexp(a, d, p);
        if t == 1 || t == p - 1 {
            continue;
        }
        for _ in 1..s {
            t = modmul(t, t, p);
            if t == p - 1 {
                continue 'witness;
            }
        }
        return false;
    }

    true
}
