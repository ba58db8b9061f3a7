use crate::field::Fr;

/// Inner product of two scalar vectors.
///
/// # Panics
///
/// Panics if the lengths of \\(\mathbf{a}\\) and \\(\mathbf{b}\\) differ.
pub fn inner_product(a: &[Fr], b: &[Fr]) -> Fr {
    if a.len() != b.len() {
        panic!("inner_product(a,b): lengths of vectors do not match");
    }
    let mut out = Fr::zero();
    for i in 0..a.len() {
        out += a[i] * b[i];
    }
    out
}

/// The first `n` powers of `x`, starting from `x^0`.
pub fn powers_of(x: Fr, n: usize) -> Vec<Fr> {
    let mut out = Vec::with_capacity(n);
    let mut acc = Fr::one();
    for _ in 0..n {
        out.push(acc);
        acc *= x;
    }
    out
}

/// Reads a 32-byte array from a slice that is at least 32 bytes long.
pub fn read32(data: &[u8]) -> [u8; 32] {
    let mut buf32 = [0u8; 32];
    buf32[..].copy_from_slice(&data[..32]);
    buf32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_product_small() {
        let a = vec![Fr::from(1u64), Fr::from(2u64), Fr::from(3u64), Fr::from(4u64)];
        let b = vec![Fr::from(2u64), Fr::from(3u64), Fr::from(4u64), Fr::from(5u64)];
        assert_eq!(inner_product(&a, &b), Fr::from(40u64));
    }

    #[test]
    fn powers_start_at_one() {
        let p = powers_of(Fr::from(3u64), 4);
        assert_eq!(
            p,
            vec![Fr::one(), Fr::from(3u64), Fr::from(9u64), Fr::from(27u64)]
        );
    }
}
