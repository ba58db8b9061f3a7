//! The common reference string: the fixed Pedersen commitment basis.
//!
//! The basis points are derived once by try-and-increment hash-to-curve from
//! a fixed seed and are immutable for the process lifetime; a constructed
//! [`Crs`] may be shared freely across concurrent proving and verifying
//! calls.

use sha2::{Digest, Sha256};

use crate::banderwagon::msm::multi_scalar_mul;
use crate::banderwagon::Element;
use crate::field::Fr;

/// Seed for the production Verkle basis.
pub const CRS_SEED: &[u8] = b"eth_verkle_oct_2021";

/// The fixed commitment basis: `n` ordered points `G` plus the extra point
/// `Q` the IPA protocol commits inner products against.
#[derive(Clone)]
pub struct Crs {
    pub(crate) G: Vec<Element>,
    pub(crate) Q: Element,
}

impl Crs {
    /// Derives a basis of `n` points from `seed`.
    ///
    /// Candidate x-coordinates are `SHA-256(seed || counter_be64)`; digests
    /// that are not a canonical field element, decode to no subgroup point,
    /// or hit the identity class are skipped.
    pub fn generate(n: usize, seed: &[u8]) -> Crs {
        let mut points = Vec::with_capacity(n);
        let mut counter: u64 = 0;
        while points.len() < n {
            let mut hasher = Sha256::new();
            hasher.update(seed);
            hasher.update(&counter.to_be_bytes());
            counter += 1;
            let mut candidate = [0u8; 32];
            candidate.copy_from_slice(&hasher.finalize());
            if let Some(point) = Element::from_bytes(&candidate) {
                if !point.is_identity() {
                    points.push(point);
                }
            }
        }
        Crs {
            G: points,
            Q: Element::generator(),
        }
    }

    /// The production basis: 256 points from the fixed seed.
    pub fn verkle() -> Crs {
        Crs::generate(256, CRS_SEED)
    }

    pub fn len(&self) -> usize {
        self.G.len()
    }

    pub fn is_empty(&self) -> bool {
        self.G.is_empty()
    }

    /// Pedersen vector commitment of `values` against the basis.
    ///
    /// # Panics
    ///
    /// Panics when `values` is longer than the basis.
    pub fn commit(&self, values: &[Fr]) -> Element {
        assert!(
            values.len() <= self.G.len(),
            "commit: vector longer than the basis"
        );
        multi_scalar_mul(&self.G[..values.len()], values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_basis_points() {
        // First, second and last basis points of the production CRS,
        // computed independently from the same seed.
        let crs = Crs::verkle();
        assert_eq!(crs.len(), 256);
        assert_eq!(
            hex::encode(crs.G[0].to_bytes()),
            "6c6e607df0723edfff382fa914bfc38136f3300ab2e06fb97007b559fd323b82"
        );
        assert_eq!(
            hex::encode(crs.G[1].to_bytes()),
            "6bd241cc12dc9b2c0ad6fc85e016605c49c1a92939c7faeea0a555d2a1c3ddf8"
        );
        assert_eq!(
            hex::encode(crs.G[255].to_bytes()),
            "68d6889297563a6692e6562535c679b660812548629a79a7f5f3ad203f9cb62c"
        );
    }

    #[test]
    fn basis_points_are_valid_and_distinct() {
        let crs = Crs::generate(32, b"test seed");
        for (i, p) in crs.G.iter().enumerate() {
            assert!(p.is_on_curve());
            assert!(!p.is_identity());
            for q in crs.G.iter().skip(i + 1) {
                assert!(p != q);
            }
        }
    }

    #[test]
    fn commit_is_linear() {
        let crs = Crs::generate(4, b"test seed");
        let a = vec![Fr::from(1u64), Fr::from(2u64)];
        let b = vec![Fr::from(5u64), Fr::from(7u64)];
        let sum = vec![Fr::from(6u64), Fr::from(9u64)];
        assert_eq!(crs.commit(&a) + crs.commit(&b), crs.commit(&sum));
    }

    #[test]
    #[should_panic]
    fn commit_rejects_oversized_vectors() {
        let crs = Crs::generate(2, b"test seed");
        crs.commit(&[Fr::one(), Fr::one(), Fr::one()]);
    }
}
