//! The Banderwagon group: the Bandersnatch twisted Edwards curve quotiented
//! by its 2-torsion subgroup.
//!
//! Points are held in extended coordinates `(X, Y, T, Z)` representing the
//! affine point `(X/Z, Y/Z)` on `a*x^2 + y^2 = 1 + d*x^2*y^2` with `a = -5`.
//! Two extended points are the same group element iff `X1*Y2 == X2*Y1`, which
//! folds the 2-torsion coset `(x, y) ~ (-x, -y)` into one class and gives
//! every element a single canonical 32-byte encoding.

pub mod msm;

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use crate::field::{Fp, Fr};

/// a = -5, in Montgomery form.
const EDWARDS_A: Fp = Fp::from_montgomery_limbs([
    0xfffffff40000000c,
    0xece3b023ffec4ff3,
    0x66b620607396203f,
    0x6f23d7e5f361df62,
]);

/// The Bandersnatch d coefficient, in Montgomery form.
const EDWARDS_D: Fp = Fp::from_montgomery_limbs([
    0xa8dced1b47a2c730,
    0x381c065aad3cccc7,
    0x53ff52e1188351f8,
    0x362e8d63990fe940,
]);

const GENERATOR_X: Fp = Fp::from_montgomery_limbs([
    0xec2627e1e7ab47f5,
    0x3e63de484f01aa9c,
    0xfe0f5c3b53946dc4,
    0x2d71920baeb2cfcd,
]);

const GENERATOR_Y: Fp = Fp::from_montgomery_limbs([
    0x4e30593e1895bd34,
    0x156d738f32afbe4b,
    0x45ef0b1ccdeb75f4,
    0x6a7cca0037d2e71f,
]);

const GENERATOR_T: Fp = Fp::from_montgomery_limbs([
    0x5a92e8f697adb6b9,
    0xf1388d4606b14609,
    0x101c783640a64516,
    0x1e9ae7073cc7a9fc,
]);

/// A Banderwagon group element in extended twisted Edwards coordinates.
#[derive(Clone, Copy, Debug)]
pub struct Element {
    pub(crate) x: Fp,
    pub(crate) y: Fp,
    pub(crate) t: Fp,
    pub(crate) z: Fp,
}

/// A Banderwagon element in its canonical 32-byte compressed encoding.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CompressedPoint(pub [u8; 32]);

/// An affine point, used internally by the MSM bucket method.
///
/// `t` caches `x * y` so that mixed addition costs no extra multiplication.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AffinePoint {
    pub(crate) x: Fp,
    pub(crate) y: Fp,
    pub(crate) t: Fp,
}

impl Element {
    /// The identity class `{(0, 1), (0, -1)}`.
    pub fn identity() -> Element {
        Element {
            x: Fp::zero(),
            y: Fp::one(),
            t: Fp::zero(),
            z: Fp::one(),
        }
    }

    /// The fixed group generator.
    pub fn generator() -> Element {
        Element {
            x: GENERATOR_X,
            y: GENERATOR_Y,
            t: GENERATOR_T,
            z: Fp::one(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.x.is_zero()
    }

    /// Unified extended-coordinate addition (HWCD 2008); no field division.
    pub fn add(&self, other: &Element) -> Element {
        let a = self.x * other.x;
        let b = self.y * other.y;
        let c = EDWARDS_D * self.t * other.t;
        let d = self.z * other.z;
        let e = (self.x + self.y) * (other.x + other.y) - a - b;
        let f = d - c;
        let g = d + c;
        let h = b - EDWARDS_A * a;
        Element {
            x: e * f,
            y: g * h,
            t: e * h,
            z: f * g,
        }
    }

    /// Mixed addition with an affine second operand (Z2 = 1).
    pub(crate) fn add_mixed(&self, other: &AffinePoint) -> Element {
        let a = self.x * other.x;
        let b = self.y * other.y;
        let c = EDWARDS_D * self.t * other.t;
        let d = self.z;
        let e = (self.x + self.y) * (other.x + other.y) - a - b;
        let f = d - c;
        let g = d + c;
        let h = b - EDWARDS_A * a;
        Element {
            x: e * f,
            y: g * h,
            t: e * h,
            z: f * g,
        }
    }

    /// Dedicated doubling formula (HWCD 2008).
    pub fn double(&self) -> Element {
        let a = self.x.square();
        let b = self.y.square();
        let c = self.z.square().double();
        let d = EDWARDS_A * a;
        let e = (self.x + self.y).square() - a - b;
        let g = d + b;
        let f = g - c;
        let h = d - b;
        Element {
            x: e * f,
            y: g * h,
            t: e * h,
            z: f * g,
        }
    }

    /// Scalar multiplication by double-and-add over the canonical scalar bits.
    pub fn mul_scalar(&self, scalar: &Fr) -> Element {
        let limbs = scalar.from_montgomery();
        let mut acc = Element::identity();
        let mut started = false;
        for i in (0..4).rev() {
            for bit in (0..64).rev() {
                if started {
                    acc = acc.double();
                }
                if (limbs[i] >> bit) & 1 == 1 {
                    acc = Element::add(&acc, self);
                    started = true;
                }
            }
        }
        acc
    }

    /// Affine coordinates of this representative.
    pub(crate) fn to_affine(&self) -> AffinePoint {
        let zinv = self.z.invert();
        let x = self.x * zinv;
        let y = self.y * zinv;
        AffinePoint { x, y, t: x * y }
    }

    /// Canonical compressed encoding: the big-endian affine x-coordinate of
    /// the class representative whose y is lexicographically largest.
    pub fn to_bytes(&self) -> [u8; 32] {
        let affine = self.to_affine();
        let mut x = affine.x;
        if !affine.y.lexicographically_largest() {
            x = -x;
        }
        x.to_bytes_be()
    }

    pub fn compress(&self) -> CompressedPoint {
        CompressedPoint(self.to_bytes())
    }

    /// Decodes a compressed element, rejecting out-of-range x-coordinates,
    /// x with no valid y, and points outside the prime-order quotient
    /// (`legendre(1 - a*x^2) != 1`).
    pub fn from_bytes(bytes: &[u8; 32]) -> Option<Element> {
        let x = Fp::from_bytes_be(bytes)?;
        Self::from_x_coordinate(x)
    }

    pub(crate) fn from_x_coordinate(x: Fp) -> Option<Element> {
        let x_sq = x.square();
        // Subgroup membership: 1 - a*x^2 must be a non-zero square.
        let numerator = Fp::one() - EDWARDS_A * x_sq;
        if !x.is_zero() && numerator.legendre() != 1 {
            return None;
        }
        // y^2 = (1 - a*x^2) / (1 - d*x^2); d is a non-square so the
        // denominator never vanishes.
        let denominator = Fp::one() - EDWARDS_D * x_sq;
        let y_sq = numerator * denominator.invert();
        let mut y = y_sq.sqrt()?;
        if !y.lexicographically_largest() {
            y = -y;
        }
        Some(Element {
            x,
            y,
            t: x * y,
            z: Fp::one(),
        })
    }

    /// Checks the projective curve equation and the T-coordinate invariant.
    pub fn is_on_curve(&self) -> bool {
        let x_sq = self.x.square();
        let y_sq = self.y.square();
        let z_sq = self.z.square();
        let lhs = (EDWARDS_A * x_sq + y_sq) * z_sq;
        let rhs = z_sq.square() + EDWARDS_D * x_sq * y_sq;
        lhs == rhs && self.x * self.y == self.t * self.z
    }
}

impl CompressedPoint {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn decompress(&self) -> Option<Element> {
        Element::from_bytes(&self.0)
    }
}

/// Quotient equality: `(X1/Z1, Y1/Z1)` and `(X2/Z2, Y2/Z2)` are the same
/// group element iff `x1*y2 == x2*y1`.
impl PartialEq for Element {
    fn eq(&self, other: &Element) -> bool {
        self.x * other.y == other.x * self.y
    }
}

impl Eq for Element {}

impl Add for Element {
    type Output = Element;

    fn add(self, rhs: Element) -> Element {
        Element::add(&self, &rhs)
    }
}

impl Sub for Element {
    type Output = Element;

    fn sub(self, rhs: Element) -> Element {
        Element::add(&self, &-rhs)
    }
}

impl Neg for Element {
    type Output = Element;

    fn neg(self) -> Element {
        Element {
            x: -self.x,
            y: self.y,
            t: -self.t,
            z: self.z,
        }
    }
}

impl Mul<Fr> for Element {
    type Output = Element;

    fn mul(self, scalar: Fr) -> Element {
        self.mul_scalar(&scalar)
    }
}

impl<'a> Mul<Fr> for &'a Element {
    type Output = Element;

    fn mul(self, scalar: Fr) -> Element {
        self.mul_scalar(&scalar)
    }
}

impl fmt::Display for CompressedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaChaRng;

    fn rng() -> ChaChaRng {
        ChaChaRng::seed_from_u64(1858)
    }

    pub(crate) fn random_scalar(rng: &mut ChaChaRng) -> Fr {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Fr::from_bytes_le_reduced(&bytes)
    }

    fn random_point(rng: &mut ChaChaRng) -> Element {
        Element::generator().mul_scalar(&random_scalar(rng))
    }

    #[test]
    fn generator_is_on_curve() {
        assert!(Element::generator().is_on_curve());
        assert!(Element::identity().is_on_curve());
    }

    #[test]
    fn known_encodings() {
        // Encodings of G, 2G and 3G, computed independently.
        let g = Element::generator();
        assert_eq!(
            hex::encode(g.to_bytes()),
            "4a2c7486fd924882bf02c6908de395122843e3e05264d7991e18e7985dad51e9"
        );
        assert_eq!(
            hex::encode(g.double().to_bytes()),
            "43aa74ef706605705989e8fd38df46873b7eae5921fbed115ac9d937399ce4d5"
        );
        assert_eq!(
            hex::encode((g.double() + g).to_bytes()),
            "49730da2a2931b0402ee45d704997e8e33d462382e41ad209aa2dd869de5cb9b"
        );
    }

    #[test]
    fn group_laws() {
        let mut rng = rng();
        for _ in 0..10 {
            let p = random_point(&mut rng);
            let q = random_point(&mut rng);
            assert!(p.is_on_curve());
            assert_eq!(p + Element::identity(), p);
            assert_eq!(p.double(), p + p);
            assert_eq!(-p + p, Element::identity());
            assert_eq!(p + q, q + p);
            assert_eq!(p - q + q, p);
        }
    }

    #[test]
    fn inherent_add_matches_operator() {
        let mut rng = rng();
        let p = random_point(&mut rng);
        let q = random_point(&mut rng);
        assert_eq!(Element::add(&p, &q), p + q);
    }

    #[test]
    fn encode_decode_round_trip() {
        let mut rng = rng();
        for _ in 0..10 {
            let p = random_point(&mut rng);
            let decoded = Element::from_bytes(&p.to_bytes()).unwrap();
            assert_eq!(decoded, p);
            // Re-encoding the canonical representative is byte-identical.
            assert_eq!(decoded.to_bytes(), p.to_bytes());
        }
    }

    #[test]
    fn identity_round_trip() {
        let id = Element::identity();
        assert_eq!(id.to_bytes(), [0u8; 32]);
        let decoded = Element::from_bytes(&[0u8; 32]).unwrap();
        assert!(decoded.is_identity());
        assert_eq!(decoded, id);
    }

    #[test]
    fn two_torsion_coset_is_identified() {
        // (x, y) and (-x, -y) are the same group element.
        let p = Element::generator();
        let coset = Element {
            x: -p.x,
            y: -p.y,
            t: p.t,
            z: p.z,
        };
        assert!(coset.is_on_curve());
        assert_eq!(coset, p);
        assert_eq!(coset.to_bytes(), p.to_bytes());
    }

    #[test]
    fn rejects_invalid_encodings() {
        // x = 2 fails the subgroup check; x = 4 has no valid y.
        let mut bytes = [0u8; 32];
        bytes[31] = 2;
        assert!(Element::from_bytes(&bytes).is_none());
        bytes[31] = 4;
        assert!(Element::from_bytes(&bytes).is_none());
        // Out-of-range field value.
        let too_big = [0xffu8; 32];
        assert!(Element::from_bytes(&too_big).is_none());
    }

    #[test]
    fn scalar_mul_matches_addition_chain() {
        let g = Element::generator();
        let mut acc = Element::identity();
        for k in 0u64..6 {
            assert_eq!(g.mul_scalar(&Fr::from(k)), acc);
            acc = acc + g;
        }
    }

    #[test]
    fn scalar_mul_distributes() {
        let mut rng = rng();
        let g = Element::generator();
        let a = random_scalar(&mut rng);
        let b = random_scalar(&mut rng);
        assert_eq!(g.mul_scalar(&(a + b)), g.mul_scalar(&a) + g.mul_scalar(&b));
        assert_eq!(
            g.mul_scalar(&(a * b)),
            g.mul_scalar(&a).mul_scalar(&b)
        );
    }

    #[test]
    fn mixed_addition_matches_full() {
        let mut rng = rng();
        for _ in 0..10 {
            let p = random_point(&mut rng);
            let q = random_point(&mut rng);
            assert_eq!(p.add_mixed(&q.to_affine()), p + q);
        }
    }
}
