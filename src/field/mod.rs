//! Generic prime-field arithmetic in Montgomery form.
//!
//! A field element is four 64-bit limbs (little-endian) holding
//! `value * R mod p` with `R = 2^256`. One implementation serves both the
//! Banderwagon base field and its scalar field; the modulus-specific constants
//! come in through the [`FieldParams`] trait and the two fields are distinct
//! Rust types, so they can never be mixed in an operation.
//!
//! Stored limbs are always fully reduced (`< p`). Every public constructor
//! normalizes into Montgomery form.

pub mod params;

use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use byteorder::{ByteOrder, LittleEndian};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

pub use self::params::{BaseFieldParams, FieldParams, ScalarFieldParams};

/// The Banderwagon base field (curve coordinates).
pub type Fp = FieldElement<BaseFieldParams>;

/// The Banderwagon scalar field (exponents, polynomial values).
pub type Fr = FieldElement<ScalarFieldParams>;

/// An element of the prime field selected by `P`, in Montgomery form.
#[derive(Clone, Copy)]
pub struct FieldElement<P: FieldParams>(pub(crate) [u64; 4], PhantomData<P>);

// ------------------------------------------------------------------------
// Limb helpers
// ------------------------------------------------------------------------

/// a + b + carry, returning the low 64 bits and the new carry.
#[inline(always)]
const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let t = (a as u128) + (b as u128) + (carry as u128);
    (t as u64, (t >> 64) as u64)
}

/// a - b - borrow, returning the low 64 bits and the new borrow (0 or 1).
#[inline(always)]
const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let t = (a as u128).wrapping_sub((b as u128) + (borrow as u128));
    (t as u64, ((t >> 64) as u64) & 1)
}

/// a + b * c + carry, returning the low 64 bits and the new carry.
#[inline(always)]
const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let t = (a as u128) + (b as u128) * (c as u128) + (carry as u128);
    (t as u64, (t >> 64) as u64)
}

fn cmp_limbs(a: &[u64; 4], b: &[u64; 4]) -> Ordering {
    for i in (0..4).rev() {
        if a[i] != b[i] {
            return a[i].cmp(&b[i]);
        }
    }
    Ordering::Equal
}

fn add_limbs(a: &[u64; 4], b: &[u64; 4]) -> ([u64; 4], u64) {
    let mut out = [0u64; 4];
    let mut carry = 0;
    for i in 0..4 {
        let (lo, c) = adc(a[i], b[i], carry);
        out[i] = lo;
        carry = c;
    }
    (out, carry)
}

fn sub_limbs(a: &[u64; 4], b: &[u64; 4]) -> ([u64; 4], u64) {
    let mut out = [0u64; 4];
    let mut borrow = 0;
    for i in 0..4 {
        let (lo, bw) = sbb(a[i], b[i], borrow);
        out[i] = lo;
        borrow = bw;
    }
    (out, borrow)
}

/// Logical right shift by one bit, with `hi` shifted in at the top.
fn shr1(a: &[u64; 4], hi: u64) -> [u64; 4] {
    let mut out = [0u64; 4];
    for i in 0..4 {
        let upper = if i < 3 { a[i + 1] } else { hi };
        out[i] = (a[i] >> 1) | (upper << 63);
    }
    out
}

fn limbs_is_zero(a: &[u64; 4]) -> bool {
    a[0] == 0 && a[1] == 0 && a[2] == 0 && a[3] == 0
}

fn limbs_is_one(a: &[u64; 4]) -> bool {
    a[0] == 1 && a[1] == 0 && a[2] == 0 && a[3] == 0
}

fn limbs_is_even(a: &[u64; 4]) -> bool {
    a[0] & 1 == 0
}

// ------------------------------------------------------------------------
// Core arithmetic
// ------------------------------------------------------------------------

impl<P: FieldParams> FieldElement<P> {
    /// The additive identity.
    pub fn zero() -> Self {
        FieldElement([0; 4], PhantomData)
    }

    /// The multiplicative identity.
    pub fn one() -> Self {
        FieldElement(P::R, PhantomData)
    }

    /// Builds an element from limbs that are already in Montgomery form.
    ///
    /// Used for the precomputed curve constants; the limbs must be `< p`.
    pub(crate) const fn from_montgomery_limbs(limbs: [u64; 4]) -> Self {
        FieldElement(limbs, PhantomData)
    }

    pub fn is_zero(&self) -> bool {
        limbs_is_zero(&self.0)
    }

    pub fn is_one(&self) -> bool {
        self.0 == P::R
    }

    /// Interleaved Montgomery multiplication (CIOS): accumulates `a_i * b`
    /// into a running value and folds in one reduction term per round,
    /// finishing with a single conditional subtraction of p.
    fn montgomery_mul(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
        let modulus = P::MODULUS;
        let mut t = [0u64; 6];
        for i in 0..4 {
            let mut carry = 0;
            for j in 0..4 {
                let (lo, c) = mac(t[j], a[j], b[i], carry);
                t[j] = lo;
                carry = c;
            }
            let (lo, c) = adc(t[4], carry, 0);
            t[4] = lo;
            t[5] = c;

            let m = t[0].wrapping_mul(P::INV);
            let (_, mut carry) = mac(t[0], m, modulus[0], 0);
            for j in 1..4 {
                let (lo, c) = mac(t[j], m, modulus[j], carry);
                t[j - 1] = lo;
                carry = c;
            }
            let (lo, c) = adc(t[4], carry, 0);
            t[3] = lo;
            t[4] = t[5] + c;
        }

        let mut out = [t[0], t[1], t[2], t[3]];
        if t[4] != 0 || cmp_limbs(&out, &modulus) != Ordering::Less {
            let (reduced, _) = sub_limbs(&out, &modulus);
            out = reduced;
        }
        out
    }

    pub fn square(&self) -> Self {
        FieldElement(Self::montgomery_mul(&self.0, &self.0), PhantomData)
    }

    pub fn double(&self) -> Self {
        *self + *self
    }

    /// Converts out of Montgomery form, returning the canonical limbs.
    pub fn from_montgomery(&self) -> [u64; 4] {
        Self::montgomery_mul(&self.0, &[1, 0, 0, 0])
    }

    /// Raises `self` to a plain (non-Montgomery) 256-bit exponent.
    pub fn pow(&self, exp: &[u64; 4]) -> Self {
        let mut res = Self::one();
        for i in (0..4).rev() {
            for bit in (0..64).rev() {
                res = res.square();
                if (exp[i] >> bit) & 1 == 1 {
                    res *= *self;
                }
            }
        }
        res
    }

    /// Multiplicative inverse via the Kaliski-style binary extended Euclid.
    ///
    /// Maintains `(u = p, v = self, r = 0, s = R^2)`; halves the even operand,
    /// adjusting its co-factor by adding p before the halving whenever the
    /// co-factor is odd, and subtracts the smaller operand from the larger,
    /// terminating when either reaches 1.
    ///
    /// `invert(0) == 0` by convention; callers that need to distinguish the
    /// zero case must check for zero first.
    pub fn invert(&self) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let modulus = P::MODULUS;
        let mut u = modulus;
        let mut v = self.0;
        let mut r = [0u64; 4];
        let mut s = P::R2;
        loop {
            while limbs_is_even(&v) {
                v = shr1(&v, 0);
                if limbs_is_even(&s) {
                    s = shr1(&s, 0);
                } else {
                    let (t, carry) = add_limbs(&s, &modulus);
                    s = shr1(&t, carry);
                }
            }
            while limbs_is_even(&u) {
                u = shr1(&u, 0);
                if limbs_is_even(&r) {
                    r = shr1(&r, 0);
                } else {
                    let (t, carry) = add_limbs(&r, &modulus);
                    r = shr1(&t, carry);
                }
            }
            if cmp_limbs(&v, &u) != Ordering::Less {
                let (diff, _) = sub_limbs(&v, &u);
                v = diff;
                let (t, borrow) = sub_limbs(&s, &r);
                s = if borrow != 0 { add_limbs(&t, &modulus).0 } else { t };
            } else {
                let (diff, _) = sub_limbs(&u, &v);
                u = diff;
                let (t, borrow) = sub_limbs(&r, &s);
                r = if borrow != 0 { add_limbs(&t, &modulus).0 } else { t };
            }
            if limbs_is_one(&u) {
                return FieldElement(r, PhantomData);
            }
            if limbs_is_one(&v) {
                return FieldElement(s, PhantomData);
            }
        }
    }

    /// In-place batch inversion (Montgomery's trick): one inversion plus
    /// `O(n)` multiplications. Zero entries are skipped and stay zero.
    pub fn batch_invert(values: &mut [Self]) {
        let mut scratch = Vec::with_capacity(values.len());
        let mut acc = Self::one();
        for v in values.iter() {
            scratch.push(acc);
            if !v.is_zero() {
                acc *= *v;
            }
        }
        acc = acc.invert();
        for (v, partial) in values.iter_mut().zip(scratch.into_iter()).rev() {
            if v.is_zero() {
                continue;
            }
            let skip_this = acc * *v;
            *v = acc * partial;
            acc = skip_this;
        }
    }

    /// Legendre symbol: 0 for zero, 1 for quadratic residues, -1 otherwise.
    pub fn legendre(&self) -> i32 {
        if self.is_zero() {
            return 0;
        }
        let symbol = self.pow(&P::MODULUS_MINUS_ONE_DIV_TWO);
        if symbol.is_one() {
            1
        } else {
            -1
        }
    }

    /// Tonelli-Shanks square root specialized to the field's fixed 2-adicity.
    ///
    /// Returns `None` when `self` is a non-residue.
    pub fn sqrt(&self) -> Option<Self> {
        if self.is_zero() {
            return Some(Self::zero());
        }
        if self.legendre() != 1 {
            return None;
        }
        let w = self.pow(&P::T_MINUS_ONE_DIV_TWO);
        let mut v = P::TWO_ADICITY;
        let mut x = *self * w;
        let mut b = x * w;
        let mut z = FieldElement::<P>(P::ROOT_OF_UNITY, PhantomData);

        while !b.is_one() {
            // Least k with b^(2^k) == 1; k < v because b is in the 2-Sylow
            // subgroup and self is a residue.
            let mut k = 0u32;
            let mut b2k = b;
            while !b2k.is_one() {
                b2k = b2k.square();
                k += 1;
            }
            let mut w = z;
            for _ in 0..(v - k - 1) {
                w = w.square();
            }
            z = w.square();
            b *= z;
            x *= w;
            v = k;
        }
        Some(x)
    }

    /// True when the canonical value is greater than (p - 1) / 2.
    ///
    /// Used to pick the canonical point representative on decoding.
    pub fn lexicographically_largest(&self) -> bool {
        let canonical = self.from_montgomery();
        cmp_limbs(&canonical, &P::MODULUS_MINUS_ONE_DIV_TWO) == Ordering::Greater
    }

    // --------------------------------------------------------------------
    // Byte codecs
    // --------------------------------------------------------------------

    /// Canonical little-endian encoding, 32 bytes.
    pub fn to_bytes_le(&self) -> [u8; 32] {
        let canonical = self.from_montgomery();
        let mut out = [0u8; 32];
        for i in 0..4 {
            LittleEndian::write_u64(&mut out[i * 8..(i + 1) * 8], canonical[i]);
        }
        out
    }

    /// Canonical big-endian encoding, 32 bytes.
    pub fn to_bytes_be(&self) -> [u8; 32] {
        let mut out = self.to_bytes_le();
        out.reverse();
        out
    }

    fn from_canonical_limbs(limbs: [u64; 4]) -> Option<Self> {
        if cmp_limbs(&limbs, &P::MODULUS) == Ordering::Less {
            Some(FieldElement(
                Self::montgomery_mul(&limbs, &P::R2),
                PhantomData,
            ))
        } else {
            None
        }
    }

    fn reduce_limbs(limbs: [u64; 4]) -> Self {
        // montgomery_mul(a, R^2) = a * R mod p for any a < 2^256, which is
        // exactly the Montgomery encoding of a mod p.
        FieldElement(Self::montgomery_mul(&limbs, &P::R2), PhantomData)
    }

    /// Decodes 32 little-endian bytes; `None` when the value is >= p.
    pub fn from_bytes_le(bytes: &[u8; 32]) -> Option<Self> {
        let mut limbs = [0u64; 4];
        for i in 0..4 {
            limbs[i] = LittleEndian::read_u64(&bytes[i * 8..(i + 1) * 8]);
        }
        Self::from_canonical_limbs(limbs)
    }

    /// Decodes 32 big-endian bytes; `None` when the value is >= p.
    pub fn from_bytes_be(bytes: &[u8; 32]) -> Option<Self> {
        let mut le = *bytes;
        le.reverse();
        Self::from_bytes_le(&le)
    }

    /// Decodes 32 little-endian bytes, reducing the value mod p.
    pub fn from_bytes_le_reduced(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for i in 0..4 {
            limbs[i] = LittleEndian::read_u64(&bytes[i * 8..(i + 1) * 8]);
        }
        Self::reduce_limbs(limbs)
    }

    /// Decodes 32 big-endian bytes, reducing the value mod p.
    pub fn from_bytes_be_reduced(bytes: &[u8; 32]) -> Self {
        let mut le = *bytes;
        le.reverse();
        Self::from_bytes_le_reduced(&le)
    }
}

impl<P: FieldParams> From<u64> for FieldElement<P> {
    fn from(v: u64) -> Self {
        Self::reduce_limbs([v, 0, 0, 0])
    }
}

// ------------------------------------------------------------------------
// Operators
// ------------------------------------------------------------------------

impl<P: FieldParams> Add for FieldElement<P> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let (sum, carry) = add_limbs(&self.0, &rhs.0);
        let mut out = sum;
        if carry != 0 || cmp_limbs(&out, &P::MODULUS) != Ordering::Less {
            out = sub_limbs(&out, &P::MODULUS).0;
        }
        FieldElement(out, PhantomData)
    }
}

impl<P: FieldParams> Sub for FieldElement<P> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let (diff, borrow) = sub_limbs(&self.0, &rhs.0);
        let out = if borrow != 0 {
            add_limbs(&diff, &P::MODULUS).0
        } else {
            diff
        };
        FieldElement(out, PhantomData)
    }
}

impl<P: FieldParams> Mul for FieldElement<P> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        FieldElement(Self::montgomery_mul(&self.0, &rhs.0), PhantomData)
    }
}

impl<P: FieldParams> Neg for FieldElement<P> {
    type Output = Self;

    fn neg(self) -> Self {
        if self.is_zero() {
            self
        } else {
            FieldElement(sub_limbs(&P::MODULUS, &self.0).0, PhantomData)
        }
    }
}

impl<P: FieldParams> AddAssign for FieldElement<P> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<P: FieldParams> SubAssign for FieldElement<P> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<P: FieldParams> MulAssign for FieldElement<P> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<P: FieldParams> ConstantTimeEq for FieldElement<P> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[0].ct_eq(&other.0[0])
            & self.0[1].ct_eq(&other.0[1])
            & self.0[2].ct_eq(&other.0[2])
            & self.0[3].ct_eq(&other.0[3])
    }
}

impl<P: FieldParams> ConditionallySelectable for FieldElement<P> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        FieldElement(
            [
                u64::conditional_select(&a.0[0], &b.0[0], choice),
                u64::conditional_select(&a.0[1], &b.0[1], choice),
                u64::conditional_select(&a.0[2], &b.0[2], choice),
                u64::conditional_select(&a.0[3], &b.0[3], choice),
            ],
            PhantomData,
        )
    }
}

impl<P: FieldParams> PartialEq for FieldElement<P> {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<P: FieldParams> Eq for FieldElement<P> {}

impl<P: FieldParams> Default for FieldElement<P> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<P: FieldParams> fmt::Debug for FieldElement<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let canonical = self.from_montgomery();
        write!(
            f,
            "0x{:016x}{:016x}{:016x}{:016x}",
            canonical[3], canonical[2], canonical[1], canonical[0]
        )
    }
}
