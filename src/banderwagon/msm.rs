//! Multi-scalar multiplication via a parallel Pippenger bucket method.
//!
//! Points are first normalized to affine with one batched field inversion of
//! their Z-coordinates, so the bucket accumulation can use mixed addition.
//! The scalar bit-range is partitioned into windows; every window owns its
//! bucket array and is computed independently on the rayon pool, then the
//! window sums are combined most-significant-first by repeated doubling.

use rayon::prelude::*;

use crate::banderwagon::{AffinePoint, Element};
use crate::field::{FieldParams, Fp, Fr, ScalarFieldParams};

/// Below this size the bucket machinery costs more than it saves.
const NAIVE_THRESHOLD: usize = 4;

/// `sum scalars[i] * points[i]`.
///
/// Must agree with the naive sum of `mul_scalar` results for every input;
/// that is the correctness contract the tests pin down.
///
/// # Panics
///
/// Panics when the slice lengths differ.
pub fn multi_scalar_mul(points: &[Element], scalars: &[Fr]) -> Element {
    assert_eq!(
        points.len(),
        scalars.len(),
        "multi_scalar_mul: points and scalars length mismatch"
    );
    let n = points.len();
    if n == 0 {
        return Element::identity();
    }
    if n < NAIVE_THRESHOLD {
        return points
            .iter()
            .zip(scalars.iter())
            .fold(Element::identity(), |acc, (p, s)| acc + p.mul_scalar(s));
    }

    let affine = batch_normalize(points);
    let digits: Vec<[u64; 4]> = scalars.iter().map(|s| s.from_montgomery()).collect();

    let c = window_size(n);
    let scalar_bits = <ScalarFieldParams as FieldParams>::NUM_BITS as usize;
    let num_windows = (scalar_bits + c - 1) / c;

    // Each window owns its bucket array; nothing is shared across windows.
    let window_sums: Vec<Element> = (0..num_windows)
        .into_par_iter()
        .map(|w| window_sum(&affine, &digits, w, c))
        .collect();

    let mut result = Element::identity();
    for sum in window_sums.iter().rev() {
        for _ in 0..c {
            result = result.double();
        }
        result = result + *sum;
    }
    result
}

/// Accumulates one window's contribution: points are dropped into one of
/// `2^c - 1` buckets keyed by the window's scalar digit, then the buckets are
/// combined with a running suffix sum so bucket `k` contributes `k` times.
fn window_sum(points: &[AffinePoint], digits: &[[u64; 4]], w: usize, c: usize) -> Element {
    let mut buckets = vec![Element::identity(); (1 << c) - 1];
    let mut direct = Element::identity();

    for (limbs, point) in digits.iter().zip(points.iter()) {
        // A whole scalar of 1 skips the bucket machinery.
        if is_one(limbs) {
            if w == 0 {
                direct = direct.add_mixed(point);
            }
            continue;
        }
        let digit = window_digit(limbs, w, c);
        if digit == 0 {
            continue;
        }
        buckets[digit - 1] = buckets[digit - 1].add_mixed(point);
    }

    let mut running = Element::identity();
    let mut sum = direct;
    for bucket in buckets.iter().rev() {
        running = running + *bucket;
        sum = sum + running;
    }
    sum
}

/// Extracts the `c`-bit digit of the scalar at window `w`, reading the
/// non-Montgomery limbs one 64-bit word at a time.
fn window_digit(limbs: &[u64; 4], w: usize, c: usize) -> usize {
    let bit = w * c;
    let limb = bit / 64;
    if limb >= 4 {
        return 0;
    }
    let shift = bit % 64;
    let mut digit = limbs[limb] >> shift;
    if shift + c > 64 && limb + 1 < 4 {
        digit |= limbs[limb + 1] << (64 - shift);
    }
    (digit as usize) & ((1 << c) - 1)
}

fn is_one(limbs: &[u64; 4]) -> bool {
    limbs[0] == 1 && limbs[1] == 0 && limbs[2] == 0 && limbs[3] == 0
}

/// Window width as a function of log2(n): a small fixed width for small
/// inputs, growing logarithmically after that.
fn window_size(n: usize) -> usize {
    match n {
        0..=31 => 3,
        32..=127 => 4,
        128..=511 => 5,
        512..=2047 => 6,
        2048..=8191 => 7,
        _ => 8,
    }
}

/// Normalizes projective representatives to affine with a single batched
/// inversion of all Z-coordinates.
fn batch_normalize(points: &[Element]) -> Vec<AffinePoint> {
    let mut zs: Vec<Fp> = points.iter().map(|p| p.z).collect();
    Fp::batch_invert(&mut zs);
    points
        .iter()
        .zip(zs.iter())
        .map(|(p, zinv)| {
            let x = p.x * *zinv;
            let y = p.y * *zinv;
            AffinePoint { x, y, t: x * y }
        })
        .collect()
}
