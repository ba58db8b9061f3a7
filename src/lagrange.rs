//! Barycentric helpers for the evaluation domain `{0, ..., n-1}`.
//!
//! Polynomials live in Lagrange form: a vector of evaluations over the
//! domain. Everything the prover and verifier need about the domain — the
//! points themselves, the derivative `A'(x_i) = prod_{j != i} (x_i - x_j)` of
//! the vanishing polynomial, and the inverses of the small step differences —
//! is computed once and reused.

use crate::field::Fr;

#[derive(Clone)]
pub struct PrecomputedWeights {
    /// Domain points 0..n mapped into the scalar field.
    domain: Vec<Fr>,
    /// A'(x_i) per domain point.
    aprime: Vec<Fr>,
    /// 1 / A'(x_i) per domain point.
    aprime_inv: Vec<Fr>,
    /// 1/k for k in 1..n; index 0 is unused and holds zero.
    step_inv: Vec<Fr>,
}

impl PrecomputedWeights {
    /// Precomputes the weights for a domain of size `n`.
    ///
    /// # Panics
    ///
    /// Panics unless `n` is a power of two greater than one.
    pub fn new(n: usize) -> PrecomputedWeights {
        assert!(n.is_power_of_two() && n > 1, "domain must be a power of two");
        let domain: Vec<Fr> = (0..n).map(|i| Fr::from(i as u64)).collect();

        let mut aprime = vec![Fr::one(); n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    aprime[i] *= domain[i] - domain[j];
                }
            }
        }
        let mut aprime_inv = aprime.clone();
        Fr::batch_invert(&mut aprime_inv);

        let mut step_inv: Vec<Fr> = (0..n).map(|k| Fr::from(k as u64)).collect();
        Fr::batch_invert(&mut step_inv);

        PrecomputedWeights {
            domain,
            aprime,
            aprime_inv,
            step_inv,
        }
    }

    pub fn domain_size(&self) -> usize {
        self.domain.len()
    }

    /// The domain point at `index`.
    pub fn domain_point(&self, index: usize) -> Fr {
        self.domain[index]
    }

    /// Returns `Some(i)` when `point` equals the domain point `i`.
    fn domain_index(&self, point: &Fr) -> Option<usize> {
        let limbs = point.from_montgomery();
        if limbs[1] == 0 && limbs[2] == 0 && limbs[3] == 0 && (limbs[0] as usize) < self.domain.len()
        {
            Some(limbs[0] as usize)
        } else {
            None
        }
    }

    /// The evaluation vector `b(t)`: the coefficients such that
    /// `f(t) = <f, b(t)>` for any `f` in Lagrange form.
    ///
    /// Inside the domain this is a unit vector; outside it is the barycentric
    /// form `b_i = A(t) / (A'(x_i) * (t - x_i))`.
    pub fn barycentric_coefficients(&self, t: &Fr) -> Vec<Fr> {
        let n = self.domain.len();
        if let Some(index) = self.domain_index(t) {
            let mut b = vec![Fr::zero(); n];
            b[index] = Fr::one();
            return b;
        }

        let mut terms: Vec<Fr> = self.domain.iter().map(|x| *t - *x).collect();
        let mut a_t = Fr::one();
        for term in terms.iter() {
            a_t *= *term;
        }
        Fr::batch_invert(&mut terms);
        terms
            .iter()
            .zip(self.aprime_inv.iter())
            .map(|(inv_term, aprime_inv)| a_t * *aprime_inv * *inv_term)
            .collect()
    }

    /// Evaluation vector of `q(X) = (f(X) - f(z)) / (X - z)` over the whole
    /// domain, for a domain index `z`.
    ///
    /// Off `z` this is a direct division by the precomputed step inverses; at
    /// `z` itself the removable singularity is resolved with the discrete
    /// derivative formula `q_z = sum_{i != z} -q_i * A'(z) / A'(i)`.
    pub fn quotient_inside_domain(&self, f: &[Fr], z: usize) -> Vec<Fr> {
        let n = self.domain.len();
        assert_eq!(f.len(), n, "evaluation vector does not span the domain");
        assert!(z < n, "evaluation index outside the domain");

        let mut q = vec![Fr::zero(); n];
        for i in 0..n {
            if i == z {
                continue;
            }
            let diff = f[i] - f[z];
            let inv_step = if i > z {
                self.step_inv[i - z]
            } else {
                -self.step_inv[z - i]
            };
            q[i] = diff * inv_step;
            let correction = q[i] * self.aprime[z] * self.aprime_inv[i];
            q[z] -= correction;
        }
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::inner_product;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaChaRng;

    fn random_scalar(rng: &mut ChaChaRng) -> Fr {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Fr::from_bytes_le_reduced(&bytes)
    }

    /// f(X) = X^3 + 2X + 7 evaluated naively.
    fn poly_eval(x: Fr) -> Fr {
        x * x * x + Fr::from(2u64) * x + Fr::from(7u64)
    }

    fn poly_on_domain(weights: &PrecomputedWeights) -> Vec<Fr> {
        (0..weights.domain_size())
            .map(|i| poly_eval(weights.domain_point(i)))
            .collect()
    }

    #[test]
    fn barycentric_matches_direct_evaluation() {
        let mut rng = ChaChaRng::seed_from_u64(7);
        let weights = PrecomputedWeights::new(8);
        let f = poly_on_domain(&weights);
        for _ in 0..10 {
            let t = random_scalar(&mut rng);
            let b = weights.barycentric_coefficients(&t);
            assert_eq!(inner_product(&f, &b), poly_eval(t));
        }
    }

    #[test]
    fn barycentric_inside_domain_is_unit_vector() {
        let weights = PrecomputedWeights::new(8);
        let b = weights.barycentric_coefficients(&Fr::from(3u64));
        for (i, coeff) in b.iter().enumerate() {
            assert_eq!(*coeff, if i == 3 { Fr::one() } else { Fr::zero() });
        }
    }

    #[test]
    fn quotient_is_consistent_with_barycentric() {
        // q(X) = (f(X) - f(z)) / (X - z) must satisfy q(t)*(t - z) =
        // f(t) - f(z) at any point t outside the domain.
        let mut rng = ChaChaRng::seed_from_u64(8);
        let weights = PrecomputedWeights::new(8);
        let f = poly_on_domain(&weights);
        for z in 0..8 {
            let q = weights.quotient_inside_domain(&f, z);
            let t = random_scalar(&mut rng);
            let b = weights.barycentric_coefficients(&t);
            let q_t = inner_product(&q, &b);
            let f_t = inner_product(&f, &b);
            let f_z = f[z];
            assert_eq!(q_t * (t - weights.domain_point(z)), f_t - f_z);
        }
    }

    #[test]
    fn quotient_of_constant_is_zero() {
        let weights = PrecomputedWeights::new(4);
        let f = vec![Fr::from(9u64); 4];
        let q = weights.quotient_inside_domain(&f, 2);
        assert!(q.iter().all(|c| c.is_zero()));
    }
}
