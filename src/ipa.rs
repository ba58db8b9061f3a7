#![allow(non_snake_case)]
//! The inner product argument.
//!
//! Proves that a committed Lagrange-form polynomial evaluates to a claimed
//! value at a given point: given `C = commit(a)`, an evaluation point `t` and
//! the barycentric vector `b = b(t)`, the proof shows `<a, b> = y` in
//! `log2(n)` halving rounds, each publishing one `L`/`R` pair. Verification
//! folds everything into a single multiscalar multiplication compared against
//! the identity.

use std::iter;

use serde::de::Visitor;
use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

use crate::banderwagon::msm::multi_scalar_mul;
use crate::banderwagon::{CompressedPoint, Element};
use crate::errors::ProofError;
use crate::field::Fr;
use crate::generators::Crs;
use crate::lagrange::PrecomputedWeights;
use crate::transcript::Transcript;
use crate::util::{inner_product, read32};

/// Everything both sides of the protocol agree on ahead of time: the
/// commitment basis and the precomputed domain weights.
#[derive(Clone)]
pub struct IpaConfig {
    pub(crate) crs: Crs,
    pub(crate) weights: PrecomputedWeights,
}

impl IpaConfig {
    /// Builds a config over a basis derived from `seed` for a domain of
    /// `domain_size` points.
    ///
    /// # Panics
    ///
    /// Panics unless `domain_size` is a power of two greater than one.
    pub fn new(domain_size: usize, seed: &[u8]) -> IpaConfig {
        assert!(
            domain_size.is_power_of_two() && domain_size > 1,
            "domain must be a power of two"
        );
        IpaConfig {
            crs: Crs::generate(domain_size, seed),
            weights: PrecomputedWeights::new(domain_size),
        }
    }

    /// The production config: the 256-point Verkle basis.
    pub fn verkle() -> IpaConfig {
        IpaConfig {
            crs: Crs::verkle(),
            weights: PrecomputedWeights::new(256),
        }
    }

    pub fn domain_size(&self) -> usize {
        self.crs.len()
    }

    /// Commits to a polynomial given by its evaluations over the domain.
    pub fn commit(&self, evaluations: &[Fr]) -> Element {
        self.crs.commit(evaluations)
    }

    /// Evaluates a Lagrange-form polynomial at an arbitrary point.
    pub fn evaluate(&self, evaluations: &[Fr], point: &Fr) -> Fr {
        let b = self.weights.barycentric_coefficients(point);
        inner_product(evaluations, &b)
    }
}

/// A proof that a committed polynomial evaluates to a claimed value.
#[derive(Clone, Debug)]
pub struct InnerProductProof {
    pub(crate) L_vec: Vec<CompressedPoint>,
    pub(crate) R_vec: Vec<CompressedPoint>,
    pub(crate) a: Fr,
}

impl InnerProductProof {
    /// Creates an evaluation proof for the polynomial `a_vec` (in Lagrange
    /// form) at `input_point`, against the commitment `commitment`.
    ///
    /// The claimed output `<a, b(input_point)>` is computed here and bound
    /// into the transcript; the verifier recomputes it independently.
    ///
    /// The `transcript` is passed in so the challenges bind any enclosing
    /// protocol.
    ///
    /// # Panics
    ///
    /// Panics when `a_vec` does not span the config's domain.
    pub fn create(
        transcript: &mut Transcript,
        config: &IpaConfig,
        commitment: Element,
        mut a_vec: Vec<Fr>,
        input_point: Fr,
    ) -> InnerProductProof {
        let mut n = config.domain_size();
        assert_eq!(a_vec.len(), n, "polynomial does not span the domain");

        let mut b_vec = config.weights.barycentric_coefficients(&input_point);
        let output_point = inner_product(&a_vec, &b_vec);

        transcript.domain_sep(b"ipa");
        transcript.append_point(b"C", &commitment);
        transcript.append_scalar(b"input point", &input_point);
        transcript.append_scalar(b"output point", &output_point);
        let w = transcript.challenge_scalar(b"w");
        let q = config.crs.Q.mul_scalar(&w);

        let mut G_vec = config.crs.G.clone();

        let mut a = &mut a_vec[..];
        let mut b = &mut b_vec[..];
        let mut G = &mut G_vec[..];

        let lg_n = n.trailing_zeros() as usize;
        let mut L_vec = Vec::with_capacity(lg_n);
        let mut R_vec = Vec::with_capacity(lg_n);

        while n != 1 {
            n = n / 2;
            let (a_L, a_R) = a.split_at_mut(n);
            let (b_L, b_R) = b.split_at_mut(n);
            let (G_L, G_R) = G.split_at_mut(n);

            let z_L = inner_product(a_R, b_L);
            let z_R = inner_product(a_L, b_R);

            let L = multi_scalar_mul(G_L, a_R) + q.mul_scalar(&z_L);
            let R = multi_scalar_mul(G_R, a_L) + q.mul_scalar(&z_R);

            L_vec.push(L.compress());
            R_vec.push(R.compress());

            transcript.append_point(b"L", &L);
            transcript.append_point(b"R", &R);

            let x = transcript.challenge_scalar(b"x");
            let x_inv = x.invert();

            for i in 0..n {
                a_L[i] = a_L[i] + x * a_R[i];
                b_L[i] = b_L[i] + x_inv * b_R[i];
                G_L[i] = G_L[i] + G_R[i].mul_scalar(&x_inv);
            }

            a = a_L;
            b = b_L;
            G = G_L;
        }

        InnerProductProof {
            L_vec,
            R_vec,
            a: a[0],
        }
    }

    /// Replays the transcript and returns `(w, challenges, challenges_inv,
    /// s)` where `s` is the fold of the basis: `G_final = <s, G>`.
    pub(crate) fn verification_scalars(
        &self,
        n: usize,
        transcript: &mut Transcript,
        commitment: &Element,
        input_point: &Fr,
        output_point: &Fr,
    ) -> Result<(Fr, Vec<Fr>, Vec<Fr>, Vec<Fr>), ProofError> {
        let lg_n = self.L_vec.len();
        if lg_n >= 32 {
            return Err(ProofError::VerificationError);
        }
        if n != (1 << lg_n) {
            return Err(ProofError::InvalidGeneratorsLength);
        }

        transcript.domain_sep(b"ipa");
        transcript.append_point(b"C", commitment);
        transcript.append_scalar(b"input point", input_point);
        transcript.append_scalar(b"output point", output_point);
        let w = transcript.challenge_scalar(b"w");

        let mut challenges = Vec::with_capacity(lg_n);
        for (L, R) in self.L_vec.iter().zip(self.R_vec.iter()) {
            transcript.append_message(b"L", L.as_bytes());
            transcript.append_message(b"R", R.as_bytes());
            challenges.push(transcript.challenge_scalar(b"x"));
        }

        let mut challenges_inv = challenges.clone();
        Fr::batch_invert(&mut challenges_inv);

        // s_i is the product of the inverse challenges selected by the bits
        // of i, i.e. the coefficient of G_i in the fully folded basis.
        let mut s = Vec::with_capacity(n);
        s.push(Fr::one());
        for i in 1..n {
            let lg_i = (32 - 1 - (i as u32).leading_zeros()) as usize;
            let k = 1 << lg_i;
            let x_lg_i_inv = challenges_inv[(lg_n - 1) - lg_i];
            s.push(s[i - k] * x_lg_i_inv);
        }

        Ok((w, challenges, challenges_inv, s))
    }

    /// Verifies the proof against a commitment and a claimed evaluation.
    ///
    /// The whole check collapses into one multiscalar multiplication
    /// compared against the identity.
    pub fn verify(
        &self,
        transcript: &mut Transcript,
        config: &IpaConfig,
        commitment: Element,
        input_point: Fr,
        output_point: Fr,
    ) -> Result<(), ProofError> {
        let n = config.domain_size();
        let (w, challenges, challenges_inv, s) =
            self.verification_scalars(n, transcript, &commitment, &input_point, &output_point)?;

        let b = config.weights.barycentric_coefficients(&input_point);
        let b_final = inner_product(&b, &s);

        let Ls = self
            .L_vec
            .iter()
            .map(|p| p.decompress().ok_or(ProofError::VerificationError))
            .collect::<Result<Vec<_>, _>>()?;
        let Rs = self
            .R_vec
            .iter()
            .map(|p| p.decompress().ok_or(ProofError::VerificationError))
            .collect::<Result<Vec<_>, _>>()?;

        // a*G_final + a*b_final*w*Q must equal C + w*y*Q + sum x_j L_j
        // + sum 1/x_j R_j; moving everything to one side gives a single
        // MSM that must hit the identity.
        let scalars: Vec<Fr> = s
            .iter()
            .map(|s_i| self.a * *s_i)
            .chain(iter::once(w * (self.a * b_final - output_point)))
            .chain(challenges.iter().map(|x| -*x))
            .chain(challenges_inv.iter().map(|x_inv| -*x_inv))
            .chain(iter::once(-Fr::one()))
            .collect();

        let points: Vec<Element> = config
            .crs
            .G
            .iter()
            .cloned()
            .chain(iter::once(config.crs.Q))
            .chain(Ls.into_iter())
            .chain(Rs.into_iter())
            .chain(iter::once(commitment))
            .collect();

        if multi_scalar_mul(&points, &scalars).is_identity() {
            Ok(())
        } else {
            Err(ProofError::VerificationError)
        }
    }

    /// Returns the size in bytes required to serialize the proof.
    pub fn serialized_size(&self) -> usize {
        (self.L_vec.len() * 2 + 1) * 32
    }

    /// Serializes the proof as \\(2k+1\\) 32-byte elements: the points
    /// \\(L_0, \dots, L_{k-1}\\), the points \\(R_0, \dots, R_{k-1}\\), then
    /// the scalar \\(a\\).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.serialized_size());
        for l in self.L_vec.iter() {
            buf.extend_from_slice(l.as_bytes());
        }
        for r in self.R_vec.iter() {
            buf.extend_from_slice(r.as_bytes());
        }
        buf.extend_from_slice(&self.a.to_bytes_le());
        buf
    }

    /// Deserializes a proof from its byte encoding. The round count is
    /// recovered from the length. Returns an error when:
    /// * the slice is not \\(2k+1\\) 32-byte elements,
    /// * \\(k\\) is 32 or larger,
    /// * the final scalar is not canonical.
    ///
    /// The points are kept compressed; subgroup checks happen on
    /// decompression during verification.
    pub fn from_bytes(slice: &[u8]) -> Result<InnerProductProof, ProofError> {
        let b = slice.len();
        if b % 32 != 0 {
            return Err(ProofError::FormatError);
        }
        let num_elements = b / 32;
        if num_elements < 3 || (num_elements - 1) % 2 != 0 {
            return Err(ProofError::FormatError);
        }
        let lg_n = (num_elements - 1) / 2;
        if lg_n >= 32 {
            return Err(ProofError::FormatError);
        }

        let mut L_vec = Vec::with_capacity(lg_n);
        let mut R_vec = Vec::with_capacity(lg_n);
        for i in 0..lg_n {
            L_vec.push(CompressedPoint(read32(&slice[i * 32..])));
        }
        for i in lg_n..2 * lg_n {
            R_vec.push(CompressedPoint(read32(&slice[i * 32..])));
        }

        let a = Fr::from_bytes_le(&read32(&slice[2 * lg_n * 32..])).ok_or(ProofError::FormatError)?;

        Ok(InnerProductProof { L_vec, R_vec, a })
    }
}

impl Serialize for InnerProductProof {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.to_bytes()[..])
    }
}

impl<'de> Deserialize<'de> for InnerProductProof {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct InnerProductProofVisitor;

        impl<'de> Visitor<'de> for InnerProductProofVisitor {
            type Value = InnerProductProof;

            fn expecting(&self, formatter: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
                formatter.write_str("a valid InnerProductProof")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<InnerProductProof, E>
            where
                E: serde::de::Error,
            {
                InnerProductProof::from_bytes(v).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_bytes(InnerProductProofVisitor)
    }
}
