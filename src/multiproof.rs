#![allow(non_snake_case)]
//! Batched polynomial openings.
//!
//! Reduces any number of evaluation claims `f_i(z_i) = y_i`, each against its
//! own commitment `C_i`, to a single inner product argument. The opening
//! points are indices into the evaluation domain; the quotient polynomials
//! `(f_i - y_i) / (X - z_i)` are combined with powers of a challenge `r`,
//! committed as `D`, and the combination is opened at a random point `t`
//! drawn after `D` is fixed.

use serde::de::Visitor;
use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

use crate::banderwagon::msm::multi_scalar_mul;
use crate::banderwagon::{CompressedPoint, Element};
use crate::errors::ProofError;
use crate::field::Fr;
use crate::ipa::{InnerProductProof, IpaConfig};
use crate::transcript::Transcript;
use crate::util::{powers_of, read32};

/// One opening claim on the prover side: the full polynomial is needed to
/// form the quotient.
#[derive(Clone)]
pub struct ProverQuery {
    pub commitment: Element,
    /// Evaluations of the polynomial over the whole domain.
    pub poly: Vec<Fr>,
    /// Opening point, as an index into the domain.
    pub point: usize,
    /// Claimed value `poly[point]`.
    pub result: Fr,
}

/// One opening claim on the verifier side.
#[derive(Clone, Copy)]
pub struct VerifierQuery {
    pub commitment: Element,
    pub point: usize,
    pub result: Fr,
}

impl From<&ProverQuery> for VerifierQuery {
    fn from(q: &ProverQuery) -> VerifierQuery {
        VerifierQuery {
            commitment: q.commitment,
            point: q.point,
            result: q.result,
        }
    }
}

/// A batched opening proof: the commitment `D` to the aggregated quotient
/// plus the inner product argument for the combined opening at `t`.
#[derive(Clone, Debug)]
pub struct VerkleProof {
    pub(crate) ipa: InnerProductProof,
    pub(crate) D: CompressedPoint,
}

impl VerkleProof {
    /// Proves all `queries` at once.
    ///
    /// # Panics
    ///
    /// Panics when `queries` is empty, a polynomial does not span the
    /// domain, or an opening index lies outside it.
    pub fn create(
        transcript: &mut Transcript,
        config: &IpaConfig,
        queries: &[ProverQuery],
    ) -> VerkleProof {
        assert!(!queries.is_empty(), "cannot prove an empty batch");
        let n = config.domain_size();

        transcript.domain_sep(b"multiproof");
        for query in queries {
            assert!(query.point < n, "opening point outside the domain");
            transcript.append_point(b"C", &query.commitment);
            transcript.append_scalar(b"z", &Fr::from(query.point as u64));
            transcript.append_scalar(b"y", &query.result);
        }
        let r = transcript.challenge_scalar(b"r");
        let powers = powers_of(r, queries.len());

        // g = sum_i r^i * (f_i - y_i) / (X - z_i), in evaluation form.
        let mut g = vec![Fr::zero(); n];
        for (query, r_pow) in queries.iter().zip(powers.iter()) {
            let quotient = config.weights.quotient_inside_domain(&query.poly, query.point);
            for (g_j, q_j) in g.iter_mut().zip(quotient.iter()) {
                *g_j += *r_pow * *q_j;
            }
        }
        let D = config.commit(&g);
        transcript.append_point(b"D", &D);
        let t = transcript.challenge_scalar(b"t");

        // h = sum_i r^i / (t - z_i) * f_i; one batch inversion covers every
        // denominator.
        let mut denom_inv: Vec<Fr> = queries
            .iter()
            .map(|q| t - config.weights.domain_point(q.point))
            .collect();
        Fr::batch_invert(&mut denom_inv);

        let mut h = vec![Fr::zero(); n];
        for (query, (r_pow, d_inv)) in queries.iter().zip(powers.iter().zip(denom_inv.iter())) {
            let coeff = *r_pow * *d_inv;
            for (h_j, f_j) in h.iter_mut().zip(query.poly.iter()) {
                *h_j += coeff * *f_j;
            }
        }
        let E = config.commit(&h);
        transcript.append_point(b"E", &E);

        let h_minus_g: Vec<Fr> = h.iter().zip(g.iter()).map(|(h_j, g_j)| *h_j - *g_j).collect();
        let ipa = InnerProductProof::create(transcript, config, E - D, h_minus_g, t);

        VerkleProof {
            ipa,
            D: D.compress(),
        }
    }

    /// Verifies the batch. `E` is rebuilt from the claimed commitments with
    /// one multiscalar multiplication and the rest is delegated to the inner
    /// product argument on `E - D`.
    pub fn verify(
        &self,
        transcript: &mut Transcript,
        config: &IpaConfig,
        queries: &[VerifierQuery],
    ) -> Result<(), ProofError> {
        if queries.is_empty() {
            return Err(ProofError::VerificationError);
        }
        let n = config.domain_size();

        transcript.domain_sep(b"multiproof");
        for query in queries {
            if query.point >= n {
                return Err(ProofError::VerificationError);
            }
            transcript.append_point(b"C", &query.commitment);
            transcript.append_scalar(b"z", &Fr::from(query.point as u64));
            transcript.append_scalar(b"y", &query.result);
        }
        let r = transcript.challenge_scalar(b"r");
        let powers = powers_of(r, queries.len());

        let D = self.D.decompress().ok_or(ProofError::VerificationError)?;
        transcript.append_point(b"D", &D);
        let t = transcript.challenge_scalar(b"t");

        let mut denom_inv: Vec<Fr> = queries
            .iter()
            .map(|q| t - config.weights.domain_point(q.point))
            .collect();
        Fr::batch_invert(&mut denom_inv);

        // E = sum_i r^i / (t - z_i) * C_i, and the claimed evaluation of
        // h - g at t is g_2(t) = sum_i r^i * y_i / (t - z_i).
        let mut e_coeffs = Vec::with_capacity(queries.len());
        let mut g2_t = Fr::zero();
        for (query, (r_pow, d_inv)) in queries.iter().zip(powers.iter().zip(denom_inv.iter())) {
            let coeff = *r_pow * *d_inv;
            e_coeffs.push(coeff);
            g2_t += query.result * coeff;
        }
        let commitments: Vec<Element> = queries.iter().map(|q| q.commitment).collect();
        let E = multi_scalar_mul(&commitments, &e_coeffs);
        transcript.append_point(b"E", &E);

        self.ipa.verify(transcript, config, E - D, t, g2_t)
    }

    /// Returns the size in bytes required to serialize the proof.
    pub fn serialized_size(&self) -> usize {
        self.ipa.serialized_size() + 32
    }

    /// Serializes the proof as \\(2k+2\\) 32-byte elements: the inner
    /// product proof's \\(L\\) points, its \\(R\\) points, the commitment
    /// \\(D\\), then the scalar \\(a\\).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.serialized_size());
        for l in self.ipa.L_vec.iter() {
            buf.extend_from_slice(l.as_bytes());
        }
        for r in self.ipa.R_vec.iter() {
            buf.extend_from_slice(r.as_bytes());
        }
        buf.extend_from_slice(self.D.as_bytes());
        buf.extend_from_slice(&self.ipa.a.to_bytes_le());
        buf
    }

    /// Deserializes a proof from its byte encoding; the round count is
    /// recovered from the length.
    pub fn from_bytes(slice: &[u8]) -> Result<VerkleProof, ProofError> {
        let b = slice.len();
        if b % 32 != 0 {
            return Err(ProofError::FormatError);
        }
        let num_elements = b / 32;
        if num_elements < 4 || num_elements % 2 != 0 {
            return Err(ProofError::FormatError);
        }
        let lg_n = (num_elements - 2) / 2;
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
        let D = CompressedPoint(read32(&slice[2 * lg_n * 32..]));
        let a = Fr::from_bytes_le(&read32(&slice[(2 * lg_n + 1) * 32..]))
            .ok_or(ProofError::FormatError)?;

        Ok(VerkleProof {
            ipa: InnerProductProof { L_vec, R_vec, a },
            D,
        })
    }
}

impl Serialize for VerkleProof {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.to_bytes()[..])
    }
}

impl<'de> Deserialize<'de> for VerkleProof {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct VerkleProofVisitor;

        impl<'de> Visitor<'de> for VerkleProofVisitor {
            type Value = VerkleProof;

            fn expecting(&self, formatter: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
                formatter.write_str("a valid VerkleProof")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<VerkleProof, E>
            where
                E: serde::de::Error,
            {
                VerkleProof::from_bytes(v).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_bytes(VerkleProofVisitor)
    }
}
