#![allow(non_snake_case)]
//! Polynomial commitments and opening proofs over the Banderwagon group.
//!
//! The crate implements the commitment scheme used by Verkle tries:
//! polynomials in Lagrange form over the domain `{0, ..., 255}` are committed
//! with a Pedersen vector commitment over Banderwagon, a prime-order quotient
//! of the Bandersnatch curve, and openings are proven with an inner product
//! argument. [`VerkleProof`] batches any number of openings across distinct
//! commitments into a single argument.
//!
//! Proofs are non-interactive via a SHA-256 Fiat-Shamir transcript; the
//! transcript labels and append order are a fixed wire format.

mod banderwagon;
mod errors;
mod field;
mod generators;
mod ipa;
mod lagrange;
mod multiproof;
mod transcript;
mod util;

pub use crate::banderwagon::msm::multi_scalar_mul;
pub use crate::banderwagon::{CompressedPoint, Element};
pub use crate::errors::ProofError;
pub use crate::field::{Fp, Fr};
pub use crate::generators::{Crs, CRS_SEED};
pub use crate::ipa::{InnerProductProof, IpaConfig};
pub use crate::lagrange::PrecomputedWeights;
pub use crate::multiproof::{ProverQuery, VerifierQuery, VerkleProof};
pub use crate::transcript::Transcript;
