//! Errors surfaced by proof verification and deserialization.
//!
//! A cryptographically invalid proof is an expected outcome and maps to
//! [`ProofError::VerificationError`]; callers must branch on it. Structural
//! misuse (mismatched vector lengths, non-power-of-two domains) indicates a
//! caller bug and panics instead.

use thiserror::Error;

/// Represents an error in proof creation, verification, or parsing.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum ProofError {
    /// This error occurs when a proof failed to verify.
    #[error("Proof verification failed.")]
    VerificationError,
    /// This error occurs when the proof encoding is malformed.
    #[error("Proof data could not be parsed.")]
    FormatError,
    /// This error occurs when the basis length does not match the proof's
    /// round count.
    #[error("Invalid generators size.")]
    InvalidGeneratorsLength,
}
