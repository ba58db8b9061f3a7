//! Fiat-Shamir transcript.
//!
//! An append-only byte buffer hashed with SHA-256 every time a challenge is
//! drawn. Labels and messages are concatenated with no framing; every call
//! site uses fixed, distinct, short ASCII labels, and both the label strings
//! and the append order are part of the wire format — changing either breaks
//! compatibility with existing proofs.
//!
//! A transcript is used linearly by exactly one proving or verifying call; it
//! has no internal synchronization.

use sha2::{Digest, Sha256};

use crate::banderwagon::Element;
use crate::field::Fr;

#[derive(Clone)]
pub struct Transcript {
    state: Vec<u8>,
}

impl Transcript {
    /// Creates a transcript seeded with a protocol label.
    pub fn new(label: &'static [u8]) -> Transcript {
        Transcript {
            state: label.to_vec(),
        }
    }

    /// Appends a sub-protocol separation label.
    pub fn domain_sep(&mut self, label: &'static [u8]) {
        self.state.extend_from_slice(label);
    }

    /// Appends a label followed by raw message bytes.
    pub fn append_message(&mut self, label: &'static [u8], message: &[u8]) {
        self.state.extend_from_slice(label);
        self.state.extend_from_slice(message);
    }

    /// Appends a scalar in its 32-byte little-endian encoding.
    pub fn append_scalar(&mut self, label: &'static [u8], scalar: &Fr) {
        self.append_message(label, &scalar.to_bytes_le());
    }

    /// Appends a group element in its compressed 32-byte encoding.
    pub fn append_point(&mut self, label: &'static [u8], point: &Element) {
        self.append_message(label, &point.to_bytes());
    }

    /// Draws a challenge: hashes the buffer (label included), reduces the
    /// digest modulo the scalar prime, then resets the buffer to the
    /// challenge encoding so the next challenge is bound to this one.
    pub fn challenge_scalar(&mut self, label: &'static [u8]) -> Fr {
        self.state.extend_from_slice(label);
        let mut hasher = Sha256::new();
        hasher.update(&self.state);
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        let challenge = Fr::from_bytes_le_reduced(&bytes);
        self.state.clear();
        self.state.extend_from_slice(&challenge.to_bytes_le());
        challenge
    }
}
