//! Cryptographic primitives for address derivation.
//!
//! This module provides:
//! - Keccak-256 hashing
//! - secp256k1 public-key-to-address derivation
//! - CREATE2 contract address derivation

mod address;
pub mod create2;
mod keypair;

pub use address::Address;
pub use create2::{create2_address, init_code_hash};
pub use keypair::Keypair;

use tiny_keccak::{Hasher, Keccak};

/// Keccak-256 of arbitrary bytes (output 32 bytes).
#[inline]
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(input);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}
