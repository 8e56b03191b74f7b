//! Ethereum keypair derivation.

use secp256k1::{PublicKey, Secp256k1, SecretKey, Signing};

use super::{keccak256, Address};
use crate::error::CandidateError;

/// Represents an Ethereum keypair (private key + derived address).
#[derive(Debug, Clone)]
pub struct Keypair {
    /// The secp256k1 private key
    secret_key: SecretKey,
    /// The derived Ethereum address
    address: Address,
}

impl Keypair {
    /// Derives the keypair for an already validated secret key.
    #[inline]
    pub fn from_secret_key<C: Signing>(secp: &Secp256k1<C>, secret_key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(secp, &secret_key);

        Self {
            secret_key,
            address: public_key_address(&public_key),
        }
    }

    /// Derives the keypair for raw secret bytes.
    ///
    /// Fails with [`CandidateError::InvalidScalar`] when the bytes are zero or
    /// not below the secp256k1 group order.
    pub fn from_secret_bytes<C: Signing>(
        secp: &Secp256k1<C>,
        secret_bytes: [u8; 32],
    ) -> Result<Self, CandidateError> {
        let secret_key =
            SecretKey::from_slice(&secret_bytes).map_err(|_| CandidateError::InvalidScalar)?;
        Ok(Self::from_secret_key(secp, secret_key))
    }

    /// Returns the secret key.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Returns a reference to the derived address.
    #[inline]
    pub fn address(&self) -> &Address {
        &self.address
    }
}

/// Derives an Ethereum address from a secp256k1 public key.
///
/// Process:
/// 1. Serialize the public key in uncompressed form (65 bytes)
/// 2. Remove the first byte (0x04 prefix)
/// 3. Hash the remaining 64 bytes with Keccak-256
/// 4. Take the last 20 bytes of the hash
#[inline]
pub fn public_key_address(public_key: &PublicKey) -> Address {
    let public_key_bytes = public_key.serialize_uncompressed();
    Address::from_digest(&keccak256(&public_key_bytes[1..]))
}
