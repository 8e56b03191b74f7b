//! Search spaces: what a worker draws and how it becomes an address.

use rand::RngCore;
use secp256k1::{Secp256k1, SecretKey, SignOnly};

use crate::crypto::{create2_address, Address, Keypair};
use crate::error::CandidateError;

/// A family of random candidates and the digest mapping them to addresses.
///
/// Implementations hold only immutable public parameters; each worker gets
/// its own clone and its own random source.
pub trait SearchSpace: Clone + Send + 'static {
    /// One random attempt.
    type Candidate;

    /// Label for the secret part of a match ("Private key", "Salt").
    const SECRET_LABEL: &'static str;

    /// Draws a fresh candidate from `rng`.
    fn generate<R: RngCore + ?Sized>(&self, rng: &mut R) -> Result<Self::Candidate, CandidateError>;

    /// Derives the address for a candidate. Must be pure.
    fn derive(&self, candidate: &Self::Candidate) -> Address;

    /// The 32 secret bytes reported for a matching candidate.
    fn secret_bytes(candidate: &Self::Candidate) -> [u8; 32];

    /// One-line description for the startup banner.
    fn describe(&self) -> String;
}

/// Random secp256k1 private keys mapped to their Ethereum address.
#[derive(Clone)]
pub struct KeypairSpace {
    secp: Secp256k1<SignOnly>,
}

impl KeypairSpace {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::signing_only(),
        }
    }
}

impl Default for KeypairSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSpace for KeypairSpace {
    type Candidate = SecretKey;

    const SECRET_LABEL: &'static str = "Private key";

    #[inline]
    fn generate<R: RngCore + ?Sized>(&self, rng: &mut R) -> Result<SecretKey, CandidateError> {
        let mut bytes = [0u8; 32];
        rng.try_fill_bytes(&mut bytes)?;
        SecretKey::from_slice(&bytes).map_err(|_| CandidateError::InvalidScalar)
    }

    #[inline]
    fn derive(&self, candidate: &SecretKey) -> Address {
        *Keypair::from_secret_key(&self.secp, *candidate).address()
    }

    fn secret_bytes(candidate: &SecretKey) -> [u8; 32] {
        candidate.secret_bytes()
    }

    fn describe(&self) -> String {
        "address (secp256k1 private keys)".into()
    }
}

/// Random salts mapped to the CREATE2 address of a fixed deployer and init code.
#[derive(Debug, Clone)]
pub struct Create2Space {
    deployer: Address,
    init_code_hash: [u8; 32],
}

impl Create2Space {
    pub fn new(deployer: Address, init_code_hash: [u8; 32]) -> Self {
        Self {
            deployer,
            init_code_hash,
        }
    }

    pub fn deployer(&self) -> &Address {
        &self.deployer
    }

    pub fn init_code_hash(&self) -> &[u8; 32] {
        &self.init_code_hash
    }
}

impl SearchSpace for Create2Space {
    type Candidate = [u8; 32];

    const SECRET_LABEL: &'static str = "Salt";

    #[inline]
    fn generate<R: RngCore + ?Sized>(&self, rng: &mut R) -> Result<[u8; 32], CandidateError> {
        let mut salt = [0u8; 32];
        rng.try_fill_bytes(&mut salt)?;
        Ok(salt)
    }

    #[inline]
    fn derive(&self, salt: &[u8; 32]) -> Address {
        create2_address(&self.deployer, salt, &self.init_code_hash)
    }

    fn secret_bytes(salt: &[u8; 32]) -> [u8; 32] {
        *salt
    }

    fn describe(&self) -> String {
        format!(
            "create2 (deployer {}, init code hash 0x{})",
            self.deployer,
            hex::encode(self.init_code_hash)
        )
    }
}
