//! CREATE2 contract address computation.
//!
//!   address = keccak256(0xff || deployer || salt || keccak256(init_code))[12:32]

use super::{keccak256, Address};

/// Computes the init code hash: keccak256(init_code).
#[inline]
pub fn init_code_hash(init_code: &[u8]) -> [u8; 32] {
    keccak256(init_code)
}

/// Computes the CREATE2 contract address.
/// Preimage: 0xff (1) || deployer (20) || salt (32) || init_code_hash (32) = 85 bytes.
#[inline]
pub fn create2_address(deployer: &Address, salt: &[u8; 32], init_code_hash: &[u8; 32]) -> Address {
    let mut preimage = [0u8; 85];
    preimage[0] = 0xff;
    preimage[1..21].copy_from_slice(deployer.as_bytes());
    preimage[21..53].copy_from_slice(salt);
    preimage[53..85].copy_from_slice(init_code_hash);

    Address::from_digest(&keccak256(&preimage))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(hex_str: &str) -> Address {
        let bytes: [u8; 20] = hex::decode(hex_str).unwrap().try_into().unwrap();
        Address::from_bytes(bytes)
    }

    fn bytes32(hex_str: &str) -> [u8; 32] {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    // Examples from EIP-1014.
    #[test]
    fn test_eip1014_vectors() {
        let cases = [
            (
                "0000000000000000000000000000000000000000",
                "0000000000000000000000000000000000000000000000000000000000000000",
                "00",
                "4d1a2e2bb4f88f0250f26ffff098b0b30b26bf38",
            ),
            (
                "deadbeef00000000000000000000000000000000",
                "0000000000000000000000000000000000000000000000000000000000000000",
                "00",
                "b928f69bb1d91cd65274e3c79d8986362984fda3",
            ),
            (
                "deadbeef00000000000000000000000000000000",
                "000000000000000000000000feed000000000000000000000000000000000000",
                "00",
                "d04116cdd17bebe565eb2422f2497e06cc1c9833",
            ),
            (
                "00000000000000000000000000000000deadbeef",
                "00000000000000000000000000000000000000000000000000000000cafebabe",
                "deadbeef",
                "60f3f640a8508fc6a86d45df051962668e1e8ac7",
            ),
        ];

        for (deployer, salt, init_code, expected) in cases {
            let hash = init_code_hash(&hex::decode(init_code).unwrap());
            let derived = create2_address(&address(deployer), &bytes32(salt), &hash);
            assert_eq!(derived.to_hex(), expected);
        }
    }

    #[test]
    fn test_init_code_hash() {
        assert_eq!(
            hex::encode(init_code_hash(&hex::decode("deadbeef").unwrap())),
            "d4fd4e189132273036449fc9e11198c739161b4c0116a9a2dccdfa1c492006f1"
        );
    }

    #[test]
    fn test_create2_deterministic() {
        let deployer = address("cfea57885743b5c71da9b1baa94f21572a6abccb");
        let hash = [7u8; 32];
        let salt = [9u8; 32];
        assert_eq!(
            create2_address(&deployer, &salt, &hash),
            create2_address(&deployer, &salt, &hash)
        );
    }
}
