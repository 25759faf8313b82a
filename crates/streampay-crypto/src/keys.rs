use rand::rngs::OsRng;
use secp256k1::{PublicKey, SecretKey, SECP256K1};
use streampay_core::types::Address;
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::hashing::keccak256;

/// secp256k1 key pair for balance-proof signing.
///
/// The party identity is the address derived from the public key, not the
/// key itself.
pub struct KeyPair {
    secret_key: SecretKey,
    address: Address,
}

impl KeyPair {
    /// Generate a new random key pair using OS-provided entropy.
    pub fn generate() -> Self {
        let secret_key = SecretKey::new(&mut OsRng);
        Self::from_secret_key(secret_key)
    }

    /// Create a key pair from a 32-byte seed used directly as the secret
    /// scalar. Fails if the seed is not a valid secp256k1 secret key
    /// (zero or not below the curve order).
    pub fn from_seed(seed: &[u8; 32]) -> Result<Self, CryptoError> {
        let secret_key = SecretKey::from_slice(seed)
            .map_err(|e| CryptoError::InvalidInput(format!("invalid secret key seed: {}", e)))?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Create a key pair from raw bytes (32 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 32 {
            return Err(CryptoError::InvalidInput(format!(
                "secret key must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut seed = [0u8; 32];
        seed.copy_from_slice(bytes);
        let result = Self::from_seed(&seed);
        seed.zeroize();
        result
    }

    fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = secret_key.public_key(SECP256K1);
        let address = public_key_address(&public_key);
        Self {
            secret_key,
            address,
        }
    }

    /// The 20-byte address identifying this party.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The public key.
    pub fn public_key(&self) -> PublicKey {
        self.secret_key.public_key(SECP256K1)
    }

    /// Access the underlying secret key for signing operations.
    pub(crate) fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }
}

/// Derive the 20-byte address for a public key: the last 20 bytes of the
/// Keccak-256 of the uncompressed key, tag byte excluded.
pub fn public_key_address(public_key: &PublicKey) -> Address {
    let uncompressed = public_key.serialize_uncompressed();
    let digest = keccak256(&uncompressed[1..]);
    Address::from_slice(&digest[12..])
}
