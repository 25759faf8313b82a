//! Streampay cryptography
//!
//! Recoverable secp256k1 ECDSA over Keccak-256 digests: key pairs with
//! derived 20-byte addresses, channel key derivation, and balance-proof
//! signing and signer recovery. Verification recovers the signer identity
//! from the signature alone; whether that identity is the *expected* one
//! is the ledger's check, not this crate's.

pub mod error;
pub mod hashing;
pub mod keys;
pub mod signing;

pub use error::CryptoError;
pub use hashing::{derive_channel_key, hash_balance_envelope, keccak256};
pub use keys::{public_key_address, KeyPair};
pub use signing::{recover_signer, sign_balance_proof, Signature, SIGNATURE_LENGTH};
