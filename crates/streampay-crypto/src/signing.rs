use std::fmt;

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, SECP256K1};
use streampay_core::types::{Address, TokenAmount};

use crate::error::CryptoError;
use crate::hashing::hash_balance_envelope;
use crate::keys::{public_key_address, KeyPair};

/// Encoded signature length: 32-byte r, 32-byte s, 1-byte recovery id.
pub const SIGNATURE_LENGTH: usize = 65;

/// A recoverable ECDSA signature in `r ‖ s ‖ v` wire encoding.
///
/// The recovery id `v` is accepted both raw (0–3) and with the
/// conventional 27 offset; signatures produced here use the offset form.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    bytes: [u8; SIGNATURE_LENGTH],
}

impl Signature {
    /// Create from raw bytes. Any length other than 65 is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(CryptoError::InvalidSignatureLength {
                actual: bytes.len(),
            });
        }
        let mut buf = [0u8; SIGNATURE_LENGTH];
        buf.copy_from_slice(bytes);
        Ok(Self { bytes: buf })
    }

    /// Decode from a hex string (with or without a `0x` prefix).
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let stripped = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes = hex::decode(stripped)
            .map_err(|e| CryptoError::InvalidInput(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// The raw 65 bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.bytes
    }

    /// Encode as hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// The recovery id byte as transmitted.
    pub fn v(&self) -> u8 {
        self.bytes[SIGNATURE_LENGTH - 1]
    }

    fn recoverable(&self) -> Result<RecoverableSignature, CryptoError> {
        let v = self.v();
        let normalized = match v {
            0..=3 => v,
            27..=30 => v - 27,
            _ => return Err(CryptoError::InvalidRecoveryId(v)),
        };
        let recovery_id = RecoveryId::from_i32(normalized as i32)
            .map_err(|_| CryptoError::InvalidRecoveryId(v))?;
        Ok(RecoverableSignature::from_compact(
            &self.bytes[..SIGNATURE_LENGTH - 1],
            recovery_id,
        )?)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature(0x{})", self.to_hex())
    }
}

/// Sign a balance proof: the canonical message for
/// `(receiver, open_sequence, balance)`, enveloped and hashed.
pub fn sign_balance_proof(
    receiver: Address,
    open_sequence: u32,
    balance: TokenAmount,
    keypair: &KeyPair,
) -> Signature {
    let digest = hash_balance_envelope(receiver, open_sequence, balance);
    let message = Message::from_digest(digest.0);
    let signature = SECP256K1.sign_ecdsa_recoverable(&message, keypair.secret_key());

    let (recovery_id, compact) = signature.serialize_compact();
    let mut bytes = [0u8; SIGNATURE_LENGTH];
    bytes[..SIGNATURE_LENGTH - 1].copy_from_slice(&compact);
    bytes[SIGNATURE_LENGTH - 1] = recovery_id.to_i32() as u8 + 27;
    Signature { bytes }
}

/// Recover the signer address of a balance proof.
///
/// Rebuilds the signing envelope for `(receiver, open_sequence, balance)`,
/// hashes it, and recovers the public key from the signature. The caller
/// is responsible for checking the returned address against the expected
/// party; recovery succeeding says nothing about *who* signed.
pub fn recover_signer(
    receiver: Address,
    open_sequence: u32,
    balance: TokenAmount,
    signature: &Signature,
) -> Result<Address, CryptoError> {
    let digest = hash_balance_envelope(receiver, open_sequence, balance);
    let message = Message::from_digest(digest.0);
    let public_key = SECP256K1.recover_ecdsa(&message, &signature.recoverable()?)?;
    Ok(public_key_address(&public_key))
}
