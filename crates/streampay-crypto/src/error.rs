/// Cryptographic operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("malformed signature: expected 65 bytes, got {actual}")]
    InvalidSignatureLength { actual: usize },

    #[error("malformed signature: invalid recovery id {0}")]
    InvalidRecoveryId(u8),

    #[error("signature recovery failed: {0}")]
    RecoveryFailed(#[from] secp256k1::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
