use streampay_core::types::{BlockNumber, ChannelKey, TokenAmount};
use streampay_crypto::CryptoError;

use crate::traits::GatewayError;

/// Channel ledger errors. Every operation either fully applies or fails
/// with one of these; partial state mutation is never observable.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("channel already exists: {0}")]
    AlreadyExists(ChannelKey),

    #[error("channel not found: {0}")]
    NotFound(ChannelKey),

    #[error("no closing request for channel {0}")]
    NoClosingRequest(ChannelKey),

    #[error("channel {0} already has a pending closing request")]
    AlreadyClosing(ChannelKey),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("deposit overflow: {deposit} + {added} exceeds the 192-bit token range")]
    ArithmeticOverflow {
        deposit: TokenAmount,
        added: TokenAmount,
    },

    #[error("malformed signature: {0}")]
    MalformedSignature(#[from] CryptoError),

    #[error("transfer rejected by the asset gateway: {0}")]
    TransferRejected(#[from] GatewayError),

    #[error("challenge period not elapsed: settles after block {settle_at}, current block {now}")]
    ChallengeNotElapsed {
        settle_at: BlockNumber,
        now: BlockNumber,
    },
}
