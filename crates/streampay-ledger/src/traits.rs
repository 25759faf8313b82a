use async_trait::async_trait;
use streampay_core::types::{Address, BlockNumber, TokenAmount};

/// Asset gateway errors.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("insufficient funds: available {available}, required {required}")]
    InsufficientFunds {
        available: TokenAmount,
        required: TokenAmount,
    },

    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Adapts ledger settlement decisions to real asset movement.
///
/// Each implementation bridges the ledger to a concrete asset rail (a
/// token contract, an internal book, a test double). The payout is a
/// single instruction covering both legs of a settlement: an adapter must
/// apply both credits or neither, so a rejection leaves no funds moved
/// and the ledger can restore the channel unchanged.
#[async_trait]
pub trait AssetGateway: Send + Sync {
    /// Pay out a settled channel: `to_receiver` to the receiver and
    /// `to_sender` back to the sender, atomically.
    async fn payout(
        &self,
        receiver: Address,
        to_receiver: TokenAmount,
        sender: Address,
        to_sender: TokenAmount,
    ) -> Result<(), GatewayError>;

    /// Unique identifier of this gateway (e.g. "gw-internal").
    fn gateway_id(&self) -> &str;
}

/// Supplies the current logical time used for open-sequence numbers and
/// challenge-period deadlines.
pub trait BlockClock: Send + Sync {
    /// The current block number.
    fn current_block(&self) -> BlockNumber;
}
