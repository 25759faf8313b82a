use serde::{Deserialize, Serialize};
use streampay_core::types::{Address, BlockNumber, ChannelKey, ChannelPhase, TokenAmount};

use crate::error::ChannelError;

/// A live channel: the sender's escrowed deposit for one receiver at one
/// open-sequence, plus the closing request once an uncooperative close has
/// been initiated.
///
/// Channel and closing request live in a single record so that no reader
/// can observe one without the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    /// The depositing party; only its balance proofs can close the channel.
    pub sender: Address,
    /// The party the deposit is spendable towards.
    pub receiver: Address,
    /// Logical time at creation; disambiguates successive channels between
    /// the same pair.
    pub open_sequence: BlockNumber,
    /// Total escrowed value. Only ever increases while the channel is open.
    pub deposit: TokenAmount,
    /// Set exactly once per channel lifetime; immutable until settlement.
    pub closing: Option<ClosingRequest>,
}

impl Channel {
    /// Current lifecycle phase.
    pub fn phase(&self) -> ChannelPhase {
        if self.closing.is_some() {
            ChannelPhase::CloseRequested
        } else {
            ChannelPhase::Open
        }
    }
}

/// A pending uncooperative close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingRequest {
    /// Settlement is allowed strictly after this block.
    pub settle_at: BlockNumber,
    /// The balance the stored proof authorized for the receiver.
    pub closing_balance: TokenAmount,
}

/// Query projection of a live channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub key: ChannelKey,
    pub deposit: TokenAmount,
    /// Zero while no closing request exists.
    pub settle_at: BlockNumber,
    /// Zero while no closing request exists.
    pub closing_balance: TokenAmount,
    pub phase: ChannelPhase,
}

/// Parsed deposit funding payload.
///
/// The funding entry point receives an opaque byte payload alongside the
/// transferred amount: 20 bytes name a receiver (open a new channel), 24
/// bytes name a receiver plus a big-endian open-sequence (top up an
/// existing one). Anything else is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositInstruction {
    Create {
        receiver: Address,
    },
    TopUp {
        receiver: Address,
        open_sequence: BlockNumber,
    },
}

impl DepositInstruction {
    pub const CREATE_LEN: usize = 20;
    pub const TOP_UP_LEN: usize = 24;

    /// Decode a funding payload, rejecting any unexpected length.
    pub fn parse(payload: &[u8]) -> Result<Self, ChannelError> {
        match payload.len() {
            Self::CREATE_LEN => Ok(Self::Create {
                receiver: Address::from_slice(payload),
            }),
            Self::TOP_UP_LEN => {
                let mut sequence = [0u8; 4];
                sequence.copy_from_slice(&payload[Self::CREATE_LEN..]);
                Ok(Self::TopUp {
                    receiver: Address::from_slice(&payload[..Self::CREATE_LEN]),
                    open_sequence: u32::from_be_bytes(sequence),
                })
            }
            other => Err(ChannelError::InvalidInput(format!(
                "deposit payload must be {} or {} bytes, got {}",
                Self::CREATE_LEN,
                Self::TOP_UP_LEN,
                other
            ))),
        }
    }
}

/// Final outcome of a settlement: the atomic split of a channel's deposit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReceipt {
    pub channel_key: ChannelKey,
    pub sender: Address,
    pub receiver: Address,
    /// Exactly the closing balance.
    pub paid_to_receiver: TokenAmount,
    /// Exactly deposit minus closing balance.
    pub refunded_to_sender: TokenAmount,
}
