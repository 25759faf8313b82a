use std::fmt;

use alloy_primitives::aliases::U192;
use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// 20-byte party identity, re-exported so downstream crates share one type.
pub use alloy_primitives::Address;

/// Logical time (e.g. block height) used for open-sequence numbers and
/// challenge-period deadlines.
pub type BlockNumber = u32;

/// Token value in atomic units, 192 bits wide.
///
/// All arithmetic on deposits goes through the checked methods here; a
/// top-up that would wrap the range is an error, never a silent wrap.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct TokenAmount(U192);

impl TokenAmount {
    pub const ZERO: Self = Self(U192::ZERO);
    pub const MAX: Self = Self(U192::MAX);

    /// Create from a raw 192-bit value.
    pub fn new(value: U192) -> Self {
        Self(value)
    }

    /// The raw 192-bit value.
    pub fn value(&self) -> U192 {
        self.0
    }

    /// Check if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Add, returning `None` on 192-bit overflow.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Subtract, returning `None` on underflow.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl From<u64> for TokenAmount {
    fn from(value: u64) -> Self {
        Self(U192::from(value))
    }
}

impl From<u128> for TokenAmount {
    fn from(value: u128) -> Self {
        Self(U192::from(value))
    }
}

impl From<U192> for TokenAmount {
    fn from(value: U192) -> Self {
        Self(value)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Decimal, no leading zeros; zero renders as "0". This rendering is
        // part of the signed balance-message contract.
        write!(f, "{}", self.0)
    }
}

/// Unique 256-bit channel identifier.
///
/// Derived as the Keccak-256 of `(sender, receiver, open_sequence)`, so two
/// channels between the same pair at different open-sequence numbers never
/// collide (see `streampay-crypto::hashing::derive_channel_key`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelKey(pub B256);

impl ChannelKey {
    /// The raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0 .0
    }
}

impl From<B256> for ChannelKey {
    fn from(value: B256) -> Self {
        Self(value)
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// The lifecycle phase of a channel.
///
/// Valid transitions:
/// - Absent → Open (deposit received)
/// - Open → Open (top-up)
/// - Open → CloseRequested (sender requests an uncooperative close)
/// - Open → Absent (cooperative or receiver-presented close settles directly)
/// - CloseRequested → Absent (settled after the challenge period, or by a
///   receiver-presented proof)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelPhase {
    /// No live channel under this key. Terminal; a key can only be reused
    /// by a new channel at a new open-sequence.
    Absent,
    /// Channel is open and accepting top-ups and balance proofs.
    Open,
    /// An uncooperative close is pending its challenge period.
    CloseRequested,
}

impl ChannelPhase {
    /// Whether a channel in this phase holds a live deposit.
    pub fn is_live(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// Whether a closing request exists.
    pub fn is_closing(&self) -> bool {
        matches!(self, Self::CloseRequested)
    }
}

impl fmt::Display for ChannelPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "Absent"),
            Self::Open => write!(f, "Open"),
            Self::CloseRequested => write!(f, "CloseRequested"),
        }
    }
}
