use alloy_primitives::B256;
use streampay_core::balance_message::signing_envelope;
use streampay_core::types::{Address, ChannelKey, TokenAmount};

/// Hash arbitrary data with Keccak-256.
pub fn keccak256(data: impl AsRef<[u8]>) -> B256 {
    alloy_primitives::keccak256(data)
}

/// Hash the signing envelope for a balance message. This digest is what
/// balance-proof signatures commit to.
pub fn hash_balance_envelope(
    receiver: Address,
    open_sequence: u32,
    balance: TokenAmount,
) -> B256 {
    keccak256(signing_envelope(receiver, open_sequence, balance))
}

/// Derive the unique channel key for `(sender, receiver, open_sequence)`.
///
/// Keccak-256 over the fixed-width concatenation of the three fields:
/// 20 bytes sender, 20 bytes receiver, 4 bytes big-endian open-sequence.
/// Channels between the same pair at different open-sequence numbers get
/// distinct keys, which is what prevents proof replay across channel
/// generations.
pub fn derive_channel_key(sender: Address, receiver: Address, open_sequence: u32) -> ChannelKey {
    let mut buf = [0u8; 44];
    buf[..20].copy_from_slice(sender.as_slice());
    buf[20..40].copy_from_slice(receiver.as_slice());
    buf[40..].copy_from_slice(&open_sequence.to_be_bytes());
    ChannelKey(keccak256(buf))
}
