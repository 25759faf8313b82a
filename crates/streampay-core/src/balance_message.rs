//! Canonical balance-message codec.
//!
//! A balance proof is a signature over the exact byte sequence produced
//! here. Both sides of a channel, and the ledger at close time, must
//! rebuild it identically, so the rendering below is byte-exact contract,
//! not presentation.

use crate::types::{Address, TokenAmount};

/// Literal tag prefixed to every signed message, followed by the ASCII
/// decimal length of the message.
pub const SIGNED_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Build the canonical human-readable balance message.
///
/// Format: `Receiver: 0x<40 lowercase hex chars>, Balance: <decimal>,
/// Channel ID: <decimal>`. The hex is fixed-width with no separators; the
/// decimals carry no leading zeros (zero renders as `0`).
pub fn balance_message(receiver: Address, open_sequence: u32, balance: TokenAmount) -> String {
    format!(
        "Receiver: 0x{}, Balance: {}, Channel ID: {}",
        hex::encode(receiver),
        balance,
        open_sequence
    )
}

/// Build the length-prefixed signing envelope for a balance message.
///
/// This is the byte sequence that gets hashed and signed: the literal
/// prefix tag, the ASCII decimal byte length of the message, then the
/// message itself.
pub fn signing_envelope(receiver: Address, open_sequence: u32, balance: TokenAmount) -> Vec<u8> {
    let message = balance_message(receiver, open_sequence, balance);
    let length = message.len().to_string();

    let mut envelope =
        Vec::with_capacity(SIGNED_MESSAGE_PREFIX.len() + length.len() + message.len());
    envelope.extend_from_slice(SIGNED_MESSAGE_PREFIX.as_bytes());
    envelope.extend_from_slice(length.as_bytes());
    envelope.extend_from_slice(message.as_bytes());
    envelope
}
