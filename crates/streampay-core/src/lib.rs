//! Streampay core
//!
//! Shared value types, the canonical balance-message codec, and ledger
//! configuration. Everything here is pure data; the channel state machine
//! itself lives in `streampay-ledger`.

pub mod balance_message;
pub mod config;
pub mod error;
pub mod types;

pub use balance_message::{balance_message, signing_envelope, SIGNED_MESSAGE_PREFIX};
pub use config::{LedgerConfig, MIN_CHALLENGE_PERIOD};
pub use error::CoreError;
pub use types::{Address, BlockNumber, ChannelKey, ChannelPhase, TokenAmount};
