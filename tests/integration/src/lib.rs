//! Shared helpers for Streampay integration tests.

use std::sync::Arc;

use streampay_core::config::LedgerConfig;
use streampay_core::types::TokenAmount;
use streampay_crypto::KeyPair;
use streampay_ledger::adapters::{InternalGateway, ManualClock};
use streampay_ledger::{AssetGateway, BlockClock, ChannelLedger};

/// Initialize tracing once for a test binary; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// A funded two-party setup: a ledger over the internal gateway with the
/// sender's escrow already in place and the clock at block 1000.
pub struct TwoParty {
    pub ledger: ChannelLedger,
    pub gateway: Arc<InternalGateway>,
    pub clock: Arc<ManualClock>,
    pub sender: KeyPair,
    pub receiver: KeyPair,
}

impl TwoParty {
    /// Build the fixture with `escrow` units already moved into escrow on
    /// the sender's behalf.
    pub async fn funded(escrow: u64) -> Self {
        init_tracing();

        let gateway = Arc::new(InternalGateway::new());
        let clock = Arc::new(ManualClock::new(1000));
        let sender = KeyPair::from_seed(&[0x51u8; 32]).expect("valid seed");
        let receiver = KeyPair::from_seed(&[0x52u8; 32]).expect("valid seed");

        gateway
            .credit(sender.address(), TokenAmount::from(escrow))
            .await;
        gateway
            .escrow_from(sender.address(), TokenAmount::from(escrow))
            .await
            .expect("seeded balance covers escrow");

        let ledger = ChannelLedger::new(
            &LedgerConfig::default(),
            Arc::clone(&gateway) as Arc<dyn AssetGateway>,
            Arc::clone(&clock) as Arc<dyn BlockClock>,
        );

        Self {
            ledger,
            gateway,
            clock,
            sender,
            receiver,
        }
    }
}
