use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use streampay_core::types::{Address, BlockNumber, TokenAmount};
use tokio::sync::RwLock;

use crate::traits::{AssetGateway, BlockClock, GatewayError};

#[derive(Default)]
struct GatewayBook {
    /// Freely spendable balance per address.
    balances: HashMap<Address, TokenAmount>,
    /// Value held for open channels, paid out at settlement.
    escrow: TokenAmount,
}

/// In-memory asset gateway.
///
/// Keeps a simple book of free balances plus one escrow pool. Useful for
/// tests and for local runs that do not need an external asset rail. The
/// payout applies both legs under one write lock, so a rejection never
/// leaves funds half-moved.
pub struct InternalGateway {
    book: RwLock<GatewayBook>,
}

impl InternalGateway {
    /// Create a gateway with an empty book.
    pub fn new() -> Self {
        Self {
            book: RwLock::new(GatewayBook::default()),
        }
    }

    /// Mint `amount` into `account`'s free balance.
    pub async fn credit(&self, account: Address, amount: TokenAmount) {
        let mut book = self.book.write().await;
        let current = book
            .balances
            .get(&account)
            .copied()
            .unwrap_or(TokenAmount::ZERO);
        // Saturate rather than fail: this is a mint used to seed tests.
        let updated = current.checked_add(amount).unwrap_or(TokenAmount::MAX);
        book.balances.insert(account, updated);
    }

    /// Move `amount` from `from`'s free balance into the escrow pool.
    /// This is the transfer that accompanies a channel deposit.
    pub async fn escrow_from(&self, from: Address, amount: TokenAmount) -> Result<(), GatewayError> {
        let mut book = self.book.write().await;
        let available = book
            .balances
            .get(&from)
            .copied()
            .unwrap_or(TokenAmount::ZERO);
        let remaining = available
            .checked_sub(amount)
            .ok_or(GatewayError::InsufficientFunds {
                available,
                required: amount,
            })?;
        let escrow = book
            .escrow
            .checked_add(amount)
            .ok_or_else(|| GatewayError::Rejected("escrow pool overflow".into()))?;
        book.balances.insert(from, remaining);
        book.escrow = escrow;
        Ok(())
    }

    /// The free balance of `account`.
    pub async fn balance_of(&self, account: Address) -> TokenAmount {
        self.book
            .read()
            .await
            .balances
            .get(&account)
            .copied()
            .unwrap_or(TokenAmount::ZERO)
    }

    /// Total value currently escrowed.
    pub async fn escrow_total(&self) -> TokenAmount {
        self.book.read().await.escrow
    }
}

impl Default for InternalGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetGateway for InternalGateway {
    async fn payout(
        &self,
        receiver: Address,
        to_receiver: TokenAmount,
        sender: Address,
        to_sender: TokenAmount,
    ) -> Result<(), GatewayError> {
        let mut book = self.book.write().await;

        let total = to_receiver
            .checked_add(to_sender)
            .ok_or_else(|| GatewayError::Rejected("payout total overflows".into()))?;
        let remaining_escrow =
            book.escrow
                .checked_sub(total)
                .ok_or(GatewayError::InsufficientFunds {
                    available: book.escrow,
                    required: total,
                })?;

        // Validate both credits before touching the book.
        let credited = |book: &GatewayBook, account: Address, amount: TokenAmount| {
            let current = book
                .balances
                .get(&account)
                .copied()
                .unwrap_or(TokenAmount::ZERO);
            current
                .checked_add(amount)
                .ok_or_else(|| GatewayError::Rejected("balance overflows".into()))
        };

        if receiver == sender {
            let updated = credited(&book, receiver, total)?;
            book.balances.insert(receiver, updated);
        } else {
            let receiver_updated = credited(&book, receiver, to_receiver)?;
            let sender_updated = credited(&book, sender, to_sender)?;
            book.balances.insert(receiver, receiver_updated);
            book.balances.insert(sender, sender_updated);
        }
        book.escrow = remaining_escrow;
        Ok(())
    }

    fn gateway_id(&self) -> &str {
        "gw-internal"
    }
}

/// Manually advanced logical clock.
pub struct ManualClock {
    block: AtomicU32,
}

impl ManualClock {
    /// Create a clock at the given block.
    pub fn new(start: BlockNumber) -> Self {
        Self {
            block: AtomicU32::new(start),
        }
    }

    /// Jump to a specific block.
    pub fn set(&self, block: BlockNumber) {
        self.block.store(block, Ordering::SeqCst);
    }

    /// Advance by `blocks`.
    pub fn advance(&self, blocks: BlockNumber) {
        self.block.fetch_add(blocks, Ordering::SeqCst);
    }
}

impl BlockClock for ManualClock {
    fn current_block(&self) -> BlockNumber {
        self.block.load(Ordering::SeqCst)
    }
}
