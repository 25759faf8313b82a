use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use streampay_core::config::LedgerConfig;
use streampay_core::types::{Address, BlockNumber, ChannelKey, ChannelPhase, TokenAmount};
use streampay_crypto::hashing::derive_channel_key;
use streampay_crypto::signing::{recover_signer, Signature};

use crate::error::ChannelError;
use crate::traits::{AssetGateway, BlockClock};
use crate::types::{Channel, ChannelInfo, ClosingRequest, DepositInstruction, SettlementReceipt};

/// The channel ledger: exclusive owner of all channel and closing-request
/// state.
///
/// Per-key lifecycle: `Absent → Open → CloseRequested → Absent`, with a
/// direct `Open → Absent` edge for cooperative and receiver-presented
/// closes. Operations on the same key serialize on the record's map entry;
/// settlement atomically claims the record before awaiting the gateway and
/// restores it untouched if the payout is rejected.
pub struct ChannelLedger {
    channels: DashMap<ChannelKey, Channel>,
    gateway: Arc<dyn AssetGateway>,
    clock: Arc<dyn BlockClock>,
    challenge_period: BlockNumber,
}

impl ChannelLedger {
    /// Create an empty ledger over the given gateway and clock.
    pub fn new(
        config: &LedgerConfig,
        gateway: Arc<dyn AssetGateway>,
        clock: Arc<dyn BlockClock>,
    ) -> Self {
        tracing::info!(
            challenge_period = config.challenge_period,
            gateway = gateway.gateway_id(),
            "channel ledger initialized"
        );
        Self {
            channels: DashMap::new(),
            gateway,
            clock,
            challenge_period: config.challenge_period,
        }
    }

    /// The configured challenge period in blocks.
    pub fn challenge_period(&self) -> BlockNumber {
        self.challenge_period
    }

    /// Number of live channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Check if the ledger tracks no channels.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Deposit funding entry point.
    ///
    /// Invoked by the asset side once `amount` has moved into escrow. The
    /// payload selects the operation: a bare receiver opens a channel at
    /// the current block, receiver plus open-sequence tops up an existing
    /// one. Returns the affected channel's key.
    pub fn receive_deposit(
        &self,
        sender: Address,
        amount: TokenAmount,
        payload: &[u8],
    ) -> Result<ChannelKey, ChannelError> {
        match DepositInstruction::parse(payload)? {
            DepositInstruction::Create { receiver } => {
                let open_sequence = self.clock.current_block();
                self.create(sender, receiver, open_sequence, amount)
            }
            DepositInstruction::TopUp {
                receiver,
                open_sequence,
            } => {
                self.top_up(sender, receiver, open_sequence, amount)?;
                Ok(derive_channel_key(sender, receiver, open_sequence))
            }
        }
    }

    /// Open a channel: escrow `deposit` from `sender` towards `receiver`
    /// at `open_sequence`.
    pub fn create(
        &self,
        sender: Address,
        receiver: Address,
        open_sequence: BlockNumber,
        deposit: TokenAmount,
    ) -> Result<ChannelKey, ChannelError> {
        if deposit.is_zero() {
            return Err(ChannelError::InvalidInput(
                "deposit must be greater than zero".into(),
            ));
        }
        if open_sequence == 0 {
            return Err(ChannelError::InvalidInput(
                "open sequence must be greater than zero".into(),
            ));
        }

        let key = derive_channel_key(sender, receiver, open_sequence);
        match self.channels.entry(key) {
            Entry::Occupied(_) => Err(ChannelError::AlreadyExists(key)),
            Entry::Vacant(vacant) => {
                vacant.insert(Channel {
                    sender,
                    receiver,
                    open_sequence,
                    deposit,
                    closing: None,
                });
                tracing::info!(
                    channel = %key,
                    sender = %sender,
                    receiver = %receiver,
                    open_sequence,
                    deposit = %deposit,
                    "channel created"
                );
                Ok(key)
            }
        }
    }

    /// Increase an open channel's deposit. Rejected once a closing request
    /// exists; a sum that would wrap the 192-bit range aborts with the
    /// deposit unchanged. Returns the new total.
    pub fn top_up(
        &self,
        sender: Address,
        receiver: Address,
        open_sequence: BlockNumber,
        added: TokenAmount,
    ) -> Result<TokenAmount, ChannelError> {
        if added.is_zero() {
            return Err(ChannelError::InvalidInput(
                "top-up amount must be greater than zero".into(),
            ));
        }
        if open_sequence == 0 {
            return Err(ChannelError::InvalidInput(
                "open sequence must be greater than zero".into(),
            ));
        }

        let key = derive_channel_key(sender, receiver, open_sequence);
        let mut entry = self
            .channels
            .get_mut(&key)
            .ok_or(ChannelError::NotFound(key))?;
        let channel = entry.value_mut();

        if channel.closing.is_some() {
            return Err(ChannelError::AlreadyClosing(key));
        }

        let old_deposit = channel.deposit;
        channel.deposit = old_deposit
            .checked_add(added)
            .ok_or(ChannelError::ArithmeticOverflow {
                deposit: old_deposit,
                added,
            })?;

        tracing::info!(
            channel = %key,
            old_deposit = %old_deposit,
            new_deposit = %channel.deposit,
            "channel topped up"
        );
        Ok(channel.deposit)
    }

    /// Sender-initiated uncooperative close.
    ///
    /// The balance proof must recover to `sender`; the closing request
    /// becomes settleable strictly after `now + challenge_period`, giving
    /// the receiver that window to present a better proof. Returns the
    /// settlement block.
    pub fn initiate_uncooperative_close(
        &self,
        sender: Address,
        receiver: Address,
        open_sequence: BlockNumber,
        balance: TokenAmount,
        signature: &Signature,
    ) -> Result<BlockNumber, ChannelError> {
        let signer = recover_signer(receiver, open_sequence, balance, signature)?;
        if signer != sender {
            return Err(ChannelError::Unauthorized(format!(
                "balance proof signed by {}, expected channel sender {}",
                signer, sender
            )));
        }

        let key = derive_channel_key(sender, receiver, open_sequence);
        let mut entry = self
            .channels
            .get_mut(&key)
            .ok_or(ChannelError::NotFound(key))?;
        let channel = entry.value_mut();

        if channel.closing.is_some() {
            return Err(ChannelError::AlreadyClosing(key));
        }
        if balance > channel.deposit {
            return Err(ChannelError::InvalidInput(format!(
                "closing balance {} exceeds deposit {}",
                balance, channel.deposit
            )));
        }

        let settle_at = self
            .clock
            .current_block()
            .saturating_add(self.challenge_period);
        channel.closing = Some(ClosingRequest {
            settle_at,
            closing_balance: balance,
        });

        tracing::info!(
            channel = %key,
            closing_balance = %balance,
            settle_at,
            phase = %ChannelPhase::CloseRequested,
            "uncooperative close requested"
        );
        Ok(settle_at)
    }

    /// Settle a closing request whose challenge period has elapsed.
    /// Callable by anyone; pays out the stored closing balance.
    pub async fn settle_after_challenge(
        &self,
        sender: Address,
        receiver: Address,
        open_sequence: BlockNumber,
    ) -> Result<SettlementReceipt, ChannelError> {
        let key = derive_channel_key(sender, receiver, open_sequence);
        let channel = self.take_channel(&key)?;

        let Some(closing) = channel.closing else {
            self.restore(key, channel);
            return Err(ChannelError::NoClosingRequest(key));
        };

        let now = self.clock.current_block();
        if now <= closing.settle_at {
            self.restore(key, channel);
            return Err(ChannelError::ChallengeNotElapsed {
                settle_at: closing.settle_at,
                now,
            });
        }

        self.settle(key, channel, closing.closing_balance).await
    }

    /// Receiver-presented close: settles immediately on a sender-signed
    /// balance proof, with no challenge period.
    ///
    /// The sender identity is the recovered signer itself, so a proof not
    /// signed by the channel's sender derives a key with no live channel
    /// and fails as `NotFound`.
    pub async fn uncooperative_close_by_receiver(
        &self,
        receiver: Address,
        open_sequence: BlockNumber,
        balance: TokenAmount,
        signature: &Signature,
    ) -> Result<SettlementReceipt, ChannelError> {
        let sender = recover_signer(receiver, open_sequence, balance, signature)?;
        let key = derive_channel_key(sender, receiver, open_sequence);
        let channel = self.take_channel(&key)?;
        self.settle(key, channel, balance).await
    }

    /// Cooperative close: the sender's balance proof plus the receiver's
    /// consent signature over the same message. Settles immediately.
    pub async fn cooperative_close(
        &self,
        receiver: Address,
        open_sequence: BlockNumber,
        balance: TokenAmount,
        sender_signature: &Signature,
        receiver_signature: &Signature,
    ) -> Result<SettlementReceipt, ChannelError> {
        let sender = recover_signer(receiver, open_sequence, balance, sender_signature)?;
        let consenting = recover_signer(receiver, open_sequence, balance, receiver_signature)?;
        if consenting != receiver {
            return Err(ChannelError::Unauthorized(format!(
                "closing consent signed by {}, expected receiver {}",
                consenting, receiver
            )));
        }

        let key = derive_channel_key(sender, receiver, open_sequence);
        let channel = self.take_channel(&key)?;
        self.settle(key, channel, balance).await
    }

    /// Look up a live channel.
    pub fn info(
        &self,
        sender: Address,
        receiver: Address,
        open_sequence: BlockNumber,
    ) -> Result<ChannelInfo, ChannelError> {
        let key = derive_channel_key(sender, receiver, open_sequence);
        let entry = self.channels.get(&key).ok_or(ChannelError::NotFound(key))?;
        let channel = entry.value();

        Ok(ChannelInfo {
            key,
            deposit: channel.deposit,
            settle_at: channel.closing.map(|c| c.settle_at).unwrap_or(0),
            closing_balance: channel
                .closing
                .map(|c| c.closing_balance)
                .unwrap_or(TokenAmount::ZERO),
            phase: channel.phase(),
        })
    }

    /// Atomically claim a channel record for settlement.
    fn take_channel(&self, key: &ChannelKey) -> Result<Channel, ChannelError> {
        self.channels
            .remove(key)
            .map(|(_, channel)| channel)
            .ok_or(ChannelError::NotFound(*key))
    }

    /// Put a claimed record back after a failed settlement.
    fn restore(&self, key: ChannelKey, channel: Channel) {
        self.channels.insert(key, channel);
    }

    /// Final settlement: pay `balance` to the receiver and the remainder
    /// to the sender, then destroy the record. The record is already
    /// claimed; any failure restores it unchanged.
    async fn settle(
        &self,
        key: ChannelKey,
        channel: Channel,
        balance: TokenAmount,
    ) -> Result<SettlementReceipt, ChannelError> {
        let Some(refund) = channel.deposit.checked_sub(balance) else {
            let deposit = channel.deposit;
            self.restore(key, channel);
            return Err(ChannelError::InvalidInput(format!(
                "closing balance {} exceeds deposit {}",
                balance, deposit
            )));
        };

        let sender = channel.sender;
        let receiver = channel.receiver;
        match self.gateway.payout(receiver, balance, sender, refund).await {
            Ok(()) => {
                tracing::info!(
                    channel = %key,
                    paid_to_receiver = %balance,
                    refunded_to_sender = %refund,
                    phase = %ChannelPhase::Absent,
                    "channel settled"
                );
                Ok(SettlementReceipt {
                    channel_key: key,
                    sender,
                    receiver,
                    paid_to_receiver: balance,
                    refunded_to_sender: refund,
                })
            }
            Err(error) => {
                tracing::warn!(
                    channel = %key,
                    error = %error,
                    "settlement payout rejected, channel restored"
                );
                self.restore(key, channel);
                Err(ChannelError::TransferRejected(error))
            }
        }
    }
}
