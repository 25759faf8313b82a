use streampay_core::types::Address;

use crate::error::ChannelError;

/// Administrative deployment registry: an owner-gated pointer to a newer
/// deployment. Peripheral to the ledger: it never touches channel state.
#[derive(Debug, Clone)]
pub struct DeploymentRegistry {
    owner: Address,
    successor: Option<Address>,
}

impl DeploymentRegistry {
    /// Create a registry owned by `owner`, with no successor announced.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            successor: None,
        }
    }

    /// The owning address.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// The announced successor deployment, if any.
    pub fn successor(&self) -> Option<Address> {
        self.successor
    }

    /// Point at a newer deployment. Only the owner may call this.
    pub fn announce_successor(
        &mut self,
        caller: Address,
        successor: Address,
    ) -> Result<(), ChannelError> {
        if caller != self.owner {
            return Err(ChannelError::Unauthorized(format!(
                "caller {} is not the registry owner",
                caller
            )));
        }
        if successor == Address::ZERO {
            return Err(ChannelError::InvalidInput(
                "successor address must not be zero".into(),
            ));
        }
        self.successor = Some(successor);
        tracing::info!(successor = %successor, "successor deployment announced");
        Ok(())
    }
}
