//! Account state definitions

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{account_info::AccountInfo, program_error::ProgramError, pubkey::Pubkey};

use crate::error::HolderError;

/// Custody-authorization record, one per creator.
/// PDA seeds: ["boring_state", creator]
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct HolderState {
    /// Discriminator for account type
    pub discriminator: [u8; 8],
    /// Signer of `Initialize`; fixes the PDA address for the record's lifetime
    pub creator: Pubkey,
    /// Full administrative control
    pub owner: Pubkey,
    /// Allowed to initiate remote transfers only
    pub strategist: Pubkey,
    /// SHA-256 commitment to the last approved configuration
    pub config_hash: [u8; 32],
    /// PDA bump seed
    pub bump: u8,
}

impl HolderState {
    pub const DISCRIMINATOR: [u8; 8] = [0x42, 0x48, 0x4f, 0x4c, 0x44, 0x52, 0x53, 0x54]; // "BHOLDRST"
    pub const LEN: usize = 8 + 32 + 32 + 32 + 32 + 1; // 137 bytes

    pub fn new(
        creator: Pubkey,
        owner: Pubkey,
        strategist: Pubkey,
        config_hash: [u8; 32],
        bump: u8,
    ) -> Self {
        Self {
            discriminator: Self::DISCRIMINATOR,
            creator,
            owner,
            strategist,
            config_hash,
            bump,
        }
    }

    /// Reads the record from a holder account owned by `program_id`.
    pub fn load(account: &AccountInfo, program_id: &Pubkey) -> Result<Self, ProgramError> {
        if account.owner != program_id {
            return Err(HolderError::InvalidAccountOwner.into());
        }
        let state = Self::try_from_slice(&account.data.borrow())
            .map_err(|_| HolderError::AccountNotInitialized)?;
        if state.discriminator != Self::DISCRIMINATOR {
            return Err(HolderError::AccountNotInitialized.into());
        }
        Ok(state)
    }

    /// Writes the record back into the holder account.
    pub fn store(&self, account: &AccountInfo) -> Result<(), ProgramError> {
        self.serialize(&mut &mut account.data.borrow_mut()[..])?;
        Ok(())
    }

    /// Address currently holding `role`.
    pub fn role_key(&self, role: Role) -> &Pubkey {
        match role {
            Role::Owner => &self.owner,
            Role::Strategist => &self.strategist,
        }
    }
}

/// Authority required by a gated instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Owner,
    Strategist,
}

/// Seeds for PDA derivation
pub mod seeds {
    pub const HOLDER_SEED: &[u8] = b"boring_state";

    /// Mailbox message storage: ["hyperlane", "-", "dispatched_message", "-", unique_message]
    pub const MAILBOX_SEED: &[u8] = b"hyperlane";
    pub const DISPATCHED_MESSAGE_SEED: &[u8] = b"dispatched_message";

    /// IGP gas payment: ["hyperlane_igp", "-", "gas_payment", "-", unique_message]
    pub const IGP_SEED: &[u8] = b"hyperlane_igp";
    pub const GAS_PAYMENT_SEED: &[u8] = b"gas_payment";

    pub const SEPARATOR: &[u8] = b"-";
}
