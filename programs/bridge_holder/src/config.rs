//! Transfer configuration and its on-chain commitment.
//!
//! The holder record never stores a `Configuration`; it stores the SHA-256 of
//! the canonical encoding instead. Anyone exercising `TransferRemote` must
//! present the exact accounts and destination that produced that digest.
//!
//! The canonical encoding is the borsh encoding of the struct below: every
//! field is fixed width and written in declaration order, so two equal
//! configurations always encode to the same 421 bytes.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{hash::hash, program_error::ProgramError, pubkey::Pubkey};

use crate::error::HolderError;

/// Collaborator accounts and destination approved by the owner.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Warp route program executing `transfer_remote`
    pub target_program: Pubkey,
    /// spl_noop program used by the mailbox for logging
    pub noop: Pubkey,
    /// Warp route token PDA
    pub token_pda: Pubkey,
    pub mailbox_program: Pubkey,
    pub mailbox_outbox: Pubkey,
    pub message_dispatch_authority: Pubkey,
    /// Interchain gas paymaster program
    pub igp_program: Pubkey,
    pub igp_program_data: Pubkey,
    pub igp_account: Pubkey,
    pub token_sender: Pubkey,
    /// SPL token program owning the custody accounts (Tokenkeg or Token-2022)
    pub token_program: Pubkey,
    /// Mint (also the warp route's mint authority account)
    pub mint: Pubkey,
    /// Hyperlane domain of the destination chain
    pub destination_domain: u32,
    /// Destination recipient, left-padded to 32 bytes
    pub evm_recipient: [u8; 32],
    /// Mint decimals used for `transfer_checked`
    pub decimals: u8,
}

impl Configuration {
    pub const ENCODED_LEN: usize = 12 * 32 + 4 + 32 + 1; // 421 bytes

    /// Canonical byte encoding.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, ProgramError> {
        let mut data = Vec::with_capacity(Self::ENCODED_LEN);
        self.serialize(&mut data)?;
        Ok(data)
    }

    /// SHA-256 over the canonical encoding.
    pub fn commitment(&self) -> Result<[u8; 32], ProgramError> {
        Ok(hash(&self.canonical_bytes()?).to_bytes())
    }
}

/// Left-pads a recipient address (e.g. a 20-byte EVM address) to 32 bytes.
pub fn pad_recipient(recipient: &[u8]) -> Result<[u8; 32], ProgramError> {
    if recipient.len() > 32 {
        return Err(HolderError::InvalidRecipient.into());
    }
    let mut padded = [0u8; 32];
    padded[32 - recipient.len()..].copy_from_slice(recipient);
    Ok(padded)
}

/// Short form of a recipient for logs: `0x` + first 4 and last 4 bytes of the
/// address, skipping the zero padding of a 20-byte EVM address.
pub fn redact_recipient(recipient: &[u8; 32]) -> String {
    let start = if recipient[..12].iter().all(|b| *b == 0) { 12 } else { 0 };
    format!(
        "0x{}..{}",
        hex::encode(&recipient[start..start + 4]),
        hex::encode(&recipient[28..])
    )
}
