//! Instruction definitions

use borsh::{BorshDeserialize, BorshSerialize};
#[allow(deprecated)]
use solana_program::system_program;
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    config::Configuration,
    derivation::{dispatched_message_address, gas_payment_address, holder_address},
};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum HolderInstruction {
    /// Create the holder record for the signing creator
    ///
    /// Accounts expected:
    /// 0. `[writable]` Holder account (PDA: ["boring_state", creator])
    /// 1. `[writable, signer]` Creator / payer
    /// 2. `[]` System program
    Initialize {
        owner: Pubkey,
        strategist: Pubkey,
        config: Configuration,
    },

    /// Replace the owner (owner only)
    ///
    /// Accounts expected:
    /// 0. `[writable]` Holder account
    /// 1. `[signer]` Current owner
    TransferOwnership { new_owner: Pubkey },

    /// Replace the strategist (owner only)
    ///
    /// Accounts expected:
    /// 0. `[writable]` Holder account
    /// 1. `[signer]` Owner
    UpdateStrategist { new_strategist: Pubkey },

    /// Replace the configuration commitment (owner only)
    ///
    /// Accounts expected:
    /// 0. `[writable]` Holder account
    /// 1. `[signer]` Owner
    UpdateConfiguration { config: Configuration },

    /// Release custody tokens through the configured warp route (strategist only)
    ///
    /// Accounts expected:
    /// 0.  `[writable]` Holder account
    /// 1.  `[writable, signer]` Strategist (token sender and mailbox payer)
    /// 2.  `[]` Target warp route program
    /// 3.  `[]` System program
    /// 4.  `[]` Noop program
    /// 5.  `[]` Warp route token PDA
    /// 6.  `[]` Mailbox program
    /// 7.  `[writable]` Mailbox outbox
    /// 8.  `[]` Message dispatch authority
    /// 9.  `[signer]` Unique message (ephemeral key)
    /// 10. `[writable]` Message storage PDA
    /// 11. `[]` IGP program
    /// 12. `[writable]` IGP program data
    /// 13. `[writable]` Gas payment PDA
    /// 14. `[]` IGP account
    /// 15. `[writable]` Token sender
    /// 16. `[]` Token program
    /// 17. `[writable]` Mint
    /// 18. `[writable]` Holder token account (custody)
    /// 19. `[writable]` Strategist token account
    TransferRemote {
        destination_domain: u32,
        evm_recipient: [u8; 32],
        decimals: u8,
        amount: u64,
    },

    /// Report the program version via logs and return data
    ///
    /// No accounts expected.
    Version,
}

/// Builds an `Initialize` instruction for `creator`.
pub fn initialize(
    program_id: &Pubkey,
    creator: &Pubkey,
    owner: Pubkey,
    strategist: Pubkey,
    config: Configuration,
) -> Result<Instruction, ProgramError> {
    let (holder, _) = holder_address(program_id, creator);
    let data = HolderInstruction::Initialize {
        owner,
        strategist,
        config,
    }
    .try_to_vec()?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(holder, false),
            AccountMeta::new(*creator, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data,
    })
}

/// Builds an owner-gated instruction against `holder`.
fn owner_instruction(
    program_id: &Pubkey,
    holder: &Pubkey,
    owner: &Pubkey,
    instruction: HolderInstruction,
) -> Result<Instruction, ProgramError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*holder, false),
            AccountMeta::new_readonly(*owner, true),
        ],
        data: instruction.try_to_vec()?,
    })
}

pub fn transfer_ownership(
    program_id: &Pubkey,
    holder: &Pubkey,
    owner: &Pubkey,
    new_owner: Pubkey,
) -> Result<Instruction, ProgramError> {
    owner_instruction(
        program_id,
        holder,
        owner,
        HolderInstruction::TransferOwnership { new_owner },
    )
}

pub fn update_strategist(
    program_id: &Pubkey,
    holder: &Pubkey,
    owner: &Pubkey,
    new_strategist: Pubkey,
) -> Result<Instruction, ProgramError> {
    owner_instruction(
        program_id,
        holder,
        owner,
        HolderInstruction::UpdateStrategist { new_strategist },
    )
}

pub fn update_configuration(
    program_id: &Pubkey,
    holder: &Pubkey,
    owner: &Pubkey,
    config: Configuration,
) -> Result<Instruction, ProgramError> {
    owner_instruction(
        program_id,
        holder,
        owner,
        HolderInstruction::UpdateConfiguration { config },
    )
}

/// Builds a `TransferRemote` instruction whose accounts and destination are
/// taken from `config`. The message storage and gas payment PDAs are derived
/// from `unique_message`.
#[allow(clippy::too_many_arguments)]
pub fn transfer_remote(
    program_id: &Pubkey,
    holder: &Pubkey,
    strategist: &Pubkey,
    config: &Configuration,
    unique_message: &Pubkey,
    holder_token_account: &Pubkey,
    strategist_token_account: &Pubkey,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let (message_storage, _) = dispatched_message_address(&config.mailbox_program, unique_message);
    let (gas_payment, _) = gas_payment_address(&config.igp_program, unique_message);

    let data = HolderInstruction::TransferRemote {
        destination_domain: config.destination_domain,
        evm_recipient: config.evm_recipient,
        decimals: config.decimals,
        amount,
    }
    .try_to_vec()?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*holder, false),
            AccountMeta::new(*strategist, true),
            AccountMeta::new_readonly(config.target_program, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(config.noop, false),
            AccountMeta::new_readonly(config.token_pda, false),
            AccountMeta::new_readonly(config.mailbox_program, false),
            AccountMeta::new(config.mailbox_outbox, false),
            AccountMeta::new_readonly(config.message_dispatch_authority, false),
            AccountMeta::new_readonly(*unique_message, true),
            AccountMeta::new(message_storage, false),
            AccountMeta::new_readonly(config.igp_program, false),
            AccountMeta::new(config.igp_program_data, false),
            AccountMeta::new(gas_payment, false),
            AccountMeta::new_readonly(config.igp_account, false),
            AccountMeta::new(config.token_sender, false),
            AccountMeta::new_readonly(config.token_program, false),
            AccountMeta::new(config.mint, false),
            AccountMeta::new(*holder_token_account, false),
            AccountMeta::new(*strategist_token_account, false),
        ],
        data,
    })
}

pub fn version(program_id: &Pubkey) -> Result<Instruction, ProgramError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![],
        data: HolderInstruction::Version.try_to_vec()?,
    })
}
