//! Remote transfer orchestration.
//!
//! A `TransferRemote` is accepted only when, in order:
//! 1. the signer is the stored strategist,
//! 2. the supplied collaborator accounts and destination reproduce the stored
//!    configuration commitment,
//! 3. the message storage and gas payment PDAs derive from the ephemeral
//!    `unique_message` signer,
//! 4. the custody token account belongs to the holder PDA and the destination
//!    token account belongs to the strategist.
//!
//! Only then are custody tokens moved to the strategist's token account and
//! the warp route invoked. The warp route burns or locks them, dispatches the
//! message through the mailbox at the verified storage PDA and pays the IGP at
//! the verified gas payment PDA.

use borsh::{BorshDeserialize, BorshSerialize};
#[allow(deprecated)]
use solana_program::system_program;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    instruction::{AccountMeta, Instruction},
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    pubkey::Pubkey,
};
use spl_token::instruction::TokenInstruction;

use crate::{
    config::Configuration,
    derivation::{dispatched_message_address, gas_payment_address},
    error::HolderError,
    events,
    processor::Processor,
    state::{seeds, HolderState, Role},
};

/// Warp route instruction prefix: 8-byte program discriminator followed by
/// the `TransferRemote` variant byte.
pub const WARP_ROUTE_TRANSFER_REMOTE_PREFIX: [u8; 9] = [1; 9];

/// Borsh payload of the warp route `TransferRemote` instruction.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct TransferRemotePayload {
    pub destination_domain: u32,
    /// H256 recipient
    pub recipient: [u8; 32],
    /// U256 amount, little-endian limbs
    pub amount_or_id: [u8; 32],
}

impl TransferRemotePayload {
    pub fn new(destination_domain: u32, recipient: [u8; 32], amount: u64) -> Self {
        let mut amount_or_id = [0u8; 32];
        amount_or_id[..8].copy_from_slice(&amount.to_le_bytes());
        Self {
            destination_domain,
            recipient,
            amount_or_id,
        }
    }

    /// Full warp route instruction data.
    pub fn instruction_data(&self) -> Result<Vec<u8>, ProgramError> {
        let mut data = WARP_ROUTE_TRANSFER_REMOTE_PREFIX.to_vec();
        self.serialize(&mut data)?;
        Ok(data)
    }
}

/// Accounts of a `TransferRemote`, in instruction order.
struct TransferRemoteAccounts<'a, 'info> {
    holder: &'a AccountInfo<'info>,
    strategist: &'a AccountInfo<'info>,
    target_program: &'a AccountInfo<'info>,
    system_program: &'a AccountInfo<'info>,
    noop: &'a AccountInfo<'info>,
    token_pda: &'a AccountInfo<'info>,
    mailbox_program: &'a AccountInfo<'info>,
    mailbox_outbox: &'a AccountInfo<'info>,
    message_dispatch_authority: &'a AccountInfo<'info>,
    unique_message: &'a AccountInfo<'info>,
    message_storage_pda: &'a AccountInfo<'info>,
    igp_program: &'a AccountInfo<'info>,
    igp_program_data: &'a AccountInfo<'info>,
    gas_payment_pda: &'a AccountInfo<'info>,
    igp_account: &'a AccountInfo<'info>,
    token_sender: &'a AccountInfo<'info>,
    token_program: &'a AccountInfo<'info>,
    mint: &'a AccountInfo<'info>,
    holder_token_account: &'a AccountInfo<'info>,
    strategist_token_account: &'a AccountInfo<'info>,
}

impl<'a, 'info> TransferRemoteAccounts<'a, 'info> {
    fn parse(accounts: &'a [AccountInfo<'info>]) -> Result<Self, ProgramError> {
        let account_info_iter = &mut accounts.iter();
        Ok(Self {
            holder: next_account_info(account_info_iter)?,
            strategist: next_account_info(account_info_iter)?,
            target_program: next_account_info(account_info_iter)?,
            system_program: next_account_info(account_info_iter)?,
            noop: next_account_info(account_info_iter)?,
            token_pda: next_account_info(account_info_iter)?,
            mailbox_program: next_account_info(account_info_iter)?,
            mailbox_outbox: next_account_info(account_info_iter)?,
            message_dispatch_authority: next_account_info(account_info_iter)?,
            unique_message: next_account_info(account_info_iter)?,
            message_storage_pda: next_account_info(account_info_iter)?,
            igp_program: next_account_info(account_info_iter)?,
            igp_program_data: next_account_info(account_info_iter)?,
            gas_payment_pda: next_account_info(account_info_iter)?,
            igp_account: next_account_info(account_info_iter)?,
            token_sender: next_account_info(account_info_iter)?,
            token_program: next_account_info(account_info_iter)?,
            mint: next_account_info(account_info_iter)?,
            holder_token_account: next_account_info(account_info_iter)?,
            strategist_token_account: next_account_info(account_info_iter)?,
        })
    }

    /// Configuration implied by the supplied accounts and destination.
    fn configuration(&self, destination_domain: u32, evm_recipient: [u8; 32], decimals: u8) -> Configuration {
        Configuration {
            target_program: *self.target_program.key,
            noop: *self.noop.key,
            token_pda: *self.token_pda.key,
            mailbox_program: *self.mailbox_program.key,
            mailbox_outbox: *self.mailbox_outbox.key,
            message_dispatch_authority: *self.message_dispatch_authority.key,
            igp_program: *self.igp_program.key,
            igp_program_data: *self.igp_program_data.key,
            igp_account: *self.igp_account.key,
            token_sender: *self.token_sender.key,
            token_program: *self.token_program.key,
            mint: *self.mint.key,
            destination_domain,
            evm_recipient,
            decimals,
        }
    }
}

pub fn process_transfer_remote(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    destination_domain: u32,
    evm_recipient: [u8; 32],
    decimals: u8,
    amount: u64,
) -> ProgramResult {
    let accounts = TransferRemoteAccounts::parse(accounts)?;

    let state = Processor::authorize(program_id, accounts.holder, accounts.strategist, Role::Strategist)?;
    verify_holder_address(program_id, &state, accounts.holder)?;

    verify_configuration(&accounts, &state, destination_domain, evm_recipient, decimals)?;
    verify_single_use_addresses(&accounts)?;
    verify_token_owners(&accounts)?;

    transfer_tokens_to_strategist(&accounts, &state, amount, decimals)?;
    execute_transfer_remote(&accounts, destination_domain, evm_recipient, amount)?;

    events::emit_transfer_remote(destination_domain, &evm_recipient, amount);
    Ok(())
}

fn verify_holder_address(program_id: &Pubkey, state: &HolderState, holder: &AccountInfo) -> ProgramResult {
    let expected = Pubkey::create_program_address(
        &[seeds::HOLDER_SEED, state.creator.as_ref(), &[state.bump]],
        program_id,
    )
    .map_err(|_| HolderError::InvalidPda)?;
    if expected != *holder.key {
        return Err(HolderError::InvalidPda.into());
    }
    Ok(())
}

/// Rebuilds the configuration from the call and compares its commitment
/// with the stored one.
fn verify_configuration(
    accounts: &TransferRemoteAccounts,
    state: &HolderState,
    destination_domain: u32,
    evm_recipient: [u8; 32],
    decimals: u8,
) -> ProgramResult {
    let config = accounts.configuration(destination_domain, evm_recipient, decimals);
    if config.commitment()? != state.config_hash {
        msg!("Configuration does not match stored commitment");
        return Err(HolderError::InvalidConfiguration.into());
    }
    if !system_program::check_id(accounts.system_program.key) {
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

fn verify_single_use_addresses(accounts: &TransferRemoteAccounts) -> ProgramResult {
    if !accounts.unique_message.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let (message_storage, _) =
        dispatched_message_address(accounts.mailbox_program.key, accounts.unique_message.key);
    if message_storage != *accounts.message_storage_pda.key {
        msg!(
            "ConstraintSeeds: message_storage_pda {} != {}",
            accounts.message_storage_pda.key,
            message_storage
        );
        return Err(HolderError::ConstraintSeeds.into());
    }

    let (gas_payment, _) = gas_payment_address(accounts.igp_program.key, accounts.unique_message.key);
    if gas_payment != *accounts.gas_payment_pda.key {
        msg!(
            "ConstraintSeeds: gas_payment_pda {} != {}",
            accounts.gas_payment_pda.key,
            gas_payment
        );
        return Err(HolderError::ConstraintSeeds.into());
    }
    Ok(())
}

fn verify_token_owners(accounts: &TransferRemoteAccounts) -> ProgramResult {
    let custody_owner = token_account_owner(accounts.holder_token_account, accounts.token_program)?;
    if custody_owner != *accounts.holder.key {
        msg!(
            "ConstraintTokenOwner: holder_token_account owner {} != {}",
            custody_owner,
            accounts.holder.key
        );
        return Err(HolderError::ConstraintTokenOwner.into());
    }

    let destination_owner = token_account_owner(accounts.strategist_token_account, accounts.token_program)?;
    if destination_owner != *accounts.strategist.key {
        msg!(
            "ConstraintTokenOwner: strategist_token_account owner {} != {}",
            destination_owner,
            accounts.strategist.key
        );
        return Err(HolderError::ConstraintTokenOwner.into());
    }
    Ok(())
}

/// Owner field of an SPL token account.
///
/// SPL Token account layout: mint (32) | owner (32) | amount (8) | ...
/// Token-2022 shares the same base layout.
fn token_account_owner(token_account: &AccountInfo, token_program: &AccountInfo) -> Result<Pubkey, ProgramError> {
    if token_account.owner != token_program.key {
        return Err(HolderError::InvalidAccountOwner.into());
    }
    let data = token_account.try_borrow_data()?;
    if data.len() < 64 {
        return Err(HolderError::InvalidAccountOwner.into());
    }
    Pubkey::try_from(&data[32..64]).map_err(|_| HolderError::InvalidAccountOwner.into())
}

/// Moves `amount` from custody to the strategist's token account, signed by
/// the holder PDA.
fn transfer_tokens_to_strategist(
    accounts: &TransferRemoteAccounts,
    state: &HolderState,
    amount: u64,
    decimals: u8,
) -> ProgramResult {
    // Encoded by hand: spl_token's builder rejects the Token-2022 program id
    let transfer_ix = Instruction {
        program_id: *accounts.token_program.key,
        accounts: vec![
            AccountMeta::new(*accounts.holder_token_account.key, false),
            AccountMeta::new_readonly(*accounts.mint.key, false),
            AccountMeta::new(*accounts.strategist_token_account.key, false),
            AccountMeta::new_readonly(*accounts.holder.key, true),
        ],
        data: TokenInstruction::TransferChecked { amount, decimals }.pack(),
    };

    invoke_signed(
        &transfer_ix,
        &[
            accounts.holder_token_account.clone(),
            accounts.mint.clone(),
            accounts.strategist_token_account.clone(),
            accounts.holder.clone(),
            accounts.token_program.clone(),
        ],
        &[&[seeds::HOLDER_SEED, state.creator.as_ref(), &[state.bump]]],
    )
}

/// Invokes the warp route `TransferRemote` with the verified accounts.
fn execute_transfer_remote(
    accounts: &TransferRemoteAccounts,
    destination_domain: u32,
    evm_recipient: [u8; 32],
    amount: u64,
) -> ProgramResult {
    let data = TransferRemotePayload::new(destination_domain, evm_recipient, amount).instruction_data()?;

    let instruction = Instruction {
        program_id: *accounts.target_program.key,
        accounts: vec![
            AccountMeta::new_readonly(*accounts.system_program.key, false),
            AccountMeta::new_readonly(*accounts.noop.key, false),
            AccountMeta::new_readonly(*accounts.token_pda.key, false),
            AccountMeta::new_readonly(*accounts.mailbox_program.key, false),
            AccountMeta::new(*accounts.mailbox_outbox.key, false),
            AccountMeta::new_readonly(*accounts.message_dispatch_authority.key, false),
            AccountMeta::new(*accounts.strategist.key, true),
            AccountMeta::new_readonly(*accounts.unique_message.key, true),
            AccountMeta::new(*accounts.message_storage_pda.key, false),
            AccountMeta::new_readonly(*accounts.igp_program.key, false),
            AccountMeta::new(*accounts.igp_program_data.key, false),
            AccountMeta::new(*accounts.gas_payment_pda.key, false),
            AccountMeta::new_readonly(*accounts.igp_account.key, false),
            AccountMeta::new(*accounts.token_sender.key, false),
            AccountMeta::new_readonly(*accounts.token_program.key, false),
            AccountMeta::new(*accounts.mint.key, false),
            AccountMeta::new(*accounts.strategist_token_account.key, false),
        ],
        data,
    };

    invoke(
        &instruction,
        &[
            accounts.system_program.clone(),
            accounts.noop.clone(),
            accounts.token_pda.clone(),
            accounts.mailbox_program.clone(),
            accounts.mailbox_outbox.clone(),
            accounts.message_dispatch_authority.clone(),
            accounts.strategist.clone(),
            accounts.unique_message.clone(),
            accounts.message_storage_pda.clone(),
            accounts.igp_program.clone(),
            accounts.igp_program_data.clone(),
            accounts.gas_payment_pda.clone(),
            accounts.igp_account.clone(),
            accounts.token_sender.clone(),
            accounts.token_program.clone(),
            accounts.mint.clone(),
            accounts.strategist_token_account.clone(),
            accounts.target_program.clone(),
        ],
    )
}
