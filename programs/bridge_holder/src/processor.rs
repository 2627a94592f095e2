//! Instruction processing

#![allow(deprecated)] // system_instruction deprecation - will migrate when solana_system_interface is stable

use borsh::BorshDeserialize;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed, set_return_data},
    program_error::ProgramError,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction,
    sysvar::Sysvar,
};

use crate::{
    config::Configuration,
    derivation::holder_address,
    error::HolderError,
    events,
    instruction::HolderInstruction,
    state::{seeds, HolderState, Role},
    transfer, VERSION,
};

pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = HolderInstruction::try_from_slice(instruction_data)
            .map_err(|_| HolderError::InvalidInstructionData)?;

        match instruction {
            HolderInstruction::Initialize {
                owner,
                strategist,
                config,
            } => {
                msg!("Instruction: Initialize");
                Self::process_initialize(program_id, accounts, owner, strategist, config)
            }
            HolderInstruction::TransferOwnership { new_owner } => {
                msg!("Instruction: TransferOwnership");
                Self::process_transfer_ownership(program_id, accounts, new_owner)
            }
            HolderInstruction::UpdateStrategist { new_strategist } => {
                msg!("Instruction: UpdateStrategist");
                Self::process_update_strategist(program_id, accounts, new_strategist)
            }
            HolderInstruction::UpdateConfiguration { config } => {
                msg!("Instruction: UpdateConfiguration");
                Self::process_update_configuration(program_id, accounts, config)
            }
            HolderInstruction::TransferRemote {
                destination_domain,
                evm_recipient,
                decimals,
                amount,
            } => {
                msg!("Instruction: TransferRemote");
                transfer::process_transfer_remote(
                    program_id,
                    accounts,
                    destination_domain,
                    evm_recipient,
                    decimals,
                    amount,
                )
            }
            HolderInstruction::Version => {
                msg!("Instruction: Version");
                Self::process_version()
            }
        }
    }

    /// Loads the holder record and checks that `authority` holds `role`.
    ///
    /// Evaluated on every call against freshly loaded state.
    pub fn authorize(
        program_id: &Pubkey,
        holder_account: &AccountInfo,
        authority: &AccountInfo,
        role: Role,
    ) -> Result<HolderState, ProgramError> {
        let state = HolderState::load(holder_account, program_id)?;
        if authority.key != state.role_key(role) {
            msg!("Unauthorized: {} is not the {:?}", authority.key, role);
            return Err(HolderError::Unauthorized.into());
        }
        if !authority.is_signer {
            return Err(ProgramError::MissingRequiredSignature);
        }
        Ok(state)
    }

    fn process_initialize(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        owner: Pubkey,
        strategist: Pubkey,
        config: Configuration,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let holder_account = next_account_info(account_info_iter)?;
        let creator = next_account_info(account_info_iter)?;
        let system_program = next_account_info(account_info_iter)?;

        if !creator.is_signer {
            return Err(ProgramError::MissingRequiredSignature);
        }

        // Derive holder PDA
        let (holder_pda, holder_bump) = holder_address(program_id, creator.key);
        if holder_pda != *holder_account.key {
            return Err(HolderError::InvalidPda.into());
        }

        // Check if already initialized
        if !holder_account.data_is_empty() {
            return Err(HolderError::AlreadyInitialized.into());
        }

        let config_hash = config.commitment()?;

        let bump_seed = [holder_bump];
        let holder_seeds: &[&[u8]] = &[seeds::HOLDER_SEED, creator.key.as_ref(), &bump_seed];
        Self::create_holder_account(program_id, holder_account, creator, system_program, holder_seeds)?;

        let state = HolderState::new(*creator.key, owner, strategist, config_hash, holder_bump);
        state.store(holder_account)?;

        events::emit_initialized(holder_account.key, creator.key, holder_bump, &owner, &strategist);
        events::emit_configuration_updated(&config_hash, &config);
        Ok(())
    }

    /// Creates the holder account at its PDA.
    ///
    /// The address is public, so it may already hold lamports sent by anyone.
    /// In that case `create_account` would fail; the account is topped up to
    /// rent exemption, then allocated and assigned under the holder seeds.
    fn create_holder_account<'info>(
        program_id: &Pubkey,
        holder_account: &AccountInfo<'info>,
        creator: &AccountInfo<'info>,
        system_program: &AccountInfo<'info>,
        holder_seeds: &[&[u8]],
    ) -> ProgramResult {
        let rent = Rent::get()?;
        let space = HolderState::LEN;
        let required_lamports = rent.minimum_balance(space);

        if holder_account.lamports() == 0 {
            return invoke_signed(
                &system_instruction::create_account(
                    creator.key,
                    holder_account.key,
                    required_lamports,
                    space as u64,
                    program_id,
                ),
                &[creator.clone(), holder_account.clone(), system_program.clone()],
                &[holder_seeds],
            );
        }

        let top_up = required_lamports.saturating_sub(holder_account.lamports());
        if top_up > 0 {
            invoke(
                &system_instruction::transfer(creator.key, holder_account.key, top_up),
                &[creator.clone(), holder_account.clone(), system_program.clone()],
            )?;
        }
        invoke_signed(
            &system_instruction::allocate(holder_account.key, space as u64),
            &[holder_account.clone(), system_program.clone()],
            &[holder_seeds],
        )?;
        invoke_signed(
            &system_instruction::assign(holder_account.key, program_id),
            &[holder_account.clone(), system_program.clone()],
            &[holder_seeds],
        )
    }

    fn process_transfer_ownership(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        new_owner: Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let holder_account = next_account_info(account_info_iter)?;
        let owner = next_account_info(account_info_iter)?;

        let mut state = Self::authorize(program_id, holder_account, owner, Role::Owner)?;

        let old_owner = state.owner;
        state.owner = new_owner;
        state.store(holder_account)?;

        events::emit_ownership_transferred(&old_owner, &new_owner);
        Ok(())
    }

    fn process_update_strategist(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        new_strategist: Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let holder_account = next_account_info(account_info_iter)?;
        let owner = next_account_info(account_info_iter)?;

        let mut state = Self::authorize(program_id, holder_account, owner, Role::Owner)?;

        let old_strategist = state.strategist;
        state.strategist = new_strategist;
        state.store(holder_account)?;

        events::emit_strategist_updated(&old_strategist, &new_strategist);
        Ok(())
    }

    fn process_update_configuration(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        config: Configuration,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let holder_account = next_account_info(account_info_iter)?;
        let owner = next_account_info(account_info_iter)?;

        let mut state = Self::authorize(program_id, holder_account, owner, Role::Owner)?;

        // Previous commitment is discarded, no history is kept
        state.config_hash = config.commitment()?;
        state.store(holder_account)?;

        events::emit_configuration_updated(&state.config_hash, &config);
        Ok(())
    }

    fn process_version() -> ProgramResult {
        msg!("Version: {}", VERSION);
        set_return_data(VERSION.as_bytes());
        Ok(())
    }
}
