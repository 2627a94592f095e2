//! Event definitions for the bridge holder program.
//!
//! Events are emitted via solana_program::msg! and can be parsed from transaction logs.

use solana_program::{msg, pubkey::Pubkey};

use crate::config::{redact_recipient, Configuration};

/// Emitted when a holder record is created.
pub fn emit_initialized(holder: &Pubkey, creator: &Pubkey, bump: u8, owner: &Pubkey, strategist: &Pubkey) {
    msg!(
        "Initialized: holder={}, creator={}, bump={}, owner={}, strategist={}",
        holder,
        creator,
        bump,
        owner,
        strategist
    );
}

pub fn emit_ownership_transferred(old_owner: &Pubkey, new_owner: &Pubkey) {
    msg!(
        "OwnershipTransferred: old_owner={}, new_owner={}",
        old_owner,
        new_owner
    );
}

pub fn emit_strategist_updated(old_strategist: &Pubkey, new_strategist: &Pubkey) {
    msg!(
        "StrategistUpdated: old_strategist={}, new_strategist={}",
        old_strategist,
        new_strategist
    );
}

/// Emitted with every field of the newly approved configuration, so the
/// configuration behind a commitment can be recovered from logs.
pub fn emit_configuration_updated(config_hash: &[u8; 32], config: &Configuration) {
    msg!("ConfigurationUpdated: config_hash={}", hex::encode(config_hash));
    msg!(
        "ConfigurationUpdated: target_program={}, noop={}, token_pda={}",
        config.target_program,
        config.noop,
        config.token_pda
    );
    msg!(
        "ConfigurationUpdated: mailbox_program={}, mailbox_outbox={}, message_dispatch_authority={}",
        config.mailbox_program,
        config.mailbox_outbox,
        config.message_dispatch_authority
    );
    msg!(
        "ConfigurationUpdated: igp_program={}, igp_program_data={}, igp_account={}",
        config.igp_program,
        config.igp_program_data,
        config.igp_account
    );
    msg!(
        "ConfigurationUpdated: token_sender={}, token_program={}, mint={}",
        config.token_sender,
        config.token_program,
        config.mint
    );
    msg!(
        "ConfigurationUpdated: destination_domain={}, evm_recipient={}, decimals={}",
        config.destination_domain,
        hex::encode(config.evm_recipient),
        config.decimals
    );
}

pub fn emit_transfer_remote(destination_domain: u32, evm_recipient: &[u8; 32], amount: u64) {
    msg!(
        "TransferRemote: destination_domain={}, recipient={}, amount={}",
        destination_domain,
        redact_recipient(evm_recipient),
        amount
    );
}
