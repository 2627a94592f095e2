//! Deterministic address derivation.
//!
//! The holder record is found from its creator alone, and the two single-use
//! addresses of a transfer are found from its ephemeral `unique_message` key.
//! The latter two live under the mailbox and IGP programs and use the seed
//! layout those programs expect.

use solana_program::pubkey::Pubkey;

use crate::state::seeds;

/// Holder record PDA for `creator`.
pub fn holder_address(program_id: &Pubkey, creator: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seeds::HOLDER_SEED, creator.as_ref()], program_id)
}

/// Mailbox message storage PDA for a dispatch keyed by `unique_message`.
pub fn dispatched_message_address(mailbox_program: &Pubkey, unique_message: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            seeds::MAILBOX_SEED,
            seeds::SEPARATOR,
            seeds::DISPATCHED_MESSAGE_SEED,
            seeds::SEPARATOR,
            unique_message.as_ref(),
        ],
        mailbox_program,
    )
}

/// IGP gas payment PDA for a payment keyed by `unique_message`.
pub fn gas_payment_address(igp_program: &Pubkey, unique_message: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            seeds::IGP_SEED,
            seeds::SEPARATOR,
            seeds::GAS_PAYMENT_SEED,
            seeds::SEPARATOR,
            unique_message.as_ref(),
        ],
        igp_program,
    )
}
