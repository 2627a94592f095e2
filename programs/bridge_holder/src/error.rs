//! Error types

use solana_program::program_error::ProgramError;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum HolderError {
    #[error("Invalid instruction data")]
    InvalidInstructionData,

    #[error("Holder account already initialized")]
    AlreadyInitialized,

    #[error("Holder account not initialized")]
    AccountNotInitialized,

    #[error("OnlyOwner")]
    Unauthorized,

    #[error("Invalid Configuration")]
    InvalidConfiguration,

    #[error("A seeds constraint was violated")]
    ConstraintSeeds,

    #[error("A token owner constraint was violated")]
    ConstraintTokenOwner,

    #[error("Invalid PDA")]
    InvalidPda,

    #[error("Invalid account owner")]
    InvalidAccountOwner,

    #[error("Recipient longer than 32 bytes")]
    InvalidRecipient,
}

impl From<HolderError> for ProgramError {
    fn from(e: HolderError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
