//! Bridge Holder Program (Native Solana)
//!
//! Custodies pooled SPL tokens and releases them to a Hyperlane warp route.
//!
//! ## Roles
//!
//! - `owner`: full administrative control (ownership, strategist, configuration)
//! - `strategist`: may only initiate `TransferRemote`
//!
//! ## Security Model
//!
//! - The full set of collaborator accounts (warp route, mailbox, IGP, token
//!   program, mint, destination) is never stored; only a SHA-256 commitment
//!   over its canonical encoding is kept in the holder record.
//! - Every transfer rebuilds the configuration from the supplied accounts and
//!   must reproduce the stored commitment exactly.
//! - Message storage and gas payment PDAs are derived from a fresh ephemeral
//!   signer per transfer, so a dispatched message can never be replayed into
//!   an existing slot.

pub mod config;
pub mod derivation;
pub mod error;
pub mod events;
pub mod instruction;
pub mod processor;
pub mod state;
pub mod transfer;

#[cfg(not(feature = "no-entrypoint"))]
mod entrypoint;

pub use solana_program;

// Re-export for tests and off-chain clients
pub use config::Configuration;
pub use error::HolderError;
pub use instruction::HolderInstruction;
pub use state::{seeds, HolderState};

/// Version identifier reported by the `Version` instruction.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
