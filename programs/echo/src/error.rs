use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use solana_program::program_error::ProgramError;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
pub enum EchoError {
    #[error("Funder cannot pay for the buffer allocation")]
    InsufficientFunds,
    #[error("Requested capacity exceeds the per-operation allocation limit")]
    CapacityTooLarge,
    #[error("Target account is already initialized")]
    DuplicateAccount,
    #[error("Payload exceeds buffer capacity")]
    Overflow,
    #[error("Signer does not match the buffer authority")]
    Unauthorized,
    #[error("Address derivation failed for the given seeds")]
    InvalidSeed,
    #[error("Invalid instruction data")]
    InvalidInstruction,
    #[error("Invalid account data")]
    InvalidAccountData,
}

impl EchoError {
    /// Maps a `ProgramError::Custom` code back to the error that produced it.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::from_u32(code)
    }
}

impl From<EchoError> for ProgramError {
    fn from(e: EchoError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
