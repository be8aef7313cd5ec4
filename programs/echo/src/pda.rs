//! Address derivation for authorized buffers.
//!
//! `address = PDA(program_id, ["authority", authority, buffer_seed as u64 LE])`.
//! Derivation is pure; nothing here caches results.

use solana_program::pubkey::Pubkey;

use crate::error::EchoError;

pub const AUTHORIZED_BUFFER_SEED: &[u8] = b"authority";

pub fn find_authorized_buffer_address(
    program_id: &Pubkey,
    authority: &Pubkey,
    buffer_seed: u64,
) -> Result<(Pubkey, u8), EchoError> {
    Pubkey::try_find_program_address(
        &[AUTHORIZED_BUFFER_SEED, authority.as_ref(), &buffer_seed.to_le_bytes()],
        program_id,
    )
    .ok_or(EchoError::InvalidSeed)
}

/// Re-derives an authorized buffer address from a known bump.
pub fn create_authorized_buffer_address(
    program_id: &Pubkey,
    authority: &Pubkey,
    buffer_seed: u64,
    bump: u8,
) -> Result<Pubkey, EchoError> {
    Pubkey::create_program_address(
        &[
            AUTHORIZED_BUFFER_SEED,
            authority.as_ref(),
            &buffer_seed.to_le_bytes(),
            &[bump],
        ],
        program_id,
    )
    .map_err(|_| EchoError::InvalidSeed)
}
