use echo_program::instruction::EchoInstruction;
use echo_program::pda::find_authorized_buffer_address;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program,
};

use crate::errors::EchoClientError;

pub fn initialize_echo(program_id: Pubkey, buffer: Pubkey, funder: Pubkey, capacity: u64) -> Instruction {
    Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(buffer, true),
            AccountMeta::new(funder, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: EchoInstruction::InitializeEcho { capacity }.pack(),
    }
}

pub fn echo(program_id: Pubkey, buffer: Pubkey, payload: &[u8]) -> Instruction {
    Instruction {
        program_id,
        accounts: vec![AccountMeta::new(buffer, false)],
        data: EchoInstruction::Echo { payload }.pack(),
    }
}

pub fn zero_copy_echo(
    program_id: Pubkey,
    buffer: Pubkey,
    funder: Pubkey,
    capacity: u64,
    payload: &[u8],
) -> Instruction {
    Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(buffer, true),
            AccountMeta::new(funder, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: EchoInstruction::ZeroCopyEcho { capacity, payload }.pack(),
    }
}

pub fn zero_copy_echo_write(program_id: Pubkey, buffer: Pubkey, payload: &[u8]) -> Instruction {
    Instruction {
        program_id,
        accounts: vec![AccountMeta::new(buffer, false)],
        data: EchoInstruction::ZeroCopyEchoWrite { payload }.pack(),
    }
}

pub fn initialize_authorized_echo(
    program_id: Pubkey,
    authority: Pubkey,
    buffer_seed: u64,
    buffer_size: u64,
) -> Result<Instruction, EchoClientError> {
    let (authorized_buffer, _) = find_authorized_buffer_address(&program_id, &authority, buffer_seed)
        .map_err(EchoClientError::Program)?;

    Ok(Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(authorized_buffer, false),
            AccountMeta::new(authority, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: EchoInstruction::InitializeAuthorizedEcho { buffer_seed, buffer_size }.pack(),
    })
}

pub fn authorized_echo(
    program_id: Pubkey,
    authority: Pubkey,
    buffer_seed: u64,
    payload: &[u8],
) -> Result<Instruction, EchoClientError> {
    let (authorized_buffer, _) = find_authorized_buffer_address(&program_id, &authority, buffer_seed)
        .map_err(EchoClientError::Program)?;
    Ok(authorized_echo_at(program_id, authorized_buffer, authority, buffer_seed, payload))
}

/// Authorized echo against an explicit buffer address, for callers that
/// already hold the derived address (or are probing a foreign one).
pub fn authorized_echo_at(
    program_id: Pubkey,
    authorized_buffer: Pubkey,
    authority: Pubkey,
    buffer_seed: u64,
    payload: &[u8],
) -> Instruction {
    Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(authorized_buffer, false),
            AccountMeta::new_readonly(authority, true),
        ],
        data: EchoInstruction::AuthorizedEcho { buffer_seed, payload }.pack(),
    }
}
