use crate::buffer::{self, ensure_fits};
use crate::error::EchoError;
use crate::instruction::EchoInstruction;
use crate::pda::{self, AUTHORIZED_BUFFER_SEED};
use crate::state::{AuthorizedBuffer, EchoBuffer, ZeroCopyEchoBuffer};
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction, system_program,
    sysvar::Sysvar,
};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    match EchoInstruction::unpack(instruction_data)? {
        EchoInstruction::InitializeEcho { capacity } => {
            msg!("Instruction: InitializeEcho");
            process_initialize_echo(program_id, accounts, capacity)
        }
        EchoInstruction::Echo { payload } => {
            msg!("Instruction: Echo");
            process_echo(program_id, accounts, payload)
        }
        EchoInstruction::ZeroCopyEcho { capacity, payload } => {
            msg!("Instruction: ZeroCopyEcho");
            process_zero_copy_echo(program_id, accounts, capacity, payload)
        }
        EchoInstruction::ZeroCopyEchoWrite { payload } => {
            msg!("Instruction: ZeroCopyEchoWrite");
            process_zero_copy_echo_write(program_id, accounts, payload)
        }
        EchoInstruction::InitializeAuthorizedEcho { buffer_seed, buffer_size } => {
            msg!("Instruction: InitializeAuthorizedEcho");
            process_initialize_authorized_echo(program_id, accounts, buffer_seed, buffer_size)
        }
        EchoInstruction::AuthorizedEcho { buffer_seed, payload } => {
            msg!("Instruction: AuthorizedEcho");
            process_authorized_echo(program_id, accounts, buffer_seed, payload)
        }
    }
}

// ============================================================================
// Allocation
// ============================================================================

/// Allocates `target` with `space` bytes owned by this program, funded by
/// `funder`. Keypair targets must sign the transaction; derived targets pass
/// their signer seeds.
fn create_buffer_account<'a>(
    program_id: &Pubkey,
    target: &AccountInfo<'a>,
    funder: &AccountInfo<'a>,
    system_program_account: &AccountInfo<'a>,
    space: usize,
    signer_seeds: &[&[&[u8]]],
) -> ProgramResult {
    if !funder.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    if signer_seeds.is_empty() && !target.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    if system_program_account.key != &system_program::ID {
        return Err(ProgramError::IncorrectProgramId);
    }
    if target.owner != &system_program::ID || !target.data_is_empty() {
        msg!("Account {} is already initialized", target.key);
        return Err(EchoError::DuplicateAccount.into());
    }

    let rent = Rent::get()?;
    let required_lamports = rent.minimum_balance(space);
    let shortfall = required_lamports.saturating_sub(target.lamports());
    // The funder must stay rent exempt afterwards, or be drained to zero.
    let funder_floor = rent.minimum_balance(funder.data_len());
    let funded = match funder.lamports().checked_sub(shortfall) {
        Some(0) => true,
        Some(remaining) => remaining >= funder_floor,
        None => false,
    };
    if !funded {
        msg!(
            "Funder holds {} lamports, allocation needs {} plus {} to stay rent exempt",
            funder.lamports(),
            shortfall,
            funder_floor
        );
        return Err(EchoError::InsufficientFunds.into());
    }

    if target.lamports() == 0 {
        invoke_signed(
            &system_instruction::create_account(
                funder.key,
                target.key,
                required_lamports,
                space as u64,
                program_id,
            ),
            &[funder.clone(), target.clone(), system_program_account.clone()],
            signer_seeds,
        )?;
    } else {
        // Pre-funded address: top up, then allocate and assign in place.
        if shortfall > 0 {
            invoke(
                &system_instruction::transfer(funder.key, target.key, shortfall),
                &[funder.clone(), target.clone(), system_program_account.clone()],
            )?;
        }
        invoke_signed(
            &system_instruction::allocate(target.key, space as u64),
            &[target.clone(), system_program_account.clone()],
            signer_seeds,
        )?;
        invoke_signed(
            &system_instruction::assign(target.key, program_id),
            &[target.clone(), system_program_account.clone()],
            signer_seeds,
        )?;
    }
    Ok(())
}

fn check_owner(program_id: &Pubkey, account: &AccountInfo) -> ProgramResult {
    if account.owner != program_id {
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

// ============================================================================
// Echo buffer
// ============================================================================

fn process_initialize_echo(program_id: &Pubkey, accounts: &[AccountInfo], capacity: u64) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let buffer_account = next_account_info(account_info_iter)?;
    let funder = next_account_info(account_info_iter)?;
    let system_program_account = next_account_info(account_info_iter)?;

    let space = EchoBuffer::space(capacity)?;
    create_buffer_account(program_id, buffer_account, funder, system_program_account, space, &[])?;

    let mut data = buffer_account.try_borrow_mut_data()?;
    EchoBuffer::initialize(&mut data, capacity)?;
    msg!("Initialized echo buffer with capacity {}", capacity);
    Ok(())
}

fn process_echo(program_id: &Pubkey, accounts: &[AccountInfo], payload: &[u8]) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let buffer_account = next_account_info(account_info_iter)?;
    check_owner(program_id, buffer_account)?;

    let mut data = buffer_account.try_borrow_mut_data()?;
    let mut echo_buffer = EchoBuffer::load(&data)?;
    buffer::write(&mut echo_buffer, payload)?;
    echo_buffer.store(&mut data)?;

    msg!("Echoed {} of {} bytes", payload.len(), echo_buffer.capacity);
    Ok(())
}

// ============================================================================
// Zero-copy echo buffer
// ============================================================================

fn process_zero_copy_echo(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    capacity: u64,
    payload: &[u8],
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let buffer_account = next_account_info(account_info_iter)?;
    let funder = next_account_info(account_info_iter)?;
    let system_program_account = next_account_info(account_info_iter)?;

    let space = ZeroCopyEchoBuffer::space(capacity)?;
    ensure_fits(capacity as usize, payload.len())?;
    create_buffer_account(program_id, buffer_account, funder, system_program_account, space, &[])?;

    let mut data = buffer_account.try_borrow_mut_data()?;
    let mut zero_copy_buffer = ZeroCopyEchoBuffer::initialize(&mut data, capacity)?;
    buffer::write(&mut zero_copy_buffer, payload)?;

    msg!("Zero-copy echoed {} of {} bytes", payload.len(), capacity);
    Ok(())
}

fn process_zero_copy_echo_write(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    payload: &[u8],
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let buffer_account = next_account_info(account_info_iter)?;
    check_owner(program_id, buffer_account)?;

    let mut data = buffer_account.try_borrow_mut_data()?;
    let mut zero_copy_buffer = ZeroCopyEchoBuffer::load_mut(&mut data)?;
    buffer::write(&mut zero_copy_buffer, payload)?;

    msg!("Zero-copy echoed {} of {} bytes", payload.len(), zero_copy_buffer.header.capacity);
    Ok(())
}

// ============================================================================
// Authorized buffer
// ============================================================================

fn process_initialize_authorized_echo(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    buffer_seed: u64,
    buffer_size: u64,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let authorized_buffer = next_account_info(account_info_iter)?;
    let authority = next_account_info(account_info_iter)?;
    let system_program_account = next_account_info(account_info_iter)?;

    if !authority.is_signer {
        return Err(EchoError::Unauthorized.into());
    }

    let (expected_pda, bump) =
        pda::find_authorized_buffer_address(program_id, authority.key, buffer_seed)?;
    if authorized_buffer.key != &expected_pda {
        msg!("Invalid PDA for authorized buffer.");
        return Err(EchoError::InvalidSeed.into());
    }

    let space = AuthorizedBuffer::space(buffer_size)?;
    let seed_bytes = buffer_seed.to_le_bytes();
    let signer_seeds: &[&[u8]] = &[AUTHORIZED_BUFFER_SEED, authority.key.as_ref(), &seed_bytes, &[bump]];
    create_buffer_account(
        program_id,
        authorized_buffer,
        authority,
        system_program_account,
        space,
        &[signer_seeds],
    )?;

    let mut data = authorized_buffer.try_borrow_mut_data()?;
    AuthorizedBuffer::initialize(&mut data, authority.key, buffer_seed, buffer_size, bump)?;

    msg!("Initialized authorized buffer seed {} size {}", buffer_seed, buffer_size);
    Ok(())
}

fn process_authorized_echo(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    buffer_seed: u64,
    payload: &[u8],
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let authorized_buffer = next_account_info(account_info_iter)?;
    let authority = next_account_info(account_info_iter)?;
    check_owner(program_id, authorized_buffer)?;

    let mut data = authorized_buffer.try_borrow_mut_data()?;
    let mut target = AuthorizedBuffer::load_mut(&mut data)?;

    if !authority.is_signer || target.header.authority != authority.key.to_bytes() {
        msg!("Signer {} is not the buffer authority", authority.key);
        return Err(EchoError::Unauthorized.into());
    }
    if target.header.buffer_seed != buffer_seed {
        return Err(EchoError::InvalidSeed.into());
    }
    let expected_pda = pda::create_authorized_buffer_address(
        program_id,
        authority.key,
        buffer_seed,
        target.header.bump,
    )?;
    if authorized_buffer.key != &expected_pda {
        msg!("Invalid PDA for authorized buffer.");
        return Err(EchoError::InvalidSeed.into());
    }

    buffer::write(&mut target, payload)?;

    msg!("Authorized echoed {} of {} bytes", payload.len(), target.header.buffer_size);
    Ok(())
}
