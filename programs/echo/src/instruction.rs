use bytemuck::{Pod, Zeroable};

use crate::error::EchoError;

pub const ECHO_INSTRUCTION_INITIALIZE_ECHO: u8 = 0;
pub const ECHO_INSTRUCTION_ECHO: u8 = 1;
pub const ECHO_INSTRUCTION_ZERO_COPY_ECHO: u8 = 2;
pub const ECHO_INSTRUCTION_ZERO_COPY_ECHO_WRITE: u8 = 3;
pub const ECHO_INSTRUCTION_INITIALIZE_AUTHORIZED_ECHO: u8 = 4;
pub const ECHO_INSTRUCTION_AUTHORIZED_ECHO: u8 = 5;

/// Tag byte plus padding so the fixed data that follows starts 8-byte aligned.
pub const INSTRUCTION_HEADER_SIZE: usize = 8;

#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct CapacityInstructionData {
    pub capacity: u64,
}

#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct InitializeAuthorizedEchoInstructionData {
    pub buffer_seed: u64,
    pub buffer_size: u64,
}

#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct AuthorizedEchoInstructionData {
    pub buffer_seed: u64,
}

/// Decoded instruction. Payloads borrow from the instruction data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EchoInstruction<'a> {
    /// Accounts: `[writable, signer] buffer`, `[writable, signer] funder`, `[] system_program`
    InitializeEcho { capacity: u64 },
    /// Accounts: `[writable] buffer`
    Echo { payload: &'a [u8] },
    /// Accounts: `[writable, signer] buffer`, `[writable, signer] funder`, `[] system_program`
    ZeroCopyEcho { capacity: u64, payload: &'a [u8] },
    /// Accounts: `[writable] buffer`
    ZeroCopyEchoWrite { payload: &'a [u8] },
    /// Accounts: `[writable] authorized_buffer`, `[writable, signer] authority`, `[] system_program`
    InitializeAuthorizedEcho { buffer_seed: u64, buffer_size: u64 },
    /// Accounts: `[writable] authorized_buffer`, `[signer] authority`
    AuthorizedEcho { buffer_seed: u64, payload: &'a [u8] },
}

pub fn gen_aligned_instruction(instruction_discriminator: u8, data_struct_bytes: &[u8]) -> Vec<u8> {
    let mut data = vec![instruction_discriminator; INSTRUCTION_HEADER_SIZE];
    data.extend_from_slice(data_struct_bytes);
    data
}

fn split_fixed<T: Pod>(data: &[u8]) -> Result<(T, &[u8]), EchoError> {
    let size = std::mem::size_of::<T>();
    if data.len() < size {
        return Err(EchoError::InvalidInstruction);
    }
    let (fixed, tail) = data.split_at(size);
    Ok((bytemuck::pod_read_unaligned(fixed), tail))
}

fn exact_fixed<T: Pod>(data: &[u8]) -> Result<T, EchoError> {
    match split_fixed::<T>(data)? {
        (fixed, []) => Ok(fixed),
        _ => Err(EchoError::InvalidInstruction),
    }
}

impl<'a> EchoInstruction<'a> {
    pub fn unpack(instruction_data: &'a [u8]) -> Result<Self, EchoError> {
        if instruction_data.len() < INSTRUCTION_HEADER_SIZE {
            return Err(EchoError::InvalidInstruction);
        }
        let discriminator = instruction_data[0];
        let data = &instruction_data[INSTRUCTION_HEADER_SIZE..];

        Ok(match discriminator {
            ECHO_INSTRUCTION_INITIALIZE_ECHO => {
                let fixed: CapacityInstructionData = exact_fixed(data)?;
                Self::InitializeEcho { capacity: fixed.capacity }
            }
            ECHO_INSTRUCTION_ECHO => Self::Echo { payload: data },
            ECHO_INSTRUCTION_ZERO_COPY_ECHO => {
                let (fixed, payload) = split_fixed::<CapacityInstructionData>(data)?;
                Self::ZeroCopyEcho { capacity: fixed.capacity, payload }
            }
            ECHO_INSTRUCTION_ZERO_COPY_ECHO_WRITE => Self::ZeroCopyEchoWrite { payload: data },
            ECHO_INSTRUCTION_INITIALIZE_AUTHORIZED_ECHO => {
                let fixed: InitializeAuthorizedEchoInstructionData = exact_fixed(data)?;
                Self::InitializeAuthorizedEcho {
                    buffer_seed: fixed.buffer_seed,
                    buffer_size: fixed.buffer_size,
                }
            }
            ECHO_INSTRUCTION_AUTHORIZED_ECHO => {
                let (fixed, payload) = split_fixed::<AuthorizedEchoInstructionData>(data)?;
                Self::AuthorizedEcho { buffer_seed: fixed.buffer_seed, payload }
            }
            _ => return Err(EchoError::InvalidInstruction),
        })
    }

    pub fn pack(&self) -> Vec<u8> {
        match *self {
            Self::InitializeEcho { capacity } => gen_aligned_instruction(
                ECHO_INSTRUCTION_INITIALIZE_ECHO,
                bytemuck::bytes_of(&CapacityInstructionData { capacity }),
            ),
            Self::Echo { payload } => gen_aligned_instruction(ECHO_INSTRUCTION_ECHO, payload),
            Self::ZeroCopyEcho { capacity, payload } => {
                let mut data = gen_aligned_instruction(
                    ECHO_INSTRUCTION_ZERO_COPY_ECHO,
                    bytemuck::bytes_of(&CapacityInstructionData { capacity }),
                );
                data.extend_from_slice(payload);
                data
            }
            Self::ZeroCopyEchoWrite { payload } => {
                gen_aligned_instruction(ECHO_INSTRUCTION_ZERO_COPY_ECHO_WRITE, payload)
            }
            Self::InitializeAuthorizedEcho { buffer_seed, buffer_size } => gen_aligned_instruction(
                ECHO_INSTRUCTION_INITIALIZE_AUTHORIZED_ECHO,
                bytemuck::bytes_of(&InitializeAuthorizedEchoInstructionData {
                    buffer_seed,
                    buffer_size,
                }),
            ),
            Self::AuthorizedEcho { buffer_seed, payload } => {
                let mut data = gen_aligned_instruction(
                    ECHO_INSTRUCTION_AUTHORIZED_ECHO,
                    bytemuck::bytes_of(&AuthorizedEchoInstructionData { buffer_seed }),
                );
                data.extend_from_slice(payload);
                data
            }
        }
    }
}
