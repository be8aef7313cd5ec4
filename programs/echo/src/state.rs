use borsh::{BorshDeserialize, BorshSerialize};
use bytemuck::{Pod, Zeroable};
use solana_program::pubkey::Pubkey;

use crate::buffer::{commit_in_place, EchoTarget};
use crate::error::EchoError;

// ============================================================================
// Constants
// ============================================================================

pub const DISCRIMINATOR_SIZE: usize = 8;

pub const ECHO_BUFFER_DISCRIMINATOR: [u8; DISCRIMINATOR_SIZE] = *b"echo_buf";
pub const ZERO_COPY_ECHO_BUFFER_DISCRIMINATOR: [u8; DISCRIMINATOR_SIZE] = *b"echo_zcb";
pub const AUTHORIZED_BUFFER_DISCRIMINATOR: [u8; DISCRIMINATOR_SIZE] = *b"auth_buf";

/// Largest account a single instruction may allocate through the system program.
pub const MAX_PERMITTED_DATA_INCREASE: usize = 10_240;

fn checked_space(fixed_size: usize, capacity: u64) -> Result<usize, EchoError> {
    let capacity = usize::try_from(capacity).map_err(|_| EchoError::CapacityTooLarge)?;
    let space = fixed_size
        .checked_add(capacity)
        .ok_or(EchoError::CapacityTooLarge)?;
    if space > MAX_PERMITTED_DATA_INCREASE {
        return Err(EchoError::CapacityTooLarge);
    }
    Ok(space)
}

fn split_header_mut<H: Pod>(data: &mut [u8]) -> Result<(&mut H, &mut [u8]), EchoError> {
    let header_size = std::mem::size_of::<H>();
    if data.len() < header_size {
        return Err(EchoError::InvalidAccountData);
    }
    let (header_bytes, body) = data.split_at_mut(header_size);
    let header = bytemuck::try_from_bytes_mut::<H>(header_bytes)
        .map_err(|_| EchoError::InvalidAccountData)?;
    Ok((header, body))
}

fn read_header<H: Pod>(data: &[u8]) -> Result<(H, &[u8]), EchoError> {
    let header_size = std::mem::size_of::<H>();
    if data.len() < header_size {
        return Err(EchoError::InvalidAccountData);
    }
    let (header_bytes, body) = data.split_at(header_size);
    Ok((bytemuck::pod_read_unaligned(header_bytes), body))
}

fn stored_len(len: u64, capacity: usize) -> Result<usize, EchoError> {
    let len = usize::try_from(len).map_err(|_| EchoError::InvalidAccountData)?;
    if len > capacity {
        return Err(EchoError::InvalidAccountData);
    }
    Ok(len)
}

// ============================================================================
// EchoBuffer
// ============================================================================

/// Copy-based buffer. The whole account body is deserialized on load and
/// re-serialized on store.
///
/// Layout: `discriminator ++ borsh(capacity: u64, data: Vec<u8>)`, zero-filled
/// up to [`EchoBuffer::space`].
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct EchoBuffer {
    pub capacity: u64,
    pub data: Vec<u8>,
}

impl EchoBuffer {
    /// Discriminator, capacity and the borsh length prefix of `data`.
    pub const FIXED_SIZE: usize = DISCRIMINATOR_SIZE + 8 + 4;

    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            data: Vec::new(),
        }
    }

    pub fn space(capacity: u64) -> Result<usize, EchoError> {
        checked_space(Self::FIXED_SIZE, capacity)
    }

    pub fn load(account_data: &[u8]) -> Result<Self, EchoError> {
        if account_data.len() < Self::FIXED_SIZE
            || account_data[..DISCRIMINATOR_SIZE] != ECHO_BUFFER_DISCRIMINATOR
        {
            return Err(EchoError::InvalidAccountData);
        }
        let mut body = &account_data[DISCRIMINATOR_SIZE..];
        let buffer =
            Self::deserialize(&mut body).map_err(|_| EchoError::InvalidAccountData)?;

        if Self::space(buffer.capacity)? != account_data.len()
            || buffer.data.len() as u64 > buffer.capacity
        {
            return Err(EchoError::InvalidAccountData);
        }
        Ok(buffer)
    }

    /// Writes the buffer over freshly allocated account bytes. The account must
    /// not carry a discriminator yet.
    pub fn initialize(account_data: &mut [u8], capacity: u64) -> Result<Self, EchoError> {
        if account_data.len() != Self::space(capacity)? {
            return Err(EchoError::InvalidAccountData);
        }
        if account_data[..DISCRIMINATOR_SIZE] != [0u8; DISCRIMINATOR_SIZE] {
            return Err(EchoError::DuplicateAccount);
        }
        let buffer = Self::new(capacity);
        buffer.store(account_data)?;
        Ok(buffer)
    }

    pub fn store(&self, account_data: &mut [u8]) -> Result<(), EchoError> {
        let body = self
            .try_to_vec()
            .map_err(|_| EchoError::InvalidAccountData)?;
        let end = DISCRIMINATOR_SIZE + body.len();
        if end > account_data.len() {
            return Err(EchoError::Overflow);
        }
        account_data[..DISCRIMINATOR_SIZE].copy_from_slice(&ECHO_BUFFER_DISCRIMINATOR);
        account_data[DISCRIMINATOR_SIZE..end].copy_from_slice(&body);
        account_data[end..].fill(0);
        Ok(())
    }
}

impl EchoTarget for EchoBuffer {
    fn capacity(&self) -> usize {
        self.capacity as usize
    }

    fn contents(&self) -> &[u8] {
        &self.data
    }

    fn commit(&mut self, payload: &[u8]) {
        self.data.clear();
        self.data.extend_from_slice(payload);
    }
}

// ============================================================================
// ZeroCopyEchoBuffer
// ============================================================================

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct ZeroCopyEchoBufferHeader {
    pub discriminator: [u8; DISCRIMINATOR_SIZE],
    pub capacity: u64,
    pub len: u64,
}

pub const ZERO_COPY_HEADER_SIZE: usize = std::mem::size_of::<ZeroCopyEchoBufferHeader>();

impl ZeroCopyEchoBufferHeader {
    /// Decodes a header and its stored payload from unaligned account bytes.
    pub fn read(account_data: &[u8]) -> Result<(Self, &[u8]), EchoError> {
        let (header, body) = read_header::<Self>(account_data)?;
        if header.discriminator != ZERO_COPY_ECHO_BUFFER_DISCRIMINATOR
            || header.capacity != body.len() as u64
        {
            return Err(EchoError::InvalidAccountData);
        }
        let len = stored_len(header.len, body.len())?;
        Ok((header, &body[..len]))
    }
}

/// In-place view over a zero-copy account: the payload region is mutated
/// directly in the account bytes.
pub struct ZeroCopyEchoBuffer<'a> {
    pub header: &'a mut ZeroCopyEchoBufferHeader,
    pub data: &'a mut [u8],
}

impl<'a> ZeroCopyEchoBuffer<'a> {
    pub fn space(capacity: u64) -> Result<usize, EchoError> {
        checked_space(ZERO_COPY_HEADER_SIZE, capacity)
    }

    pub fn initialize(account_data: &'a mut [u8], capacity: u64) -> Result<Self, EchoError> {
        if account_data.len() != Self::space(capacity)? {
            return Err(EchoError::InvalidAccountData);
        }
        let (header, data) = split_header_mut::<ZeroCopyEchoBufferHeader>(account_data)?;
        if header.discriminator != [0u8; DISCRIMINATOR_SIZE] {
            return Err(EchoError::DuplicateAccount);
        }
        header.discriminator = ZERO_COPY_ECHO_BUFFER_DISCRIMINATOR;
        header.capacity = capacity;
        header.len = 0;
        Ok(Self { header, data })
    }

    pub fn load_mut(account_data: &'a mut [u8]) -> Result<Self, EchoError> {
        let (header, data) = split_header_mut::<ZeroCopyEchoBufferHeader>(account_data)?;
        if header.discriminator != ZERO_COPY_ECHO_BUFFER_DISCRIMINATOR
            || header.capacity != data.len() as u64
        {
            return Err(EchoError::InvalidAccountData);
        }
        stored_len(header.len, data.len())?;
        Ok(Self { header, data })
    }
}

impl EchoTarget for ZeroCopyEchoBuffer<'_> {
    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn contents(&self) -> &[u8] {
        &self.data[..self.header.len as usize]
    }

    fn commit(&mut self, payload: &[u8]) {
        commit_in_place(self.data, &mut self.header.len, payload);
    }
}

// ============================================================================
// AuthorizedBuffer
// ============================================================================

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct AuthorizedBufferHeader {
    pub discriminator: [u8; DISCRIMINATOR_SIZE],
    pub authority: [u8; 32],
    pub buffer_seed: u64,
    pub buffer_size: u64,
    pub len: u64,
    pub bump: u8,
    pub _padding: [u8; 7],
}

pub const AUTHORIZED_HEADER_SIZE: usize = std::mem::size_of::<AuthorizedBufferHeader>();

impl AuthorizedBufferHeader {
    pub fn authority(&self) -> Pubkey {
        Pubkey::new_from_array(self.authority)
    }

    pub fn read(account_data: &[u8]) -> Result<(Self, &[u8]), EchoError> {
        let (header, body) = read_header::<Self>(account_data)?;
        if header.discriminator != AUTHORIZED_BUFFER_DISCRIMINATOR
            || header.buffer_size != body.len() as u64
        {
            return Err(EchoError::InvalidAccountData);
        }
        let len = stored_len(header.len, body.len())?;
        Ok((header, &body[..len]))
    }
}

pub struct AuthorizedBuffer<'a> {
    pub header: &'a mut AuthorizedBufferHeader,
    pub data: &'a mut [u8],
}

impl<'a> AuthorizedBuffer<'a> {
    pub fn space(buffer_size: u64) -> Result<usize, EchoError> {
        checked_space(AUTHORIZED_HEADER_SIZE, buffer_size)
    }

    pub fn initialize(
        account_data: &'a mut [u8],
        authority: &Pubkey,
        buffer_seed: u64,
        buffer_size: u64,
        bump: u8,
    ) -> Result<Self, EchoError> {
        if account_data.len() != Self::space(buffer_size)? {
            return Err(EchoError::InvalidAccountData);
        }
        let (header, data) = split_header_mut::<AuthorizedBufferHeader>(account_data)?;
        if header.discriminator != [0u8; DISCRIMINATOR_SIZE] {
            return Err(EchoError::DuplicateAccount);
        }
        *header = AuthorizedBufferHeader {
            discriminator: AUTHORIZED_BUFFER_DISCRIMINATOR,
            authority: authority.to_bytes(),
            buffer_seed,
            buffer_size,
            len: 0,
            bump,
            _padding: [0u8; 7],
        };
        Ok(Self { header, data })
    }

    pub fn load_mut(account_data: &'a mut [u8]) -> Result<Self, EchoError> {
        let (header, data) = split_header_mut::<AuthorizedBufferHeader>(account_data)?;
        if header.discriminator != AUTHORIZED_BUFFER_DISCRIMINATOR
            || header.buffer_size != data.len() as u64
        {
            return Err(EchoError::InvalidAccountData);
        }
        stored_len(header.len, data.len())?;
        Ok(Self { header, data })
    }
}

impl EchoTarget for AuthorizedBuffer<'_> {
    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn contents(&self) -> &[u8] {
        &self.data[..self.header.len as usize]
    }

    fn commit(&mut self, payload: &[u8]) {
        commit_in_place(self.data, &mut self.header.len, payload);
    }
}
