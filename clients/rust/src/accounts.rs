//! Decoded views of echo buffer accounts.
//!
//! Each decoder checks the kind discriminator and the capacity recorded in the
//! account against the account size before exposing any content.

use echo_program::state::{AuthorizedBufferHeader, EchoBuffer, ZeroCopyEchoBufferHeader};
use solana_sdk::pubkey::Pubkey;

use crate::errors::EchoClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoBufferAccount {
    pub address: Pubkey,
    pub capacity: u64,
    pub data: Vec<u8>,
}

impl EchoBufferAccount {
    pub fn decode(address: Pubkey, account_data: &[u8]) -> Result<Self, EchoClientError> {
        let buffer = EchoBuffer::load(account_data)
            .map_err(|e| EchoClientError::invalid_account(address, e))?;
        Ok(Self {
            address,
            capacity: buffer.capacity,
            data: buffer.data,
        })
    }

    pub fn as_utf8(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroCopyEchoBufferAccount {
    pub address: Pubkey,
    pub capacity: u64,
    pub data: Vec<u8>,
}

impl ZeroCopyEchoBufferAccount {
    pub fn decode(address: Pubkey, account_data: &[u8]) -> Result<Self, EchoClientError> {
        let (header, contents) = ZeroCopyEchoBufferHeader::read(account_data)
            .map_err(|e| EchoClientError::invalid_account(address, e))?;
        Ok(Self {
            address,
            capacity: header.capacity,
            data: contents.to_vec(),
        })
    }

    pub fn as_utf8(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedBufferAccount {
    pub address: Pubkey,
    pub authority: Pubkey,
    pub buffer_seed: u64,
    pub buffer_size: u64,
    pub bump: u8,
    pub data: Vec<u8>,
}

impl AuthorizedBufferAccount {
    pub fn decode(address: Pubkey, account_data: &[u8]) -> Result<Self, EchoClientError> {
        let (header, contents) = AuthorizedBufferHeader::read(account_data)
            .map_err(|e| EchoClientError::invalid_account(address, e))?;
        Ok(Self {
            address,
            authority: header.authority(),
            buffer_seed: header.buffer_seed,
            buffer_size: header.buffer_size,
            bump: header.bump,
            data: contents.to_vec(),
        })
    }

    pub fn as_utf8(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}
