//! API trait for the echo client.
//!
//! Mirrors the program's operation surface. Creation calls return the new
//! buffer address together with the transaction signature.

use async_trait::async_trait;
use solana_sdk::{pubkey::Pubkey, signature::Signature};

use crate::{
    accounts::{AuthorizedBufferAccount, EchoBufferAccount, ZeroCopyEchoBufferAccount},
    errors::EchoClientResult,
};

#[async_trait]
pub trait EchoApi: Send + Sync {
    /// Creates an echo buffer whose capacity is the payload length and writes
    /// the payload, atomically in one transaction.
    async fn create_echo_buffer(&self, payload: &[u8]) -> EchoClientResult<(Pubkey, Signature)>;

    /// Creates an empty echo buffer with a fixed capacity.
    async fn initialize_echo(&self, capacity: u64) -> EchoClientResult<(Pubkey, Signature)>;

    async fn echo(&self, buffer: Pubkey, payload: &[u8]) -> EchoClientResult<Signature>;

    /// Creates a zero-copy buffer sized to the payload and writes it.
    async fn zero_copy_echo(&self, payload: &[u8]) -> EchoClientResult<(Pubkey, Signature)>;

    async fn zero_copy_echo_with_capacity(
        &self,
        capacity: u64,
        payload: &[u8],
    ) -> EchoClientResult<(Pubkey, Signature)>;

    async fn zero_copy_echo_write(&self, buffer: Pubkey, payload: &[u8]) -> EchoClientResult<Signature>;

    /// Creates the authorized buffer derived from the payer and `buffer_seed`.
    async fn initialize_authorized_echo(
        &self,
        buffer_seed: u64,
        buffer_size: u64,
    ) -> EchoClientResult<(Pubkey, Signature)>;

    async fn authorized_echo(&self, buffer_seed: u64, payload: &[u8]) -> EchoClientResult<Signature>;

    async fn get_echo_buffer(&self, address: Pubkey) -> EchoClientResult<EchoBufferAccount>;

    async fn get_zero_copy_echo_buffer(
        &self,
        address: Pubkey,
    ) -> EchoClientResult<ZeroCopyEchoBufferAccount>;

    async fn get_authorized_buffer(&self, address: Pubkey) -> EchoClientResult<AuthorizedBufferAccount>;
}
