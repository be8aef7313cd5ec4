//! Main EchoClient implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use solana_client::{client_error::ClientError, nonblocking::rpc_client::RpcClient};
use solana_sdk::{
    account::Account,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};

use crate::{
    accounts::{AuthorizedBufferAccount, EchoBufferAccount, ZeroCopyEchoBufferAccount},
    api::EchoApi,
    config::{EchoClientConfig, EchoClientConfigBuilder},
    errors::EchoClientError,
    instructions,
    rpc::RetryExecutor,
};

/// Client for the echo program.
///
/// # Example
///
/// ```ignore
/// use echo_client::{EchoApi, EchoClient};
///
/// let client = EchoClient::new("http://127.0.0.1:8899", &payer_private_key)?;
/// let (address, _) = client.initialize_authorized_echo(42, 19).await?;
/// client.authorized_echo(42, b"authorized echo").await?;
/// ```
pub struct EchoClient {
    pub(crate) config: EchoClientConfig,
    pub(crate) rpc: Arc<RpcClient>,
    pub(crate) retry_executor: RetryExecutor,
    /// Derived authorized buffer addresses, keyed by buffer seed
    authorized_address_cache: tokio::sync::RwLock<HashMap<u64, (Pubkey, u8)>>,
}

impl EchoClient {
    /// Create a new echo client with minimal configuration.
    ///
    /// # Arguments
    ///
    /// * `rpc_url` - Solana RPC URL
    /// * `payer_private_key` - 64-byte payer keypair
    pub fn new(rpc_url: &str, payer_private_key: &[u8]) -> Result<Self, EchoClientError> {
        let payer = Keypair::from_bytes(payer_private_key).map_err(|e| {
            EchoClientError::InvalidInput(format!("Invalid payer keypair: {}", e))
        })?;

        let config = EchoClientConfigBuilder::new()
            .rpc_url(rpc_url)
            .payer(payer)
            .build()
            .map_err(|e| EchoClientError::InvalidConfig {
                message: e.to_string(),
            })?;

        Self::with_config(config)
    }

    /// Create a new echo client with full configuration.
    pub fn with_config(config: EchoClientConfig) -> Result<Self, EchoClientError> {
        let rpc = Arc::new(RpcClient::new_with_commitment(
            config.rpc_url.clone(),
            config.commitment,
        ));
        let retry_executor = RetryExecutor::new(config.retry.clone());

        Ok(Self {
            config,
            rpc,
            retry_executor,
            authorized_address_cache: tokio::sync::RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &EchoClientConfig {
        &self.config
    }

    pub fn program_id(&self) -> Pubkey {
        self.config.program_id
    }

    /// Get the payer public key. Also the authority of authorized buffers.
    pub fn payer_pubkey(&self) -> Pubkey {
        self.config.payer.pubkey()
    }

    /// Address and bump of the payer's authorized buffer for `buffer_seed`.
    pub async fn authorized_buffer_address(&self, buffer_seed: u64) -> Result<(Pubkey, u8), EchoClientError> {
        {
            let cache = self.authorized_address_cache.read().await;
            if let Some(entry) = cache.get(&buffer_seed) {
                return Ok(*entry);
            }
        }

        let entry = echo_program::pda::find_authorized_buffer_address(
            &self.config.program_id,
            &self.payer_pubkey(),
            buffer_seed,
        )
        .map_err(EchoClientError::Program)?;
        self.authorized_address_cache.write().await.insert(buffer_seed, entry);
        Ok(entry)
    }

    /// Send a transaction and wait for confirmation.
    ///
    /// The transaction is signed once and resubmitted as is. Before each
    /// resubmission its signature status is checked, so a submission that
    /// landed after a timeout is reported as the success it was. It is only
    /// re-signed once its blockhash has expired.
    pub(crate) async fn send_and_confirm(
        &self,
        label: &str,
        instructions: &[Instruction],
        extra_signers: &[&Keypair],
    ) -> Result<Signature, EchoClientError> {
        let tx = tokio::sync::Mutex::new(self.sign_tx(instructions, extra_signers).await?);
        let tx = &tx;

        self.retry_executor
            .execute_with_recovery(
                label,
                move || async move {
                    let mut tx = tx.lock().await;
                    let blockhash_valid = self
                        .rpc
                        .is_blockhash_valid(&tx.message.recent_blockhash, self.config.commitment)
                        .await?;
                    if !blockhash_valid {
                        tracing::debug!(signature = %tx.signatures[0], "Blockhash expired, re-signing");
                        *tx = self.sign_tx(instructions, extra_signers).await?;
                    }
                    self.submit_tx(&tx).await
                },
                move || async move {
                    let signature = tx.lock().await.signatures[0];
                    self.landed(&signature).await
                },
            )
            .await
    }

    async fn sign_tx(
        &self,
        instructions: &[Instruction],
        extra_signers: &[&Keypair],
    ) -> Result<Transaction, EchoClientError> {
        let recent_blockhash = self.rpc.get_latest_blockhash().await?;

        let mut signers: Vec<&Keypair> = vec![self.config.payer.as_ref()];
        signers.extend(extra_signers);

        Ok(Transaction::new_signed_with_payer(
            instructions,
            Some(&self.config.payer.pubkey()),
            &signers,
            recent_blockhash,
        ))
    }

    async fn submit_tx(&self, tx: &Transaction) -> Result<Signature, EchoClientError> {
        let timeout = self.retry_executor.confirmation_timeout();
        match tokio::time::timeout(timeout, self.rpc.send_and_confirm_transaction(tx)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(EchoClientError::ConfirmationTimeout {
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }

    /// `Some(signature)` if the transaction was processed successfully, an
    /// error if it was processed and failed, `None` if it is unknown.
    async fn landed(&self, signature: &Signature) -> Result<Option<Signature>, EchoClientError> {
        match self.rpc.get_signature_status(signature).await? {
            Some(Ok(())) => Ok(Some(*signature)),
            Some(Err(e)) => Err(ClientError::from(e).into()),
            None => Ok(None),
        }
    }

    /// Fetch an account owned by the echo program.
    async fn get_program_account(&self, address: Pubkey) -> Result<Account, EchoClientError> {
        let account = self
            .rpc
            .get_account_with_commitment(&address, self.config.commitment)
            .await?
            .value
            .ok_or_else(|| EchoClientError::AccountNotFound {
                address: address.to_string(),
            })?;

        if account.owner != self.config.program_id {
            return Err(EchoClientError::invalid_account(
                address,
                format!("owned by {}, expected {}", account.owner, self.config.program_id),
            ));
        }
        Ok(account)
    }
}

#[async_trait]
impl EchoApi for EchoClient {
    async fn create_echo_buffer(&self, payload: &[u8]) -> Result<(Pubkey, Signature), EchoClientError> {
        let buffer = Keypair::new();
        let program_id = self.config.program_id;
        let ixs = [
            instructions::initialize_echo(program_id, buffer.pubkey(), self.payer_pubkey(), payload.len() as u64),
            instructions::echo(program_id, buffer.pubkey(), payload),
        ];
        let signature = self.send_and_confirm("create_echo_buffer", &ixs, &[&buffer]).await?;
        tracing::info!(buffer = %buffer.pubkey(), capacity = payload.len(), %signature, "Created echo buffer");
        Ok((buffer.pubkey(), signature))
    }

    async fn initialize_echo(&self, capacity: u64) -> Result<(Pubkey, Signature), EchoClientError> {
        let buffer = Keypair::new();
        let ix = instructions::initialize_echo(
            self.config.program_id,
            buffer.pubkey(),
            self.payer_pubkey(),
            capacity,
        );
        let signature = self.send_and_confirm("initialize_echo", &[ix], &[&buffer]).await?;
        tracing::info!(buffer = %buffer.pubkey(), capacity, %signature, "Initialized echo buffer");
        Ok((buffer.pubkey(), signature))
    }

    async fn echo(&self, buffer: Pubkey, payload: &[u8]) -> Result<Signature, EchoClientError> {
        let ix = instructions::echo(self.config.program_id, buffer, payload);
        let signature = self.send_and_confirm("echo", &[ix], &[]).await?;
        tracing::info!(%buffer, len = payload.len(), %signature, "Echoed");
        Ok(signature)
    }

    async fn zero_copy_echo(&self, payload: &[u8]) -> Result<(Pubkey, Signature), EchoClientError> {
        self.zero_copy_echo_with_capacity(payload.len() as u64, payload).await
    }

    async fn zero_copy_echo_with_capacity(
        &self,
        capacity: u64,
        payload: &[u8],
    ) -> Result<(Pubkey, Signature), EchoClientError> {
        let buffer = Keypair::new();
        let ix = instructions::zero_copy_echo(
            self.config.program_id,
            buffer.pubkey(),
            self.payer_pubkey(),
            capacity,
            payload,
        );
        let signature = self.send_and_confirm("zero_copy_echo", &[ix], &[&buffer]).await?;
        tracing::info!(buffer = %buffer.pubkey(), capacity, len = payload.len(), %signature, "Zero-copy echoed");
        Ok((buffer.pubkey(), signature))
    }

    async fn zero_copy_echo_write(&self, buffer: Pubkey, payload: &[u8]) -> Result<Signature, EchoClientError> {
        let ix = instructions::zero_copy_echo_write(self.config.program_id, buffer, payload);
        let signature = self.send_and_confirm("zero_copy_echo_write", &[ix], &[]).await?;
        tracing::info!(%buffer, len = payload.len(), %signature, "Zero-copy echoed");
        Ok(signature)
    }

    async fn initialize_authorized_echo(
        &self,
        buffer_seed: u64,
        buffer_size: u64,
    ) -> Result<(Pubkey, Signature), EchoClientError> {
        let (address, _) = self.authorized_buffer_address(buffer_seed).await?;
        let ix = instructions::initialize_authorized_echo(
            self.config.program_id,
            self.payer_pubkey(),
            buffer_seed,
            buffer_size,
        )?;
        let signature = self.send_and_confirm("initialize_authorized_echo", &[ix], &[]).await?;
        tracing::info!(%address, buffer_seed, buffer_size, %signature, "Initialized authorized buffer");
        Ok((address, signature))
    }

    async fn authorized_echo(&self, buffer_seed: u64, payload: &[u8]) -> Result<Signature, EchoClientError> {
        let (address, _) = self.authorized_buffer_address(buffer_seed).await?;
        let ix = instructions::authorized_echo_at(
            self.config.program_id,
            address,
            self.payer_pubkey(),
            buffer_seed,
            payload,
        );
        let signature = self.send_and_confirm("authorized_echo", &[ix], &[]).await?;
        tracing::info!(%address, len = payload.len(), %signature, "Authorized echoed");
        Ok(signature)
    }

    async fn get_echo_buffer(&self, address: Pubkey) -> Result<EchoBufferAccount, EchoClientError> {
        let account = self.get_program_account(address).await?;
        EchoBufferAccount::decode(address, &account.data)
    }

    async fn get_zero_copy_echo_buffer(
        &self,
        address: Pubkey,
    ) -> Result<ZeroCopyEchoBufferAccount, EchoClientError> {
        let account = self.get_program_account(address).await?;
        ZeroCopyEchoBufferAccount::decode(address, &account.data)
    }

    async fn get_authorized_buffer(&self, address: Pubkey) -> Result<AuthorizedBufferAccount, EchoClientError> {
        let account = self.get_program_account(address).await?;
        AuthorizedBufferAccount::decode(address, &account.data)
    }
}
