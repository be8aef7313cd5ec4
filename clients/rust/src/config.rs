//! Client configuration.
//!
//! Only the RPC endpoint and the payer are required. The payer funds every
//! allocation, pays fees, and is the authority of authorized buffers created
//! through the client.

use std::sync::Arc;

use solana_sdk::{
    commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Keypair, signer::Signer,
};

use crate::constants::{DEFAULT_RPC_URL, ECHO_PROGRAM_ID};

/// Backoff policy for resubmitting transactions after transport failures.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    /// Upper bound for any single backoff delay
    pub max_delay_ms: u64,
    /// Must be at least 1.0
    pub backoff_multiplier: f64,
    /// How long to wait for one submission to confirm
    pub confirmation_timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 500,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
            confirmation_timeout_ms: 60_000,
        }
    }
}

impl RetryConfig {
    /// A single attempt per operation.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_delay_ms: 0,
            max_delay_ms: 0,
            backoff_multiplier: 1.0,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.backoff_multiplier < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            )));
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err(ConfigError::Invalid(format!(
                "initial_delay_ms ({}) exceeds max_delay_ms ({})",
                self.initial_delay_ms, self.max_delay_ms
            )));
        }
        if self.confirmation_timeout_ms == 0 {
            return Err(ConfigError::Invalid("confirmation_timeout_ms must be positive".to_string()));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct EchoClientConfig {
    pub rpc_url: String,
    pub payer: Arc<Keypair>,
    pub program_id: Pubkey,
    /// Commitment for account reads and transaction confirmation
    pub commitment: CommitmentConfig,
    pub retry: RetryConfig,
}

// Keypairs stay out of logs.
impl std::fmt::Debug for EchoClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EchoClientConfig")
            .field("rpc_url", &self.rpc_url)
            .field("payer", &self.payer.pubkey())
            .field("program_id", &self.program_id)
            .field("commitment", &self.commitment.commitment)
            .field("retry", &self.retry)
            .finish()
    }
}

#[derive(Default)]
pub struct EchoClientConfigBuilder {
    rpc_url: Option<String>,
    payer: Option<Arc<Keypair>>,
    program_id: Option<Pubkey>,
    commitment: Option<CommitmentConfig>,
    retry: Option<RetryConfig>,
}

impl EchoClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder preset for a validator on the default local port.
    pub fn localnet() -> Self {
        Self::new().rpc_url(DEFAULT_RPC_URL)
    }

    pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    pub fn payer(self, keypair: Keypair) -> Self {
        self.payer_arc(Arc::new(keypair))
    }

    /// Shares a payer already held elsewhere.
    pub fn payer_arc(mut self, keypair: Arc<Keypair>) -> Self {
        self.payer = Some(keypair);
        self
    }

    /// Targets a deployment other than [`ECHO_PROGRAM_ID`].
    pub fn program_id(mut self, id: Pubkey) -> Self {
        self.program_id = Some(id);
        self
    }

    pub fn commitment(mut self, commitment: CommitmentConfig) -> Self {
        self.commitment = Some(commitment);
        self
    }

    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = Some(config);
        self
    }

    pub fn build(self) -> Result<EchoClientConfig, ConfigError> {
        let rpc_url = match self.rpc_url {
            Some(url) if url.trim().is_empty() => {
                return Err(ConfigError::Invalid("rpc_url is empty".to_string()))
            }
            Some(url) => url,
            None => return Err(ConfigError::MissingField("rpc_url")),
        };
        let payer = self.payer.ok_or(ConfigError::MissingField("payer"))?;
        let retry = self.retry.unwrap_or_default();
        retry.validate()?;

        Ok(EchoClientConfig {
            rpc_url,
            payer,
            program_id: self.program_id.unwrap_or(ECHO_PROGRAM_ID),
            commitment: self.commitment.unwrap_or_else(CommitmentConfig::confirmed),
            retry,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
