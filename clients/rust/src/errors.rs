//! Error types for the echo client.
//!
//! Custom program errors are decoded back into [`EchoError`] so callers can
//! match on overflow, authorization and duplicate-account failures directly.

use echo_program::error::EchoError;
use solana_client::client_error::ClientError;
use solana_sdk::{instruction::InstructionError, transaction::TransactionError};
use thiserror::Error;

/// Main error type for echo client operations.
#[derive(Error, Debug)]
pub enum EchoClientError {
    // Network Errors
    #[error("RPC error: {0}")]
    Rpc(ClientError),

    #[error("Confirmation timeout after {timeout_ms}ms")]
    ConfirmationTimeout { timeout_ms: u64 },

    // Program Errors
    #[error("Program error: {0}")]
    Program(EchoError),

    // Account Errors
    #[error("Account not found: {address}")]
    AccountNotFound { address: String },

    #[error("Invalid account {address}: {reason}")]
    InvalidAccount { address: String, reason: String },

    // Input Validation Errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Configuration Errors
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    // Internal Errors
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

/// Extracts an echo program error from a failed transaction, if that is what
/// made it fail.
pub fn echo_error_from_transaction_error(error: &TransactionError) -> Option<EchoError> {
    match error {
        TransactionError::InstructionError(_, InstructionError::Custom(code)) => {
            EchoError::from_code(*code)
        }
        _ => None,
    }
}

impl From<ClientError> for EchoClientError {
    fn from(e: ClientError) -> Self {
        let program_error = e
            .get_transaction_error()
            .as_ref()
            .and_then(echo_error_from_transaction_error);
        match program_error {
            Some(program_error) => EchoClientError::Program(program_error),
            None => EchoClientError::Rpc(e),
        }
    }
}

impl EchoClientError {
    /// Check if this error is retryable.
    ///
    /// Only transport failures are retried. A transaction that reached the
    /// program and failed there failed as a whole and will fail again.
    pub fn is_retryable(&self) -> bool {
        match self {
            EchoClientError::Rpc(e) => e.get_transaction_error().is_none(),
            EchoClientError::ConfirmationTimeout { .. } => true,
            _ => false,
        }
    }

    /// Get a retry hint in milliseconds, if available.
    pub fn retry_hint_ms(&self) -> Option<u64> {
        match self {
            EchoClientError::ConfirmationTimeout { .. } => Some(2000),
            _ => None,
        }
    }

    /// The program error behind this failure, if any.
    pub fn program_error(&self) -> Option<EchoError> {
        match self {
            EchoClientError::Program(e) => Some(*e),
            _ => None,
        }
    }

    /// Categorize the error for logging.
    pub fn category(&self) -> ErrorCategory {
        match self {
            EchoClientError::Rpc(e) if e.get_transaction_error().is_some() => {
                ErrorCategory::Transaction
            }
            EchoClientError::Rpc(_) => ErrorCategory::Network,
            EchoClientError::ConfirmationTimeout { .. } => ErrorCategory::Transaction,
            EchoClientError::Program(_) => ErrorCategory::Program,
            EchoClientError::AccountNotFound { .. } | EchoClientError::InvalidAccount { .. } => {
                ErrorCategory::Account
            }
            EchoClientError::InvalidInput(_) => ErrorCategory::Validation,
            EchoClientError::InvalidConfig { .. } => ErrorCategory::Config,
            EchoClientError::Internal(_) => ErrorCategory::Internal,
        }
    }

    pub fn invalid_account(address: impl ToString, reason: impl ToString) -> Self {
        EchoClientError::InvalidAccount {
            address: address.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Error category for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// RPC transport failures and timeouts
    Network,
    /// The transaction was processed and rejected by the runtime
    Transaction,
    /// The echo program rejected the operation
    Program,
    /// Missing or undecodable accounts
    Account,
    /// Configuration errors
    Config,
    /// Input validation errors
    Validation,
    /// Internal errors (unexpected failures)
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Network => write!(f, "network"),
            ErrorCategory::Transaction => write!(f, "transaction"),
            ErrorCategory::Program => write!(f, "program"),
            ErrorCategory::Account => write!(f, "account"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Internal => write!(f, "internal"),
        }
    }
}

/// Result type alias for echo client operations.
pub type EchoClientResult<T> = Result<T, EchoClientError>;
