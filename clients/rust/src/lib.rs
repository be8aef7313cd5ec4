//! Echo Client
//!
//! A Rust client for the echo storage program on Solana.
//!
//! # Features
//!
//! - **Instruction builders** for every echo instruction
//! - **Account decoders** for the three buffer layouts
//! - **Retry logic**: automatic retry with exponential backoff for transient failures
//! - **Typed program errors**: custom program error codes come back as [`EchoError`]
//!
//! # Example
//!
//! ```ignore
//! use echo_client::{EchoApi, EchoClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = EchoClient::new("http://127.0.0.1:8899", &payer_keypair.to_bytes())?;
//!
//!     let (buffer, _) = client.create_echo_buffer(b"echo").await?;
//!     let account = client.get_echo_buffer(buffer).await?;
//!     assert_eq!(account.data, b"echo");
//!
//!     Ok(())
//! }
//! ```

pub mod accounts;
pub mod api;
pub mod client;
pub mod config;
pub mod constants;
pub mod errors;
pub mod instructions;
pub mod rpc;

pub use accounts::{AuthorizedBufferAccount, EchoBufferAccount, ZeroCopyEchoBufferAccount};
pub use api::EchoApi;
pub use client::EchoClient;
pub use config::{ConfigError, EchoClientConfig, EchoClientConfigBuilder, RetryConfig};
pub use errors::{EchoClientError, EchoClientResult, ErrorCategory};

pub use echo_program::error::EchoError;
pub use echo_program::pda::find_authorized_buffer_address;
