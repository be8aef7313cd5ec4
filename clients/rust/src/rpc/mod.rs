//! RPC utilities.
//!
//! - `RetryExecutor` - Exponential backoff retry logic

pub mod retry;

pub use retry::RetryExecutor;
