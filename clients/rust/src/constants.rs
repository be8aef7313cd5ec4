use solana_sdk::pubkey::Pubkey;

pub const ECHO_PROGRAM_ID: Pubkey = echo_program::ID;

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";
