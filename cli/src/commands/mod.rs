pub mod address;
pub mod authorized;
pub mod echo;
pub mod generate_keys;
pub mod show;
pub mod zero_copy;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use echo_client::{constants::ECHO_PROGRAM_ID, EchoClient, EchoClientConfigBuilder};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair},
};

/// Options shared by every command.
pub struct GlobalArgs {
    pub rpc_url: String,
    pub keypair: Option<PathBuf>,
    pub program_id: Option<String>,
}

impl GlobalArgs {
    pub fn program_id(&self) -> Result<Pubkey> {
        match &self.program_id {
            Some(id) => id
                .parse()
                .with_context(|| format!("Invalid program ID: {}", id)),
            None => Ok(ECHO_PROGRAM_ID),
        }
    }

    pub fn client(&self) -> Result<EchoClient> {
        let payer = load_keypair(self.keypair.clone())?;
        let config = EchoClientConfigBuilder::new()
            .rpc_url(&self.rpc_url)
            .payer(payer)
            .program_id(self.program_id()?)
            .build()?;
        let client = EchoClient::with_config(config)?;
        tracing::info!(
            rpc_url = %client.config().rpc_url,
            payer = %client.payer_pubkey(),
            program_id = %client.program_id(),
            "Using echo program"
        );
        Ok(client)
    }
}

/// Payload to write, as text or hex.
#[derive(Args)]
pub struct PayloadArgs {
    /// Data to store
    #[arg(long, short = 'd')]
    data: String,

    /// Treat the data as hex-encoded bytes
    #[arg(long)]
    hex: bool,
}

impl PayloadArgs {
    pub fn bytes(&self) -> Result<Vec<u8>> {
        if self.hex {
            let s = self.data.strip_prefix("0x").unwrap_or(&self.data);
            hex::decode(s).with_context(|| format!("Invalid hex string: {}", self.data))
        } else {
            Ok(self.data.as_bytes().to_vec())
        }
    }
}

pub fn parse_pubkey(s: &str) -> Result<Pubkey> {
    s.parse().with_context(|| format!("Invalid address: {}", s))
}

pub fn load_keypair(keypair_path: Option<PathBuf>) -> Result<Keypair> {
    match keypair_path {
        Some(path) => {
            let expanded = shellexpand::tilde(&path.to_string_lossy()).to_string();
            tracing::debug!(path = %expanded, "Loading keypair");
            read_keypair_file(&expanded)
                .map_err(|e| anyhow!("Failed to read keypair from {:?}: {}", path, e))
        }
        None => {
            let default_path = dirs::home_dir()
                .map(|h| h.join(".config/solana/id.json"))
                .context("Could not determine home directory")?;
            read_keypair_file(&default_path).map_err(|e| {
                anyhow!(
                    "Failed to read keypair from {:?}. Use --keypair to specify a path: {}",
                    default_path,
                    e
                )
            })
        }
    }
}

/// Prints stored contents as text when they are valid UTF-8, hex otherwise.
pub fn print_contents(label: &str, data: &[u8]) {
    match std::str::from_utf8(data) {
        Ok(text) => println!("  {}: {:?}", label, text),
        Err(_) => println!("  {} (hex): {}", label, hex::encode(data)),
    }
}
