use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use solana_sdk::signature::{Keypair, Signer};

#[derive(Args)]
pub struct GenerateKeysArgs {
    /// Output path for the keypair file
    #[arg(long, short = 'o', default_value = "./echo-keys/payer.json")]
    output: PathBuf,

    /// Overwrite an existing keypair file
    #[arg(long)]
    force: bool,
}

pub fn execute(args: GenerateKeysArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!("{:?} already exists, pass --force to overwrite", args.output);
    }
    if let Some(parent) = args.output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }

    let keypair = Keypair::new();
    let pubkey = keypair.pubkey();

    // Solana CLI compatible format: JSON array of the 64 keypair bytes
    let keypair_bytes: Vec<u8> = keypair.to_bytes().to_vec();
    let json = serde_json::to_string(&keypair_bytes)?;
    fs::write(&args.output, json)
        .with_context(|| format!("Failed to write keypair to {:?}", args.output))?;

    println!("Generated keypair:");
    println!("  Pubkey (base58): {}", pubkey);
    println!("  Pubkey (hex):    {}", hex::encode(pubkey.to_bytes()));
    println!("  Saved to: {:?}", args.output);
    println!("\nTo fund it on a local validator, use: solana airdrop 2 {} --url <RPC_URL>", pubkey);

    Ok(())
}
