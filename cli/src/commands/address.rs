use anyhow::Result;
use clap::Args;
use echo_client::find_authorized_buffer_address;
use solana_sdk::signature::Signer;

use super::{load_keypair, parse_pubkey, GlobalArgs};

#[derive(Args)]
pub struct AddressArgs {
    /// Buffer seed
    #[arg(long, short = 's')]
    seed: u64,

    /// Authority address (defaults to the payer keypair)
    #[arg(long, short = 'a')]
    authority: Option<String>,
}

pub fn execute(global: &GlobalArgs, args: AddressArgs) -> Result<()> {
    let authority = match &args.authority {
        Some(authority) => parse_pubkey(authority)?,
        None => load_keypair(global.keypair.clone())?.pubkey(),
    };
    let program_id = global.program_id()?;
    let (address, bump) = find_authorized_buffer_address(&program_id, &authority, args.seed)?;

    println!("Authorized buffer address:");
    println!("  Address:   {}", address);
    println!("  Bump:      {}", bump);
    println!("  Authority: {}", authority);
    println!("  Seed:      {}", args.seed);
    Ok(())
}
