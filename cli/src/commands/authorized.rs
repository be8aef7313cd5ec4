use anyhow::Result;
use clap::Args;
use echo_client::EchoApi;

use super::{GlobalArgs, PayloadArgs};

#[derive(Args)]
pub struct InitAuthorizedArgs {
    /// Seed distinguishing this buffer among the authority's buffers
    #[arg(long, short = 's')]
    seed: u64,

    /// Maximum number of bytes the buffer will ever hold
    #[arg(long)]
    size: u64,
}

#[derive(Args)]
pub struct AuthorizedEchoArgs {
    /// Seed the buffer was created with
    #[arg(long, short = 's')]
    seed: u64,

    #[command(flatten)]
    payload: PayloadArgs,
}

pub async fn execute_init(global: &GlobalArgs, args: InitAuthorizedArgs) -> Result<()> {
    let client = global.client()?;
    let (address, signature) = client.initialize_authorized_echo(args.seed, args.size).await?;

    println!("Authorized buffer created:");
    println!("  Address:   {}", address);
    println!("  Authority: {}", client.payer_pubkey());
    println!("  Seed:      {}", args.seed);
    println!("  Size:      {}", args.size);
    println!("  Signature: {}", signature);
    Ok(())
}

pub async fn execute_echo(global: &GlobalArgs, args: AuthorizedEchoArgs) -> Result<()> {
    let payload = args.payload.bytes()?;
    let client = global.client()?;
    let (address, _) = client.authorized_buffer_address(args.seed).await?;
    let signature = client.authorized_echo(args.seed, &payload).await?;

    println!("Echoed {} bytes into {}", payload.len(), address);
    println!("  Signature: {}", signature);
    Ok(())
}
