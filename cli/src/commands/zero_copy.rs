use anyhow::Result;
use clap::Args;
use echo_client::EchoApi;

use super::{parse_pubkey, GlobalArgs, PayloadArgs};

#[derive(Args)]
pub struct ZeroCopyEchoArgs {
    /// Buffer capacity (defaults to the data length)
    #[arg(long, short = 'c')]
    capacity: Option<u64>,

    #[command(flatten)]
    payload: PayloadArgs,
}

#[derive(Args)]
pub struct ZeroCopyWriteArgs {
    /// Zero-copy buffer address
    #[arg(long, short = 'b')]
    buffer: String,

    #[command(flatten)]
    payload: PayloadArgs,
}

pub async fn execute_echo(global: &GlobalArgs, args: ZeroCopyEchoArgs) -> Result<()> {
    let payload = args.payload.bytes()?;
    let capacity = args.capacity.unwrap_or(payload.len() as u64);
    let client = global.client()?;
    let (buffer, signature) = client.zero_copy_echo_with_capacity(capacity, &payload).await?;

    println!("Zero-copy buffer created:");
    println!("  Address:   {}", buffer);
    println!("  Capacity:  {}", capacity);
    println!("  Stored:    {} bytes", payload.len());
    println!("  Signature: {}", signature);
    Ok(())
}

pub async fn execute_write(global: &GlobalArgs, args: ZeroCopyWriteArgs) -> Result<()> {
    let buffer = parse_pubkey(&args.buffer)?;
    let payload = args.payload.bytes()?;
    let client = global.client()?;
    let signature = client.zero_copy_echo_write(buffer, &payload).await?;

    println!("Echoed {} bytes into {}", payload.len(), buffer);
    println!("  Signature: {}", signature);
    Ok(())
}
