use anyhow::Result;
use clap::Args;
use echo_client::EchoApi;

use super::{parse_pubkey, GlobalArgs, PayloadArgs};

#[derive(Args)]
pub struct InitEchoArgs {
    /// Maximum number of bytes the buffer will ever hold
    #[arg(long, short = 'c')]
    capacity: u64,
}

#[derive(Args)]
pub struct EchoArgs {
    /// Echo buffer address
    #[arg(long, short = 'b')]
    buffer: String,

    #[command(flatten)]
    payload: PayloadArgs,
}

#[derive(Args)]
pub struct CreateEchoArgs {
    #[command(flatten)]
    payload: PayloadArgs,
}

pub async fn execute_init(global: &GlobalArgs, args: InitEchoArgs) -> Result<()> {
    let client = global.client()?;
    let (buffer, signature) = client.initialize_echo(args.capacity).await?;

    println!("Echo buffer created:");
    println!("  Address:   {}", buffer);
    println!("  Capacity:  {}", args.capacity);
    println!("  Signature: {}", signature);
    Ok(())
}

pub async fn execute_echo(global: &GlobalArgs, args: EchoArgs) -> Result<()> {
    let buffer = parse_pubkey(&args.buffer)?;
    let payload = args.payload.bytes()?;
    let client = global.client()?;
    let signature = client.echo(buffer, &payload).await?;

    println!("Echoed {} bytes into {}", payload.len(), buffer);
    println!("  Signature: {}", signature);
    Ok(())
}

pub async fn execute_create(global: &GlobalArgs, args: CreateEchoArgs) -> Result<()> {
    let payload = args.payload.bytes()?;
    let client = global.client()?;
    let (buffer, signature) = client.create_echo_buffer(&payload).await?;

    println!("Echo buffer created:");
    println!("  Address:   {}", buffer);
    println!("  Capacity:  {}", payload.len());
    println!("  Signature: {}", signature);
    Ok(())
}
