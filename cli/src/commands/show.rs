use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use echo_client::EchoApi;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use super::{parse_pubkey, print_contents, GlobalArgs};

#[derive(Clone, Copy, ValueEnum)]
pub enum BufferKind {
    Echo,
    ZeroCopy,
    Authorized,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Buffer account address
    #[arg(long, short = 'b', required_unless_present = "seed", conflicts_with = "seed")]
    buffer: Option<String>,

    /// Seed of the payer's authorized buffer (implies --kind authorized)
    #[arg(long, short = 's')]
    seed: Option<u64>,

    /// Layout of the buffer account
    #[arg(long, value_enum, default_value = "echo")]
    kind: BufferKind,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct BufferView {
    address: String,
    kind: &'static str,
    capacity: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    authority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    buffer_seed: Option<u64>,
    data_hex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_utf8: Option<String>,
}

pub async fn execute(global: &GlobalArgs, args: ShowArgs) -> Result<()> {
    let client = global.client()?;
    let (address, kind) = match (&args.buffer, args.seed) {
        (_, Some(seed)) => (client.authorized_buffer_address(seed).await?.0, BufferKind::Authorized),
        (Some(buffer), None) => (parse_pubkey(buffer)?, args.kind),
        (None, None) => bail!("either --buffer or --seed is required"),
    };

    let (view, data) = match kind {
        BufferKind::Echo => {
            let account = client.get_echo_buffer(address).await?;
            (buffer_view(address, "echo", account.capacity, None, None, &account.data), account.data)
        }
        BufferKind::ZeroCopy => {
            let account = client.get_zero_copy_echo_buffer(address).await?;
            (buffer_view(address, "zero-copy", account.capacity, None, None, &account.data), account.data)
        }
        BufferKind::Authorized => {
            let account = client.get_authorized_buffer(address).await?;
            (
                buffer_view(
                    address,
                    "authorized",
                    account.buffer_size,
                    Some(account.authority.to_string()),
                    Some(account.buffer_seed),
                    &account.data,
                ),
                account.data,
            )
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("Buffer {} ({}):", address, view.kind);
    println!("  Capacity: {}", view.capacity);
    if let Some(authority) = &view.authority {
        println!("  Authority: {}", authority);
    }
    if let Some(seed) = view.buffer_seed {
        println!("  Seed: {}", seed);
    }
    println!("  Stored: {} bytes", data.len());
    print_contents("Data", &data);
    Ok(())
}

fn buffer_view(
    address: Pubkey,
    kind: &'static str,
    capacity: u64,
    authority: Option<String>,
    buffer_seed: Option<u64>,
    data: &[u8],
) -> BufferView {
    BufferView {
        address: address.to_string(),
        kind,
        capacity,
        authority,
        buffer_seed,
        data_hex: hex::encode(data),
        data_utf8: std::str::from_utf8(data).ok().map(str::to_string),
    }
}
