use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use echo_client::constants::DEFAULT_RPC_URL;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{
    address::AddressArgs,
    authorized::{AuthorizedEchoArgs, InitAuthorizedArgs},
    echo::{CreateEchoArgs, EchoArgs, InitEchoArgs},
    generate_keys::GenerateKeysArgs,
    show::ShowArgs,
    zero_copy::{ZeroCopyEchoArgs, ZeroCopyWriteArgs},
    GlobalArgs,
};

#[derive(Parser)]
#[command(name = "echo-cli")]
#[command(about = "CLI tool for the echo storage program on Solana", long_about = None)]
#[command(version)]
struct Cli {
    /// Solana RPC URL
    #[arg(long, default_value = DEFAULT_RPC_URL, global = true)]
    rpc_url: String,

    /// Path to payer keypair file
    #[arg(long, short = 'k', global = true)]
    keypair: Option<PathBuf>,

    /// Echo program ID (defaults to the built-in program ID)
    #[arg(long, global = true)]
    program_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new keypair file
    GenerateKeys(GenerateKeysArgs),

    /// Create an empty echo buffer with a fixed capacity
    InitEcho(InitEchoArgs),

    /// Overwrite the contents of an existing echo buffer
    Echo(EchoArgs),

    /// Create an echo buffer sized to the data and write it
    CreateEcho(CreateEchoArgs),

    /// Create a zero-copy buffer and write the data into it
    ZeroCopyEcho(ZeroCopyEchoArgs),

    /// Overwrite the contents of an existing zero-copy buffer
    ZeroCopyWrite(ZeroCopyWriteArgs),

    /// Create the authorized buffer for the payer and a seed
    InitAuthorized(InitAuthorizedArgs),

    /// Write to the payer's authorized buffer
    AuthorizedEcho(AuthorizedEchoArgs),

    /// Print the decoded contents of a buffer account
    Show(ShowArgs),

    /// Derive the authorized buffer address for an authority and seed
    Address(AddressArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let global = GlobalArgs {
        rpc_url: cli.rpc_url,
        keypair: cli.keypair,
        program_id: cli.program_id,
    };

    match cli.command {
        Commands::GenerateKeys(args) => commands::generate_keys::execute(args),
        Commands::InitEcho(args) => commands::echo::execute_init(&global, args).await,
        Commands::Echo(args) => commands::echo::execute_echo(&global, args).await,
        Commands::CreateEcho(args) => commands::echo::execute_create(&global, args).await,
        Commands::ZeroCopyEcho(args) => commands::zero_copy::execute_echo(&global, args).await,
        Commands::ZeroCopyWrite(args) => commands::zero_copy::execute_write(&global, args).await,
        Commands::InitAuthorized(args) => commands::authorized::execute_init(&global, args).await,
        Commands::AuthorizedEcho(args) => commands::authorized::execute_echo(&global, args).await,
        Commands::Show(args) => commands::show::execute(&global, args).await,
        Commands::Address(args) => commands::address::execute(&global, args),
    }
}
