pub mod test_client;

use echo_program::error::EchoError;
use echo_program::processor::process_instruction as echo_processor;
use rand::{distributions::Alphanumeric, Rng};
use solana_program_test::{processor, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::TransactionError,
};
use test_client::TestEchoClient;

pub struct EchoTestContext {
    pub context: ProgramTestContext,
    pub program_id: Pubkey,
    pub client: TestEchoClient,
}

impl EchoTestContext {
    pub async fn new() -> Self {
        let program_id = echo_program::ID;

        let mut pt = ProgramTest::default();
        pt.add_program("echo_program", program_id, processor!(echo_processor));

        let context = pt.start_with_context().await;

        let client = TestEchoClient {
            client: context.banks_client.clone(),
            payer: Keypair::from_bytes(&context.payer.to_bytes()).unwrap(),
            program_id,
        };

        Self {
            context,
            program_id,
            client,
        }
    }

    pub fn payer_pubkey(&self) -> Pubkey {
        self.context.payer.pubkey()
    }
}

/// The transaction error behind a failed submission, whether it failed in
/// preflight simulation or on execution.
pub fn transaction_error(err: &BanksClientError) -> Option<&TransactionError> {
    match err {
        BanksClientError::TransactionError(e) => Some(e),
        BanksClientError::SimulationError { err, .. } => Some(err),
        _ => None,
    }
}

/// The echo program error a failed submission carries, if any.
pub fn echo_error(err: &BanksClientError) -> Option<EchoError> {
    transaction_error(err).and_then(echo_client::errors::echo_error_from_transaction_error)
}

pub fn random_payload(len: usize) -> Vec<u8> {
    rand::thread_rng().sample_iter(&Alphanumeric).take(len).collect()
}
