use echo_client::{
    accounts::{AuthorizedBufferAccount, EchoBufferAccount, ZeroCopyEchoBufferAccount},
    instructions,
};
use solana_program_test::{BanksClient, BanksClientError};
use solana_sdk::{
    account::Account,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_instruction,
    transaction::Transaction,
};

pub struct TestEchoClient {
    pub client: BanksClient,
    pub payer: Keypair,
    pub program_id: Pubkey,
}

impl Clone for TestEchoClient {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            payer: Keypair::from_bytes(&self.payer.to_bytes()).unwrap(),
            program_id: self.program_id,
        }
    }
}

impl TestEchoClient {
    pub async fn send_tx(&self, ixs: &[Instruction], extra_signers: &[&Keypair]) -> Result<(), BanksClientError> {
        let recent_blockhash = self.client.get_latest_blockhash().await?;
        self.send_tx_with_blockhash(ixs, extra_signers, recent_blockhash).await
    }

    /// Waits for a new blockhash first, so an identical instruction list can
    /// be resubmitted as a distinct transaction.
    pub async fn send_tx_fresh(&self, ixs: &[Instruction], extra_signers: &[&Keypair]) -> Result<(), BanksClientError> {
        let last = self.client.get_latest_blockhash().await?;
        let recent_blockhash = self.client.get_new_latest_blockhash(&last).await?;
        self.send_tx_with_blockhash(ixs, extra_signers, recent_blockhash).await
    }

    async fn send_tx_with_blockhash(
        &self,
        ixs: &[Instruction],
        extra_signers: &[&Keypair],
        recent_blockhash: solana_sdk::hash::Hash,
    ) -> Result<(), BanksClientError> {
        let mut signers = vec![&self.payer];
        signers.extend(extra_signers.iter().filter(|s| s.pubkey() != self.payer.pubkey()));
        let tx = Transaction::new_signed_with_payer(ixs, Some(&self.payer.pubkey()), &signers, recent_blockhash);
        self.client.process_transaction(tx).await
    }

    /// Creates and funds a plain system account.
    pub async fn fund(&self, to: &Pubkey, lamports: u64) -> Result<(), BanksClientError> {
        let ix = system_instruction::transfer(&self.payer.pubkey(), to, lamports);
        self.send_tx(&[ix], &[]).await
    }

    pub async fn initialize_echo(&self, buffer: &Keypair, capacity: u64) -> Result<(), BanksClientError> {
        let ix = instructions::initialize_echo(self.program_id, buffer.pubkey(), self.payer.pubkey(), capacity);
        self.send_tx(&[ix], &[buffer]).await
    }

    /// Heap buffer with capacity fixed to the payload length, created and
    /// written in one transaction.
    pub async fn create_echo_buffer(&self, payload: &[u8]) -> Result<Pubkey, BanksClientError> {
        let buffer = Keypair::new();
        let ixs = [
            instructions::initialize_echo(self.program_id, buffer.pubkey(), self.payer.pubkey(), payload.len() as u64),
            instructions::echo(self.program_id, buffer.pubkey(), payload),
        ];
        self.send_tx(&ixs, &[&buffer]).await?;
        Ok(buffer.pubkey())
    }

    pub async fn echo(&self, buffer: Pubkey, payload: &[u8]) -> Result<(), BanksClientError> {
        let ix = instructions::echo(self.program_id, buffer, payload);
        self.send_tx(&[ix], &[]).await
    }

    pub async fn zero_copy_echo(&self, buffer: &Keypair, capacity: u64, payload: &[u8]) -> Result<(), BanksClientError> {
        let ix = instructions::zero_copy_echo(self.program_id, buffer.pubkey(), self.payer.pubkey(), capacity, payload);
        self.send_tx(&[ix], &[buffer]).await
    }

    pub async fn zero_copy_echo_write(&self, buffer: Pubkey, payload: &[u8]) -> Result<(), BanksClientError> {
        let ix = instructions::zero_copy_echo_write(self.program_id, buffer, payload);
        self.send_tx(&[ix], &[]).await
    }

    pub async fn initialize_authorized_echo(
        &self,
        authority: &Keypair,
        buffer_seed: u64,
        buffer_size: u64,
    ) -> Result<Pubkey, BanksClientError> {
        let ix = instructions::initialize_authorized_echo(self.program_id, authority.pubkey(), buffer_seed, buffer_size)
            .expect("derivable address");
        let address = ix.accounts[0].pubkey;
        self.send_tx(&[ix], &[authority]).await?;
        Ok(address)
    }

    pub async fn authorized_echo(&self, authority: &Keypair, buffer_seed: u64, payload: &[u8]) -> Result<(), BanksClientError> {
        let ix = instructions::authorized_echo(self.program_id, authority.pubkey(), buffer_seed, payload)
            .expect("derivable address");
        self.send_tx(&[ix], &[authority]).await
    }

    /// Authorized echo against an explicit address, for probing buffers that
    /// `authority` does not own.
    pub async fn authorized_echo_at(
        &self,
        buffer: Pubkey,
        authority: &Keypair,
        buffer_seed: u64,
        payload: &[u8],
    ) -> Result<(), BanksClientError> {
        let ix = instructions::authorized_echo_at(self.program_id, buffer, authority.pubkey(), buffer_seed, payload);
        self.send_tx(&[ix], &[authority]).await
    }

    pub async fn get_account(&self, address: Pubkey) -> Option<Account> {
        self.client.get_account(address).await.unwrap()
    }

    pub async fn get_echo_buffer(&self, address: Pubkey) -> EchoBufferAccount {
        let account = self.get_account(address).await.expect("echo buffer exists");
        assert_eq!(account.owner, self.program_id);
        EchoBufferAccount::decode(address, &account.data).unwrap()
    }

    pub async fn get_zero_copy_echo_buffer(&self, address: Pubkey) -> ZeroCopyEchoBufferAccount {
        let account = self.get_account(address).await.expect("zero-copy buffer exists");
        assert_eq!(account.owner, self.program_id);
        ZeroCopyEchoBufferAccount::decode(address, &account.data).unwrap()
    }

    pub async fn get_authorized_buffer(&self, address: Pubkey) -> AuthorizedBufferAccount {
        let account = self.get_account(address).await.expect("authorized buffer exists");
        assert_eq!(account.owner, self.program_id);
        AuthorizedBufferAccount::decode(address, &account.data).unwrap()
    }
}
