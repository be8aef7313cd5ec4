use echo_client::{find_authorized_buffer_address, instructions};
use echo_program::error::EchoError;
use echo_test_utils::{echo_error, EchoTestContext};
use solana_program_test::tokio;
use solana_sdk::signature::{Keypair, Signer};

const SEED: u64 = 42;
const SIZE: u64 = 19;

async fn setup() -> (EchoTestContext, Keypair) {
    let ctx = EchoTestContext::new().await;
    let authority = Keypair::from_bytes(&ctx.context.payer.to_bytes()).unwrap();
    (ctx, authority)
}

#[tokio::test]
async fn test_initialize_and_authorized_echo() {
    let (ctx, authority) = setup().await;

    let address = ctx.client.initialize_authorized_echo(&authority, SEED, SIZE).await.unwrap();
    let (expected, bump) = find_authorized_buffer_address(&ctx.program_id, &authority.pubkey(), SEED).unwrap();
    assert_eq!(address, expected);

    let account = ctx.client.get_authorized_buffer(address).await;
    assert_eq!(account.authority, authority.pubkey());
    assert_eq!(account.buffer_seed, SEED);
    assert_eq!(account.buffer_size, SIZE);
    assert_eq!(account.bump, bump);
    assert!(account.data.is_empty());

    ctx.client.authorized_echo(&authority, SEED, b"authorized echo").await.unwrap();
    let account = ctx.client.get_authorized_buffer(address).await;
    assert_eq!(account.data, b"authorized echo");
    assert_eq!(account.buffer_seed, SEED);
    assert_eq!(account.buffer_size, SIZE);
}

#[tokio::test]
async fn test_wrong_signer_is_unauthorized() {
    let (ctx, authority) = setup().await;
    let address = ctx.client.initialize_authorized_echo(&authority, SEED, SIZE).await.unwrap();
    ctx.client.authorized_echo(&authority, SEED, b"original").await.unwrap();

    let intruder = Keypair::new();
    let err = ctx
        .client
        .authorized_echo_at(address, &intruder, SEED, b"hijacked")
        .await
        .unwrap_err();
    assert_eq!(echo_error(&err), Some(EchoError::Unauthorized));
    assert_eq!(ctx.client.get_authorized_buffer(address).await.data, b"original");
}

#[tokio::test]
async fn test_wrong_seed_is_rejected() {
    let (ctx, authority) = setup().await;
    let address = ctx.client.initialize_authorized_echo(&authority, SEED, SIZE).await.unwrap();

    let err = ctx
        .client
        .authorized_echo_at(address, &authority, SEED + 1, b"payload")
        .await
        .unwrap_err();
    assert_eq!(echo_error(&err), Some(EchoError::InvalidSeed));
    assert!(ctx.client.get_authorized_buffer(address).await.data.is_empty());
}

#[tokio::test]
async fn test_authorized_overflow_keeps_content() {
    let (ctx, authority) = setup().await;
    let address = ctx.client.initialize_authorized_echo(&authority, SEED, SIZE).await.unwrap();
    ctx.client.authorized_echo(&authority, SEED, b"authorized echo").await.unwrap();

    let err = ctx
        .client
        .authorized_echo(&authority, SEED, b"twenty bytes payload")
        .await
        .unwrap_err();
    assert_eq!(echo_error(&err), Some(EchoError::Overflow));
    assert_eq!(ctx.client.get_authorized_buffer(address).await.data, b"authorized echo");
}

#[tokio::test]
async fn test_duplicate_initialize_is_rejected() {
    let (ctx, authority) = setup().await;
    ctx.client.initialize_authorized_echo(&authority, SEED, SIZE).await.unwrap();

    let err = ctx.client.initialize_authorized_echo(&authority, SEED, 32).await.unwrap_err();
    assert_eq!(echo_error(&err), Some(EchoError::DuplicateAccount));

    let ix = instructions::initialize_authorized_echo(ctx.program_id, authority.pubkey(), SEED, SIZE).unwrap();
    let err = ctx.client.send_tx_fresh(&[ix], &[]).await.unwrap_err();
    assert_eq!(echo_error(&err), Some(EchoError::DuplicateAccount));
}

#[tokio::test]
async fn test_same_seed_different_authority() {
    let (ctx, authority) = setup().await;
    let other = Keypair::new();
    ctx.client.fund(&other.pubkey(), 1_000_000_000).await.unwrap();

    let first = ctx.client.initialize_authorized_echo(&authority, SEED, SIZE).await.unwrap();
    let second = ctx.client.initialize_authorized_echo(&other, SEED, SIZE).await.unwrap();
    assert_ne!(first, second);

    ctx.client.authorized_echo(&other, SEED, b"other").await.unwrap();
    assert_eq!(ctx.client.get_authorized_buffer(second).await.data, b"other");
    assert!(ctx.client.get_authorized_buffer(first).await.data.is_empty());
}

#[tokio::test]
async fn test_prefunded_address_is_allocated_in_place() {
    let (ctx, authority) = setup().await;
    let (address, _) = find_authorized_buffer_address(&ctx.program_id, &authority.pubkey(), 7).unwrap();
    ctx.client.fund(&address, 1_000_000).await.unwrap();

    ctx.client.initialize_authorized_echo(&authority, 7, SIZE).await.unwrap();
    let raw = ctx.client.get_account(address).await.unwrap();
    assert_eq!(raw.owner, ctx.program_id);
    let rent = ctx.client.client.get_rent().await.unwrap();
    assert!(raw.lamports >= rent.minimum_balance(raw.data.len()));

    ctx.client.authorized_echo(&authority, 7, b"prefunded").await.unwrap();
    assert_eq!(ctx.client.get_authorized_buffer(address).await.data, b"prefunded");
}

#[tokio::test]
async fn test_unauthenticated_writes_cannot_touch_authorized_buffer() {
    let (ctx, authority) = setup().await;
    let address = ctx.client.initialize_authorized_echo(&authority, SEED, SIZE).await.unwrap();
    ctx.client.authorized_echo(&authority, SEED, b"original").await.unwrap();
    let before = ctx.client.get_account(address).await.unwrap().data;

    let err = ctx.client.echo(address, b"overwrite").await.unwrap_err();
    assert_eq!(echo_error(&err), Some(EchoError::InvalidAccountData));

    let err = ctx.client.zero_copy_echo_write(address, b"overwrite").await.unwrap_err();
    assert_eq!(echo_error(&err), Some(EchoError::InvalidAccountData));

    assert_eq!(ctx.client.get_account(address).await.unwrap().data, before);
    assert_eq!(ctx.client.get_authorized_buffer(address).await.data, b"original");
}

#[tokio::test]
async fn test_authority_key_without_signature_is_unauthorized() {
    let (ctx, _) = setup().await;
    let authority = Keypair::new();
    ctx.client.fund(&authority.pubkey(), 1_000_000_000).await.unwrap();
    let address = ctx.client.initialize_authorized_echo(&authority, SEED, SIZE).await.unwrap();
    ctx.client.authorized_echo(&authority, SEED, b"original").await.unwrap();
    let before = ctx.client.get_account(address).await.unwrap().data;

    // Right authority key, but only the fee payer signs.
    let mut ix = instructions::authorized_echo(ctx.program_id, authority.pubkey(), SEED, b"unsigned").unwrap();
    ix.accounts[1].is_signer = false;
    let err = ctx.client.send_tx(&[ix], &[]).await.unwrap_err();
    assert_eq!(echo_error(&err), Some(EchoError::Unauthorized));

    assert_eq!(ctx.client.get_account(address).await.unwrap().data, before);
}

#[tokio::test]
async fn test_initialize_without_authority_signature_is_unauthorized() {
    let (ctx, _) = setup().await;
    let authority = Keypair::new();
    ctx.client.fund(&authority.pubkey(), 1_000_000_000).await.unwrap();

    let mut ix = instructions::initialize_authorized_echo(ctx.program_id, authority.pubkey(), SEED, SIZE).unwrap();
    let address = ix.accounts[0].pubkey;
    ix.accounts[1].is_signer = false;
    let err = ctx.client.send_tx(&[ix], &[]).await.unwrap_err();
    assert_eq!(echo_error(&err), Some(EchoError::Unauthorized));

    assert!(ctx.client.get_account(address).await.is_none());
}
