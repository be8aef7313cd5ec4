use echo_client::instructions;
use echo_program::error::EchoError;
use echo_program::state::EchoBuffer;
use echo_test_utils::{echo_error, random_payload, EchoTestContext};
use solana_program_test::tokio;
use solana_sdk::signature::{Keypair, Signer};

#[tokio::test]
async fn test_echo_then_overflow_keeps_content() {
    let ctx = EchoTestContext::new().await;

    let buffer = ctx.client.create_echo_buffer(b"echo").await.unwrap();
    let account = ctx.client.get_echo_buffer(buffer).await;
    assert_eq!(account.capacity, 4);
    assert_eq!(account.data, b"echo");

    let err = ctx.client.echo(buffer, b"echo buffer overwrite").await.unwrap_err();
    assert_eq!(echo_error(&err), Some(EchoError::Overflow));

    let account = ctx.client.get_echo_buffer(buffer).await;
    assert_eq!(account.capacity, 4);
    assert_eq!(account.data, b"echo");
}

#[tokio::test]
async fn test_initialize_then_write_within_capacity() {
    let ctx = EchoTestContext::new().await;
    let buffer = Keypair::new();

    ctx.client.initialize_echo(&buffer, 16).await.unwrap();
    let account = ctx.client.get_echo_buffer(buffer.pubkey()).await;
    assert_eq!(account.capacity, 16);
    assert!(account.data.is_empty());

    ctx.client.echo(buffer.pubkey(), b"sixteen bytes!!!").await.unwrap();
    assert_eq!(ctx.client.get_echo_buffer(buffer.pubkey()).await.data, b"sixteen bytes!!!");

    // Shorter payload replaces the content and the stale tail is cleared.
    ctx.client.echo(buffer.pubkey(), b"short").await.unwrap();
    let raw = ctx.client.get_account(buffer.pubkey()).await.unwrap();
    assert_eq!(ctx.client.get_echo_buffer(buffer.pubkey()).await.data, b"short");
    let used = 8 + 8 + 4 + 5;
    assert!(raw.data[used..].iter().all(|b| *b == 0));
}

#[tokio::test]
async fn test_repeated_echo_is_idempotent() {
    let ctx = EchoTestContext::new().await;
    let buffer = Keypair::new();
    ctx.client.initialize_echo(&buffer, 8).await.unwrap();

    let ix = instructions::echo(ctx.program_id, buffer.pubkey(), b"abc");
    ctx.client.send_tx(&[ix.clone()], &[]).await.unwrap();
    let once = ctx.client.get_account(buffer.pubkey()).await.unwrap();

    ctx.client.send_tx_fresh(&[ix], &[]).await.unwrap();
    let twice = ctx.client.get_account(buffer.pubkey()).await.unwrap();
    assert_eq!(once.data, twice.data);
    assert_eq!(once.lamports, twice.lamports);
}

#[tokio::test]
async fn test_random_payloads_round_trip() {
    let ctx = EchoTestContext::new().await;
    let buffer = Keypair::new();
    ctx.client.initialize_echo(&buffer, 64).await.unwrap();

    for len in [0usize, 1, 17, 63, 64] {
        let payload = random_payload(len);
        ctx.client.echo(buffer.pubkey(), &payload).await.unwrap();
        assert_eq!(ctx.client.get_echo_buffer(buffer.pubkey()).await.data, payload);
    }
}

#[tokio::test]
async fn test_duplicate_initialize_is_rejected() {
    let ctx = EchoTestContext::new().await;
    let buffer = Keypair::new();
    ctx.client.initialize_echo(&buffer, 4).await.unwrap();
    ctx.client.echo(buffer.pubkey(), b"keep").await.unwrap();

    let err = ctx.client.initialize_echo(&buffer, 8).await.unwrap_err();
    assert_eq!(echo_error(&err), Some(EchoError::DuplicateAccount));

    let account = ctx.client.get_echo_buffer(buffer.pubkey()).await;
    assert_eq!(account.capacity, 4);
    assert_eq!(account.data, b"keep");
}

#[tokio::test]
async fn test_underfunded_funder_is_rejected() {
    let ctx = EchoTestContext::new().await;
    let funder = Keypair::new();
    ctx.client.fund(&funder.pubkey(), 1_000_000).await.unwrap();

    let buffer = Keypair::new();
    let ix = instructions::initialize_echo(ctx.program_id, buffer.pubkey(), funder.pubkey(), 1_000);
    let err = ctx.client.send_tx(&[ix], &[&buffer, &funder]).await.unwrap_err();
    assert_eq!(echo_error(&err), Some(EchoError::InsufficientFunds));
    assert!(ctx.client.get_account(buffer.pubkey()).await.is_none());
}

#[tokio::test]
async fn test_funder_must_stay_rent_exempt() {
    let ctx = EchoTestContext::new().await;
    let rent = ctx.client.client.get_rent().await.unwrap();
    let needed = rent.minimum_balance(EchoBuffer::space(1_000).unwrap());

    // Enough for the buffer, but the remainder would leave the funder below
    // its own rent exemption.
    let funder = Keypair::new();
    ctx.client.fund(&funder.pubkey(), needed + rent.minimum_balance(0) / 2).await.unwrap();
    let buffer = Keypair::new();
    let ix = instructions::initialize_echo(ctx.program_id, buffer.pubkey(), funder.pubkey(), 1_000);
    let err = ctx.client.send_tx(&[ix], &[&buffer, &funder]).await.unwrap_err();
    assert_eq!(echo_error(&err), Some(EchoError::InsufficientFunds));
    assert!(ctx.client.get_account(buffer.pubkey()).await.is_none());

    // Draining the funder exactly is allowed.
    let funder = Keypair::new();
    ctx.client.fund(&funder.pubkey(), needed).await.unwrap();
    let buffer = Keypair::new();
    let ix = instructions::initialize_echo(ctx.program_id, buffer.pubkey(), funder.pubkey(), 1_000);
    ctx.client.send_tx(&[ix], &[&buffer, &funder]).await.unwrap();
    assert_eq!(ctx.client.get_echo_buffer(buffer.pubkey()).await.capacity, 1_000);
    assert!(ctx.client.get_account(funder.pubkey()).await.is_none());
}

#[tokio::test]
async fn test_echo_rejects_foreign_layout() {
    let ctx = EchoTestContext::new().await;
    let buffer = Keypair::new();
    ctx.client.zero_copy_echo(&buffer, 4, b"echo").await.unwrap();

    let err = ctx.client.echo(buffer.pubkey(), b"echo").await.unwrap_err();
    assert_eq!(echo_error(&err), Some(EchoError::InvalidAccountData));
}
