//! Checks against a real network stack.
//!
//! Tests hitting the public auth server with the demo account are ignored by
//! default. Run them with `cargo test -p jwt-bch-api --test live -- --ignored`.

use jwt_bch_api::{ClientConfig, JwtBchClient};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

async fn demo_session() -> anyhow::Result<JwtBchClient> {
    init_tracing();
    let mut client = JwtBchClient::new(ClientConfig::from_env()?)?;
    client.register().await?;
    Ok(client)
}

#[tokio::test]
#[ignore = "requires network access to auth.fullstack.cash"]
async fn demo_account_registers() -> anyhow::Result<()> {
    let client = demo_session().await?;

    let data = client.user_data();
    assert!(data.has_registered);
    assert!(data.user_id.is_some());
    assert!(data.access_token().is_some());
    assert!(client.bch_addr().is_some_and(|addr| addr.starts_with("bitcoincash:")));
    Ok(())
}

#[tokio::test]
#[ignore = "requires network access to auth.fullstack.cash"]
async fn free_tier_token_validates() -> anyhow::Result<()> {
    let mut client = demo_session().await?;

    let token = client.get_api_token(0).await?;
    assert_eq!(token.api_level, 0);

    let validity = client.validate_api_token().await?;
    assert!(validity.is_valid);
    Ok(())
}

#[tokio::test]
#[ignore = "requires network access to auth.fullstack.cash"]
async fn credit_is_a_number() -> anyhow::Result<()> {
    let client = demo_session().await?;

    let credit = client.update_credit().await?;
    assert!(credit >= 0.0, "credit should not be negative, got {credit}");
    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_an_auth_error() -> anyhow::Result<()> {
    init_tracing();
    let config = ClientConfig::new("nobody@example.com", "testpass")?
        .with_server_url("http://127.0.0.1:9");
    let mut client = JwtBchClient::new(config)?;

    let err = client.register().await.expect_err("nothing listens on the discard port");
    assert!(matches!(err, jwt_bch_api::Error::Auth(_)), "got: {err}");
    assert!(!client.has_registered());
    Ok(())
}
