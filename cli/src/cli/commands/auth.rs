//! Authentication command handlers.

use chrono::{Duration, Utc};

use crate::auth::tokens::expiry_after_secs;
use crate::auth::Credential;
use crate::context::AppContext;
use crate::error::{ClientError, Result};

/// Handle the `spotstats auth import` command.
pub async fn handle_import(
    ctx: &AppContext,
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    scope: Option<String>,
) -> Result<()> {
    if access_token.trim().is_empty() {
        return Err(ClientError::Config("access token must not be empty".to_string()));
    }

    let expires_at = expiry_after_secs(expires_in).ok_or_else(|| {
        ClientError::Config(format!("--expires-in {expires_in} is out of range"))
    })?;

    let mut credential = Credential::new(access_token, refresh_token, Duration::zero());
    credential.expires_at = expires_at;
    credential.scope = scope;

    if !credential.can_refresh() {
        tracing::warn!("Imported credential has no refresh token; it cannot be renewed");
    }

    ctx.session.set_credential(credential).await?;
    println!("Credential stored.");

    Ok(())
}

/// Handle the `spotstats auth logout` command.
pub async fn handle_logout(ctx: &AppContext) -> Result<()> {
    if ctx.session.is_authenticated().await {
        ctx.session.clear().await?;
        println!("Successfully logged out.");
    } else {
        println!("Not currently logged in.");
    }

    Ok(())
}

/// Handle the `spotstats auth status` command.
pub async fn handle_status(ctx: &AppContext) -> Result<()> {
    let Some(creds) = ctx.session.credential().await else {
        println!("Not logged in");
        println!();
        println!("Run 'spotstats auth import' to store a credential.");
        return Ok(());
    };

    println!("Logged in");
    println!();
    for line in status_lines(&creds) {
        println!("  {line}");
    }
    println!("  API Server: {}", ctx.config.api.base_url);

    if creds.is_expired() && creds.can_refresh() {
        println!();
        println!("  Access token has expired; it is renewed on the next request.");
    } else if creds.is_expired() {
        println!();
        println!("  Warning: access token has expired and cannot be renewed. Run 'spotstats auth import' again.");
    }

    Ok(())
}

/// Handle the `spotstats auth refresh` command.
pub async fn handle_refresh(ctx: &AppContext) -> Result<()> {
    let creds = ctx.session.force_refresh().await?;
    println!("Credential refreshed.");
    println!("  Expires:    {}", creds.expires_at.to_rfc3339());
    Ok(())
}

fn status_lines(creds: &Credential) -> Vec<String> {
    let remaining = creds.expires_at - Utc::now();
    let expiry = if remaining > Duration::zero() {
        format!("{} (in {} min)", creds.expires_at.to_rfc3339(), remaining.num_minutes())
    } else {
        format!("{} (expired)", creds.expires_at.to_rfc3339())
    };

    vec![
        format!("Token type: {}", creds.token_type),
        format!("Expires:    {expiry}"),
        format!("Scopes:     {}", creds.scope.as_deref().unwrap_or("-")),
        format!(
            "Refresh:    {}",
            if creds.can_refresh() { "available" } else { "missing" }
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::{CredentialStore, MemoryCredentialStore};
    use crate::client::TracingSink;
    use crate::config::AppConfig;

    async fn context(accounts: &MockServer, store: Arc<MemoryCredentialStore>) -> AppContext {
        let mut config = AppConfig::default();
        config.auth.base_url = Url::parse(&format!("{}/", accounts.uri())).unwrap();
        AppContext::new(config, store, Arc::new(TracingSink))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn import_persists_credential() {
        let accounts = MockServer::start().await;
        let store = Arc::new(MemoryCredentialStore::default());
        let ctx = context(&accounts, store.clone()).await;

        handle_import(&ctx, "A1".into(), "R1".into(), 3600, Some("user-read-email".into()))
            .await
            .unwrap();

        let stored = store.load().unwrap().unwrap();
        assert_eq!(stored.access_token, "A1");
        assert_eq!(stored.scope.as_deref(), Some("user-read-email"));
        assert_eq!(ctx.session.access_token().await.as_deref(), Some("A1"));
    }

    #[tokio::test]
    async fn import_rejects_blank_access_token() {
        let accounts = MockServer::start().await;
        let ctx = context(&accounts, Arc::new(MemoryCredentialStore::default())).await;

        let err = handle_import(&ctx, "  ".into(), "R1".into(), 3600, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[tokio::test]
    async fn import_rejects_out_of_range_lifetime() {
        let accounts = MockServer::start().await;
        let store = Arc::new(MemoryCredentialStore::default());
        let ctx = context(&accounts, store.clone()).await;

        let err = handle_import(&ctx, "A1".into(), "R1".into(), 9_999_999_999_999_999, None)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Config(ref m) if m.contains("out of range")));
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn logout_clears_store() {
        let accounts = MockServer::start().await;
        let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new(
            "A1",
            "R1",
            Duration::hours(1),
        )));
        let ctx = context(&accounts, store.clone()).await;

        handle_logout(&ctx).await.unwrap();

        assert!(store.load().unwrap().is_none());
        assert!(!ctx.session.is_authenticated().await);
    }

    #[tokio::test]
    async fn refresh_rotates_stored_credential() {
        let accounts = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "A2",
                "expires_in": 3600,
                "refresh_token": "R2"
            })))
            .expect(1)
            .mount(&accounts)
            .await;
        let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new(
            "A1",
            "R1",
            Duration::hours(1),
        )));
        let ctx = context(&accounts, store.clone()).await;

        handle_refresh(&ctx).await.unwrap();

        let stored = store.load().unwrap().unwrap();
        assert_eq!((stored.access_token.as_str(), stored.refresh_token.as_str()), ("A2", "R2"));
    }

    #[tokio::test]
    async fn refresh_without_credential_requires_login() {
        let accounts = MockServer::start().await;
        let ctx = context(&accounts, Arc::new(MemoryCredentialStore::default())).await;

        let err = handle_refresh(&ctx).await.unwrap_err();
        assert!(matches!(err, ClientError::NotAuthenticated));
    }

    #[test]
    fn status_lines_describe_credential() {
        let creds = Credential::new("A1", "", Duration::minutes(-5));
        let lines = status_lines(&creds);
        assert!(lines[1].ends_with("(expired)"));
        assert_eq!(lines[2], "Scopes:     -");
        assert_eq!(lines[3], "Refresh:    missing");
    }
}
