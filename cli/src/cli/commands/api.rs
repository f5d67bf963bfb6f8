//! Web API command handlers.

use crate::client::UserProfile;
use crate::context::AppContext;
use crate::error::{ClientError, Result};

/// Handle the `spotstats me` command.
pub async fn handle_me(ctx: &AppContext) -> Result<()> {
    require_credential(ctx).await?;

    let profile = ctx.api.current_user().await?;
    for line in profile_lines(&profile) {
        println!("{line}");
    }

    Ok(())
}

/// Handle the `spotstats get <path>` command.
pub async fn handle_get(ctx: &AppContext, path: &str) -> Result<()> {
    require_credential(ctx).await?;

    let value: serde_json::Value = ctx.api.get_json(path).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}

async fn require_credential(ctx: &AppContext) -> Result<()> {
    if ctx.session.is_authenticated().await {
        Ok(())
    } else {
        Err(ClientError::NotAuthenticated)
    }
}

fn profile_lines(profile: &UserProfile) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({})",
        profile.display_name.as_deref().unwrap_or(&profile.id),
        profile.id
    )];

    if let Some(email) = &profile.email {
        lines.push(format!("  Email:     {email}"));
    }
    if let Some(country) = &profile.country {
        lines.push(format!("  Country:   {country}"));
    }
    if let Some(product) = &profile.product {
        lines.push(format!("  Plan:      {product}"));
    }
    if let Some(followers) = &profile.followers {
        lines.push(format!("  Followers: {}", followers.total));
    }

    lines
}
