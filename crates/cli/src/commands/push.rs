use anyhow::Result;
use eventide_core::{notify_on_favorite, NotifyRequest};

use crate::context::AppContext;

pub async fn register(ctx: &AppContext, token: &str) -> Result<()> {
    ctx.push.register_token(token).await?;
    println!("Push token registered");
    Ok(())
}

/// Run the favorite notification handler directly against the messaging API.
pub async fn notify(ctx: &AppContext, event_name: Option<String>, token: Option<String>) -> Result<()> {
    let token = match token {
        Some(token) => Some(token),
        None => ctx.push.token().await,
    };
    let request = NotifyRequest { event_name, fcm_token: token };
    let response = notify_on_favorite(&ctx.push_gateway(), request).await?;
    println!("success: {}", response.success);
    Ok(())
}
