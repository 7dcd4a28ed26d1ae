use anyhow::{bail, Result};
use eventide_domain::EventDraft;

use crate::context::AppContext;

/// Create an event; only admins may do this.
pub async fn create_event(ctx: &AppContext, draft: EventDraft) -> Result<()> {
    let Some(user) = ctx.auth.current_user() else {
        bail!("Sign in as an admin to create events");
    };
    if !ctx.auth.user_role(&user.uid).await?.is_admin() {
        bail!("Only admins can create events");
    }

    let id = ctx.admin.create_event(&draft).await?;
    println!("Event created ({id})");
    Ok(())
}
