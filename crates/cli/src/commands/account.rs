use anyhow::Result;
use eventide_domain::{AuthUser, UserRole};

use crate::context::AppContext;

pub async fn login(ctx: &AppContext, email: &str, password: &str) -> Result<()> {
    let user = ctx.auth.login_with_email(email, password).await?;
    greet(ctx, &user).await
}

pub async fn login_google(ctx: &AppContext, id_token: &str) -> Result<()> {
    let user = ctx.auth.sign_in_with_google(id_token).await?;
    greet(ctx, &user).await
}

pub async fn signup(ctx: &AppContext, email: &str, password: &str, admin: bool) -> Result<()> {
    let role = if admin { UserRole::Admin } else { UserRole::User };
    let user = ctx.auth.sign_up_with_email(email, password, role).await?;
    println!("Account created for {}", user.email.as_deref().unwrap_or(&user.uid));
    greet(ctx, &user).await
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.sign_out().await?;
    println!("Signed out");
    Ok(())
}

pub async fn whoami(ctx: &AppContext) -> Result<()> {
    match ctx.auth.current_user() {
        Some(user) => greet(ctx, &user).await,
        None => {
            println!("Not signed in");
            Ok(())
        }
    }
}

async fn greet(ctx: &AppContext, user: &AuthUser) -> Result<()> {
    let role = ctx.auth.user_role(&user.uid).await?;
    let name = user.display_name.as_deref().or(user.email.as_deref()).unwrap_or(&user.uid);
    println!("Signed in as {name} ({role})");
    Ok(())
}
