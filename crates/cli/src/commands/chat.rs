use anyhow::Result;

use crate::context::AppContext;
use crate::render;

pub async fn send(ctx: &AppContext, event_id: &str, text: &str) -> Result<()> {
    match ctx.chat.send_message(event_id, text).await? {
        Some(id) => println!("Sent ({id})"),
        None => println!("Nothing to send"),
    }
    Ok(())
}

pub async fn list(ctx: &AppContext, event_id: &str) -> Result<()> {
    let messages = ctx.chat.list_messages(event_id).await?;
    if messages.is_empty() {
        println!("No messages yet");
    }
    for message in &messages {
        println!("{}", render::message_line(message, ctx.chat.is_own(message)));
    }
    Ok(())
}
