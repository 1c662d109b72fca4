//! Commands that speak through the bot or clean up after it.

use crate::checks::is_admin;
use crate::framework::{Context, Error};
use poise::serenity_prelude as serenity;
use std::time::Duration;
use tracing::debug;

/// Discord returns at most this many messages per history request.
const HISTORY_LIMIT: u8 = 100;

/// How long the confirmation of `clear` stays visible.
const CONFIRMATION_LIFETIME: Duration = Duration::from_secs(5);

/// Number of history messages `clear` inspects for `amount`.
///
/// The invoking message counts as one, and the request is capped at one page.
pub fn history_window(amount: u32) -> u8 {
    u8::try_from(amount.saturating_add(1)).map_or(HISTORY_LIMIT, |n| n.min(HISTORY_LIMIT))
}

/// Makes the bot say something.
#[poise::command(prefix_command, hide_in_help, check = "is_admin", category = "messaging")]
pub async fn say(ctx: Context<'_>, #[rest] text: String) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(text)
            .allowed_mentions(serenity::CreateAllowedMentions::new()),
    )
    .await?;
    Ok(())
}

/// Deletes bot messages.
#[poise::command(prefix_command, hide_in_help, check = "is_admin", category = "messaging")]
pub async fn clear(ctx: Context<'_>, amount: u32) -> Result<(), Error> {
    let serenity_ctx = ctx.serenity_context();
    let bot_id = ctx.framework().bot_id;

    let history = ctx
        .channel_id()
        .messages(
            serenity_ctx,
            serenity::GetMessages::new().limit(history_window(amount)),
        )
        .await?;

    let mut deleted = 0usize;
    for message in history.iter().filter(|m| m.author.id == bot_id) {
        message.delete(serenity_ctx).await?;
        deleted += 1;
    }
    debug!(requested = amount, deleted, "Cleared bot messages");

    let reply = ctx.say(format!("Cleared `{amount}` messages!")).await?;
    tokio::time::sleep(CONFIRMATION_LIFETIME).await;
    reply.delete(ctx).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_window() {
        assert_eq!(history_window(0), 1);
        assert_eq!(history_window(10), 11);
        assert_eq!(history_window(99), 100);
        assert_eq!(history_window(150), 100);
        assert_eq!(history_window(u32::MAX), 100);
    }
}
