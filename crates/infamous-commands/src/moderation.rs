//! Block list commands.

use crate::checks::is_admin;
use crate::framework::{Context, Error};
use infamous_blocklist::{BlockError, BlockListSnapshot};
use infamous_common::{truncate_string, UserId};
use poise::serenity_prelude as serenity;

/// Reply when the store cannot be reached.
pub const STORE_UNAVAILABLE_MESSAGE: &str =
    "The block list is unavailable right now, try again later.";

/// Discord's limit on an embed field value.
const FIELD_VALUE_LIMIT: usize = 1024;

/// Reply for the outcome of a `block` command.
pub fn block_reply(name: &str, reason: &str, outcome: &Result<(), BlockError>) -> String {
    match outcome {
        Ok(()) => format!("Blocked {name} from using the bot because: {reason}"),
        Err(BlockError::AlreadyBlocked(_)) => format!("{name} is already blocked"),
        Err(BlockError::NotBlocked(_) | BlockError::StoreUnavailable(_)) => {
            STORE_UNAVAILABLE_MESSAGE.to_string()
        }
    }
}

/// Reply for the outcome of an `unblock` command.
pub fn unblock_reply(name: &str, outcome: &Result<(), BlockError>) -> String {
    match outcome {
        Ok(()) => format!("{name} has been unblocked."),
        Err(BlockError::NotBlocked(_)) => format!("{name} was never blocked"),
        Err(BlockError::AlreadyBlocked(_) | BlockError::StoreUnavailable(_)) => {
            STORE_UNAVAILABLE_MESSAGE.to_string()
        }
    }
}

/// One `**name**: reason` line per entry. Unresolvable ids are shown as numbers.
pub fn format_blacklist<F>(snapshot: &BlockListSnapshot, mut resolve_name: F) -> String
where
    F: FnMut(UserId) -> Option<String>,
{
    let lines: Vec<String> = snapshot
        .iter()
        .map(|entry| {
            let name = resolve_name(entry.user_id).unwrap_or_else(|| entry.user_id.to_string());
            format!("**{name}**: {}", entry.reason)
        })
        .collect();

    if lines.is_empty() {
        "Nobody is blocked.".to_string()
    } else {
        truncate_string(&lines.join("\n"), FIELD_VALUE_LIMIT)
    }
}

/// Blocks a user from using the bot.
#[poise::command(prefix_command, hide_in_help, check = "is_admin", category = "moderation")]
pub async fn block(ctx: Context<'_>, user: serenity::User, #[rest] reason: String) -> Result<(), Error> {
    let outcome = ctx
        .data()
        .blocklist
        .block(UserId(user.id.get()), &reason)
        .await;

    ctx.say(block_reply(&user.name, &reason, &outcome)).await?;
    Ok(())
}

/// Lets a blocked user use the bot again.
#[poise::command(prefix_command, hide_in_help, check = "is_admin", category = "moderation")]
pub async fn unblock(ctx: Context<'_>, user: serenity::User) -> Result<(), Error> {
    let outcome = ctx.data().blocklist.unblock(UserId(user.id.get())).await;

    ctx.say(unblock_reply(&user.name, &outcome)).await?;
    Ok(())
}

/// Lists blocked users.
#[poise::command(prefix_command, hide_in_help, check = "is_admin", category = "moderation")]
pub async fn blocked(ctx: Context<'_>) -> Result<(), Error> {
    let snapshot = ctx.data().blocklist.list_blocked();

    let listing = {
        let guild = ctx.guild();
        let cache = &ctx.serenity_context().cache;
        format_blacklist(&snapshot, |user_id| {
            let id = serenity::UserId::new(user_id.get());
            guild
                .as_ref()
                .and_then(|g| g.members.get(&id).map(|m| m.user.tag()))
                .or_else(|| cache.user(id).map(|u| u.tag()))
        })
    };

    let embed = serenity::CreateEmbed::new()
        .color(ctx.data().config.discord.embed_color)
        .author(serenity::CreateEmbedAuthor::new("Infamous Blacklist"))
        .description("People who have abused the bot/exploit bugs go here.")
        .field("Blacklist", listing, false);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
