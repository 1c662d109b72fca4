//! Extension management and process lifecycle commands.

use crate::checks::is_admin;
use crate::extensions::ExtensionError;
use crate::framework::{Context, Error};
use infamous_common::format_uptime;
use poise::serenity_prelude as serenity;
use tracing::{info, warn};

const SUCCESS: char = '✅';
const FAILURE: char = '❌';

/// Reacts to the invoking message. Outside prefix invocations the emoji is sent instead.
pub(crate) async fn react(ctx: Context<'_>, emoji: char) -> Result<(), Error> {
    if let poise::Context::Prefix(prefix) = ctx {
        prefix.msg.react(ctx.serenity_context(), emoji).await?;
    } else {
        ctx.say(emoji.to_string()).await?;
    }
    Ok(())
}

async fn react_to(ctx: Context<'_>, outcome: Result<String, ExtensionError>) -> Result<(), Error> {
    match outcome {
        Ok(_) => react(ctx, SUCCESS).await,
        Err(e) => {
            warn!("Extension command failed: {}", e);
            react(ctx, FAILURE).await
        }
    }
}

/// Loads an extension.
#[poise::command(prefix_command, hide_in_help, check = "is_admin", category = "developer")]
pub async fn load(ctx: Context<'_>, name: String) -> Result<(), Error> {
    let outcome = ctx.data().extensions.load(&name);
    react_to(ctx, outcome).await
}

/// Unloads an extension.
#[poise::command(prefix_command, hide_in_help, check = "is_admin", category = "developer")]
pub async fn unload(ctx: Context<'_>, name: String) -> Result<(), Error> {
    let outcome = ctx.data().extensions.unload(&name);
    react_to(ctx, outcome).await
}

/// Reloads an extension.
#[poise::command(
    prefix_command,
    hide_in_help,
    check = "is_admin",
    category = "developer",
    aliases("r")
)]
pub async fn reload(ctx: Context<'_>, name: String) -> Result<(), Error> {
    let outcome = ctx.data().extensions.reload(&name);
    react_to(ctx, outcome).await
}

/// Farewell shown by `quit`.
pub fn farewell(uptime: &str) -> String {
    format!("Well that was a good {uptime} of activity.")
}

/// Shuts the bot down.
#[poise::command(prefix_command, hide_in_help, check = "is_admin", category = "developer")]
pub async fn quit(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let uptime = format_uptime(data.launch_time.elapsed());

    let (name, avatar) = {
        let me = ctx.serenity_context().cache.current_user();
        (me.name.clone(), me.face())
    };

    let embed = serenity::CreateEmbed::new()
        .color(data.config.discord.embed_color)
        .author(serenity::CreateEmbedAuthor::new(name).icon_url(avatar))
        .description(farewell(&uptime));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    info!(%uptime, "Quit requested by {}", ctx.author().id);
    shutdown(ctx).await;
    Ok(())
}

/// Restarts the bot by spawning a fresh copy of the executable.
#[poise::command(
    prefix_command,
    hide_in_help,
    check = "is_admin",
    category = "developer",
    aliases("rs")
)]
pub async fn restart(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say("Restarting..").await?;

    let executable = std::env::current_exe()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let child = tokio::process::Command::new(&executable).args(&args).spawn()?;

    info!(
        executable = %executable.display(),
        pid = ?child.id(),
        "Spawned replacement process"
    );
    shutdown(ctx).await;
    Ok(())
}

async fn shutdown(ctx: Context<'_>) {
    if let Some(database) = &ctx.data().database {
        database.close().await;
    }
    ctx.framework().shard_manager().shutdown_all().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_farewell_message() {
        let uptime = format_uptime(Duration::from_secs(90_061));
        assert_eq!(
            farewell(&uptime),
            "Well that was a good 1d 1h 1m 1s of activity."
        );
    }
}
