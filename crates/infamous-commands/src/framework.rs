//! Poise framework setup and command registration logic.

use crate::extensions::ExtensionRegistry;
use infamous_blocklist::{BlockAuthority, PgBlockStore};
use infamous_common::UserId;
use infamous_config::Config;
use poise::serenity_prelude as serenity;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Extension that cannot be unloaded: it holds the commands that manage
/// the others.
pub const PROTECTED_EXTENSION: &str = "developer";

/// Application data accessible in all commands.
pub struct Data {
    /// Application configuration.
    pub config: Arc<Config>,
    /// Block list consulted before every command.
    pub blocklist: Arc<BlockAuthority>,
    /// Runtime state of every extension.
    pub extensions: Arc<ExtensionRegistry>,
    /// Database handle closed by `quit`. Absent when running without one.
    pub database: Option<PgBlockStore>,
    /// When the process started, used for the uptime shown by `quit`.
    pub launch_time: Instant,
}

/// Application error type for commands.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Command context type.
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Every command of the developer cog.
pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        crate::developer::load(),
        crate::developer::unload(),
        crate::developer::reload(),
        crate::developer::quit(),
        crate::developer::restart(),
        crate::find::find(),
        crate::messaging::say(),
        crate::messaging::clear(),
        crate::dispatch::loop_command(),
        crate::dispatch::sudo(),
        crate::imitate::imitate(),
        crate::source::source(),
        crate::moderation::block(),
        crate::moderation::unblock(),
        crate::moderation::blocked(),
        crate::beta::beta(),
        crate::guilds::guilds(),
    ]
}

/// Creates a new Poise framework.
///
/// The caller supplies the `setup` callback that builds [`Data`].
pub fn create_framework(config: &Config) -> poise::FrameworkBuilder<Data, Error> {
    let owners: HashSet<serenity::UserId> = config
        .discord
        .owner_ids
        .iter()
        .map(|&id| serenity::UserId::new(id))
        .collect();

    poise::Framework::builder().options(poise::FrameworkOptions {
        commands: commands(),
        owners,
        command_check: Some(|ctx| Box::pin(command_check(ctx))),
        on_error: |error| Box::pin(on_error(error)),
        event_handler: |ctx, event, framework, data| {
            Box::pin(event_handler(ctx, event, framework, data))
        },
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: Some(config.discord.prefix.clone()),
            mention_as_prefix: true,
            case_insensitive_commands: true,
            ..Default::default()
        },
        ..Default::default()
    })
}

/// Whether `author` may run a command of extension `category`.
///
/// Blocked users are refused unless they are owners, and commands whose
/// extension is unloaded are refused for everyone.
pub fn allows(
    config: &Config,
    blocklist: &BlockAuthority,
    extensions: &ExtensionRegistry,
    author: UserId,
    category: Option<&str>,
) -> bool {
    if blocklist.is_blocked(author) && !crate::checks::is_owner(config, author) {
        debug!(user_id = %author, "Blocked user refused");
        return false;
    }

    if !extensions.is_enabled(category) {
        debug!(?category, "Command of unloaded extension refused");
        return false;
    }

    true
}

/// Runs before every command, including subcommands and redispatched ones.
pub async fn command_check(ctx: Context<'_>) -> Result<bool, Error> {
    let data = ctx.data();
    Ok(allows(
        &data.config,
        &data.blocklist,
        &data.extensions,
        UserId(ctx.author().id.get()),
        ctx.command().category.as_deref(),
    ))
}

async fn event_handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!(
                "Connected as {} to {} guilds with {} blocked users",
                data_about_bot.user.name,
                data_about_bot.guilds.len(),
                data.blocklist.len()
            );
        }
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            debug!(guild = %guild.id, name = %guild.name, ?is_new, "Guild available");
        }
        _ => {}
    }
    Ok(())
}

/// Central error handler for the framework.
pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(
                command = %ctx.command().qualified_name,
                "Command failed: {:?}", error
            );
            if let Err(e) = ctx.say(format!("Something went wrong: {error}")).await {
                warn!("Failed to report command error: {}", e);
            }
        }
        poise::FrameworkError::CommandCheckFailed { error, ctx, .. } => {
            if let Some(error) = error {
                warn!(command = %ctx.command().qualified_name, "Check errored: {:?}", error);
            } else {
                debug!(command = %ctx.command().qualified_name, user = %ctx.author().id, "Check failed");
            }
        }
        poise::FrameworkError::CommandStructureMismatch { .. }
        | poise::FrameworkError::UnknownCommand { .. } => {}
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}
