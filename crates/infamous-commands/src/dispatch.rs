//! Commands that run other commands.

use crate::checks::is_admin;
use crate::framework::{Context, Error};
use poise::serenity_prelude as serenity;
use tracing::{info, warn};

/// Clamps the requested repetition count to the configured limit.
pub fn loop_count(requested: u32, limit: u32) -> u32 {
    requested.min(limit)
}

/// Whether `command` would invoke `loop` again.
pub fn is_self_invocation(command: &str) -> bool {
    command
        .split_whitespace()
        .next()
        .is_some_and(|name| name.eq_ignore_ascii_case("loop"))
}

/// Copy of `original` as if `author` had typed `prefix` followed by `command`.
///
/// Channel and guild are kept; cached member data is dropped so it cannot
/// describe the wrong author.
pub fn impersonated_message(
    original: &serenity::Message,
    author: serenity::User,
    prefix: &str,
    command: &str,
) -> serenity::Message {
    let mut message = original.clone();
    message.author = author;
    message.member = None;
    message.content = format!("{prefix}{command}");
    message
}

/// Runs `command` through the prefix dispatcher as if `author` had sent it
/// in the invoking channel. The framework's command check runs again for the
/// new author.
async fn redispatch(ctx: Context<'_>, author: serenity::User, command: &str) -> Result<(), Error> {
    let poise::Context::Prefix(prefix) = ctx else {
        return Err("This command only works as a text command".into());
    };

    let message = impersonated_message(prefix.msg, author, prefix.prefix, command);

    let framework = ctx.framework();
    let invocation_data = tokio::sync::Mutex::new(Box::new(()) as Box<dyn std::any::Any + Send + Sync>);
    let mut parent_commands = Vec::new();

    if let Err(error) = poise::dispatch_message(
        framework,
        ctx.serenity_context(),
        &message,
        poise::MessageDispatchTrigger::MessageCreate,
        &invocation_data,
        &mut parent_commands,
    )
    .await
    {
        (framework.options.on_error)(error).await;
    }
    Ok(())
}

/// Executes a command for x times.
#[poise::command(
    prefix_command,
    hide_in_help,
    check = "is_admin",
    category = "dispatch",
    rename = "loop"
)]
pub async fn loop_command(ctx: Context<'_>, times: u32, #[rest] command: String) -> Result<(), Error> {
    if is_self_invocation(&command) {
        ctx.say("Loops cannot invoke themselves.").await?;
        return Ok(());
    }

    let limit = ctx.data().config.discord.loop_limit;
    let times = loop_count(times, limit);
    info!(times, %command, "Looping command");

    for _ in 0..times {
        redispatch(ctx, ctx.author().clone(), &command).await?;
    }
    Ok(())
}

/// Runs a command as another member.
#[poise::command(prefix_command, hide_in_help, check = "is_admin", guild_only, category = "dispatch")]
pub async fn sudo(ctx: Context<'_>, member: serenity::Member, #[rest] command: String) -> Result<(), Error> {
    warn!(
        invoker = %ctx.author().id,
        target = %member.user.id,
        %command,
        "Running command on behalf of another member"
    );
    redispatch(ctx, member.user, &command).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_count_is_capped() {
        assert_eq!(loop_count(3, 10), 3);
        assert_eq!(loop_count(10, 10), 10);
        assert_eq!(loop_count(500, 10), 10);
        assert_eq!(loop_count(0, 10), 0);
    }

    #[test]
    fn test_impersonated_message_swaps_author_and_content() {
        let mut original = serenity::Message::default();
        original.content = "i!sudo @someone say hi".to_string();
        original.channel_id = serenity::ChannelId::new(55);
        original.author.id = serenity::UserId::new(1);

        let mut target = serenity::User::default();
        target.id = serenity::UserId::new(2);
        target.name = "someone".to_string();

        let message = impersonated_message(&original, target, "i!", "say hi");

        assert_eq!(message.content, "i!say hi");
        assert_eq!(message.author.id, serenity::UserId::new(2));
        assert_eq!(message.author.name, "someone");
        assert!(message.member.is_none());
        assert_eq!(message.channel_id, original.channel_id);
        assert_eq!(original.author.id, serenity::UserId::new(1));
    }

    #[test]
    fn test_self_invocation() {
        assert!(is_self_invocation("loop 3 say hi"));
        assert!(is_self_invocation("  LOOP"));
        assert!(!is_self_invocation("say loop"));
        assert!(!is_self_invocation("looped"));
        assert!(!is_self_invocation(""));
    }
}
