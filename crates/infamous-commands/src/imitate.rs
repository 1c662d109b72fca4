//! Impersonation through the configured webhook.

use crate::checks::is_admin;
use crate::framework::{Context, Error};
use poise::serenity_prelude as serenity;
use rand::seq::SliceRandom;
use tracing::info;

/// Name and avatar a webhook message is sent under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    /// Display name.
    pub name: String,
    /// Avatar URL.
    pub avatar_url: String,
}

impl Persona {
    /// Persona of a guild member, using their server nickname and avatar.
    pub fn from_member(member: &serenity::Member) -> Self {
        Self {
            name: member.display_name().to_string(),
            avatar_url: member.face(),
        }
    }

    /// Persona of a user outside the guild.
    pub fn from_user(user: &serenity::User) -> Self {
        Self {
            name: user.display_name().to_string(),
            avatar_url: user.face(),
        }
    }

    /// Webhook payload carrying `text` under this persona.
    pub fn message(&self, text: &str) -> serenity::ExecuteWebhook {
        serenity::ExecuteWebhook::new()
            .content(text)
            .username(self.name.as_str())
            .avatar_url(self.avatar_url.as_str())
            .allowed_mentions(serenity::CreateAllowedMentions::new())
    }
}

async fn send_as(ctx: Context<'_>, persona: Persona, text: &str) -> Result<(), Error> {
    let url = ctx
        .data()
        .config
        .discord
        .webhook_url
        .clone()
        .ok_or("No webhook is configured.")?;

    if let poise::Context::Prefix(prefix) = ctx {
        prefix.msg.delete(ctx.serenity_context()).await?;
    }

    let http = ctx.http();
    let webhook = serenity::Webhook::from_url(http, &url).await?;
    webhook.execute(http, false, persona.message(text)).await?;

    info!(invoker = %ctx.author().id, persona = %persona.name, "Sent imitation");
    Ok(())
}

/// Use webhooks to imitate a user.
#[poise::command(
    prefix_command,
    hide_in_help,
    check = "is_admin",
    guild_only,
    category = "imitate",
    subcommands("random", "custom")
)]
pub async fn imitate(ctx: Context<'_>, member: serenity::Member, #[rest] text: String) -> Result<(), Error> {
    send_as(ctx, Persona::from_member(&member), &text).await
}

/// Imitate a random person.
#[poise::command(prefix_command, hide_in_help, check = "is_admin", guild_only, category = "imitate")]
pub async fn random(ctx: Context<'_>, #[rest] text: String) -> Result<(), Error> {
    let persona = {
        let guild = ctx.guild().ok_or("This command only works in a server")?;
        let humans: Vec<&serenity::Member> = guild.members.values().filter(|m| !m.user.bot).collect();
        humans
            .choose(&mut rand::thread_rng())
            .map(|member| Persona::from_member(member))
            .ok_or("There is nobody to imitate here.")?
    };
    send_as(ctx, persona, &text).await
}

/// Imitate someone outside of the guild.
#[poise::command(prefix_command, hide_in_help, check = "is_admin", category = "imitate")]
pub async fn custom(ctx: Context<'_>, user_id: u64, #[rest] text: String) -> Result<(), Error> {
    if user_id == 0 {
        return Err("That is not a user id.".into());
    }
    let user = serenity::UserId::new(user_id)
        .to_user(ctx.serenity_context())
        .await?;
    send_as(ctx, Persona::from_user(&user), &text).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_payload_uses_persona() {
        let persona = Persona {
            name: "Someone".to_string(),
            avatar_url: "https://cdn.example/avatar.png".to_string(),
        };
        let json = serde_json::to_value(persona.message("hello there")).unwrap();

        assert_eq!(json["content"], "hello there");
        assert_eq!(json["username"], "Someone");
        assert_eq!(json["avatar_url"], "https://cdn.example/avatar.png");
    }
}
