//! Per-guild statistics pages.

use crate::checks::is_admin;
use crate::framework::{Context, Error};
use crate::pagination::paginate;
use poise::serenity_prelude as serenity;
use std::time::Duration;

/// Counts and metadata shown on a guild's page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildSummary {
    /// Guild name.
    pub name: String,
    /// Owner tag, or a mention when the owner is not cached.
    pub owner: String,
    /// Creation time of the guild.
    pub created_at: serenity::Timestamp,
    /// Human members.
    pub users: usize,
    /// Bot members.
    pub bots: usize,
    /// Roles, `@everyone` excluded.
    pub roles: usize,
    /// Text channels.
    pub text_channels: usize,
    /// Voice channels.
    pub voice_channels: usize,
    /// Icon URL, if the guild has one.
    pub icon_url: Option<String>,
}

impl GuildSummary {
    /// Summarizes a cached guild.
    pub fn from_guild(guild: &serenity::Guild) -> Self {
        let owner = guild
            .members
            .get(&guild.owner_id)
            .map_or_else(|| format!("<@{}>", guild.owner_id), |m| m.user.tag());
        let bots = guild.members.values().filter(|m| m.user.bot).count();
        let count_channels = |kind: serenity::ChannelType| {
            guild.channels.values().filter(|c| c.kind == kind).count()
        };

        Self {
            name: guild.name.clone(),
            owner,
            created_at: guild.id.created_at(),
            users: guild.members.len() - bots,
            bots,
            roles: guild.roles.values().filter(|r| r.name != "@everyone").count(),
            text_channels: count_channels(serenity::ChannelType::Text),
            voice_channels: count_channels(serenity::ChannelType::Voice),
            icon_url: guild.icon_url(),
        }
    }

    /// Page `page` (zero based) of `total`.
    pub fn to_embed(
        &self,
        page: usize,
        total: usize,
        color: u32,
        icon_fallback: &str,
    ) -> serenity::CreateEmbed {
        serenity::CreateEmbed::new()
            .color(color)
            .description(format!("Owned by: {}", self.owner))
            .timestamp(self.created_at)
            .author(serenity::CreateEmbedAuthor::new(format!(
                "{} | Page {} of {}",
                self.name,
                page + 1,
                total
            )))
            .field("Users", self.users.to_string(), true)
            .field("Bots", self.bots.to_string(), true)
            .field("Roles", self.roles.to_string(), true)
            .field("Text Channels", self.text_channels.to_string(), true)
            .field("Voice Channels", self.voice_channels.to_string(), true)
            .image(self.icon_url.as_deref().unwrap_or(icon_fallback))
            .footer(serenity::CreateEmbedFooter::new("Created at"))
    }
}

/// Shows every guild the bot is in, one page each.
#[poise::command(prefix_command, hide_in_help, check = "is_admin", category = "guilds")]
pub async fn guilds(ctx: Context<'_>) -> Result<(), Error> {
    let summaries: Vec<GuildSummary> = {
        let cache = &ctx.serenity_context().cache;
        cache
            .guilds()
            .into_iter()
            .filter_map(|id| cache.guild(id).map(|guild| GuildSummary::from_guild(&guild)))
            .collect()
    };

    let config = &ctx.data().config;
    let total = summaries.len();
    let pages = summaries
        .iter()
        .enumerate()
        .map(|(page, summary)| {
            summary.to_embed(
                page,
                total,
                config.discord.embed_color,
                &config.source.guild_icon_fallback,
            )
        })
        .collect();

    paginate(
        ctx,
        pages,
        Duration::from_secs(config.pagination.timeout_seconds),
    )
    .await
}
