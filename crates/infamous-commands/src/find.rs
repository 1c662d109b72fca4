//! Member lookup commands.

use crate::framework::{Context, Error};
use chrono::{DateTime, Utc};
use infamous_common::format_timestamp;
use poise::serenity_prelude as serenity;

/// Shortest id Discord has handed out since snowflakes reached 17 digits.
const MIN_USER_ID_DIGITS: usize = 17;

/// Above this many matches the list is comma separated.
const COMMA_SEPARATED_AT: usize = 20;

/// Validates a discriminator argument, stripping a leading `#`.
pub fn parse_discriminator(input: &str) -> Result<String, &'static str> {
    if !(4..=5).contains(&input.chars().count()) {
        return Err("There must be 4 digits.");
    }

    let discrim = input.trim_matches('#');
    if discrim.is_empty() || !discrim.chars().all(|c| c.is_ascii_digit()) {
        return Err("They must be numbers.");
    }

    Ok(discrim.to_string())
}

/// Joins matched names for display, `None` when nothing matched.
pub fn format_member_list(names: &[String]) -> Option<String> {
    if names.is_empty() {
        None
    } else if names.len() >= COMMA_SEPARATED_AT {
        Some(names.join(", "))
    } else {
        Some(names.join(" \n"))
    }
}

/// Whether `id` has enough digits to be a user id.
pub fn is_plausible_user_id(id: u64) -> bool {
    id.to_string().len() >= MIN_USER_ID_DIGITS
}

/// Embed describing who a user id belongs to.
pub fn user_embed(
    color: u32,
    name: &str,
    id: u64,
    avatar: &str,
    created_at: DateTime<Utc>,
) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .color(color)
        .author(serenity::CreateEmbedAuthor::new(name))
        .title("Discord ID")
        .description(id.to_string())
        .thumbnail(avatar)
        .field("Created at", format_timestamp(created_at), false)
}

/// Find people with the same discriminator.
#[poise::command(prefix_command, hide_in_help, guild_only, category = "find", subcommands("user"))]
pub async fn find(ctx: Context<'_>, discrim: String) -> Result<(), Error> {
    let discrim = match parse_discriminator(&discrim) {
        Ok(discrim) => discrim,
        Err(message) => {
            ctx.say(message).await?;
            return Ok(());
        }
    };

    let names: Vec<String> = {
        let guild = ctx.guild().ok_or("This command only works in a server")?;
        guild
            .members
            .values()
            .filter(|member| {
                member
                    .user
                    .discriminator
                    .is_some_and(|d| format!("{:04}", d.get()) == discrim)
            })
            .map(|member| member.user.name.clone())
            .collect()
    };

    let users = format_member_list(&names).unwrap_or_else(|| "None".to_string());
    let embed = serenity::CreateEmbed::new()
        .color(ctx.data().config.discord.embed_color)
        .title(format!("List of users with the #{discrim} discriminator"))
        .description(format!("`{users}`"))
        .footer(serenity::CreateEmbedFooter::new(format!(
            "{} users found",
            names.len()
        )));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Shows who the user id belongs to.
#[poise::command(prefix_command, hide_in_help, category = "find")]
pub async fn user(ctx: Context<'_>, id: u64) -> Result<(), Error> {
    if !is_plausible_user_id(id) {
        ctx.say("That is not a user id.").await?;
        return Ok(());
    }

    let user_id = serenity::UserId::new(id);
    let member = ctx
        .guild()
        .and_then(|guild| guild.members.get(&user_id).map(|m| m.user.clone()));
    let user = match member {
        Some(user) => user,
        None => user_id.to_user(ctx.serenity_context()).await?,
    };

    let created_at =
        DateTime::<Utc>::from_timestamp(user_id.created_at().unix_timestamp(), 0).unwrap_or_default();
    let embed = user_embed(
        ctx.data().config.discord.embed_color,
        &user.tag(),
        id,
        &user.face(),
        created_at,
    );

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
