//! Beta tester role toggle for the testing guild.

use crate::checks::in_testing;
use crate::developer::react;
use crate::framework::{Context, Error};
use poise::serenity_prelude as serenity;
use tracing::info;

/// Toggles the beta role on yourself.
#[poise::command(
    prefix_command,
    hide_in_help,
    guild_only,
    check = "in_testing",
    category = "beta"
)]
pub async fn beta(ctx: Context<'_>) -> Result<(), Error> {
    let role = ctx
        .data()
        .config
        .discord
        .beta_role_id
        .filter(|&id| id != 0)
        .map(serenity::RoleId::new)
        .ok_or("No beta role is configured.")?;

    let member = ctx
        .author_member()
        .await
        .ok_or("Could not resolve your membership in this server.")?;

    if member.roles.contains(&role) {
        member.remove_role(ctx.http(), role).await?;
        info!(user = %member.user.id, "Beta role removed");
        react(ctx, '➖').await
    } else {
        member.add_role(ctx.http(), role).await?;
        info!(user = %member.user.id, "Beta role added");
        react(ctx, '➕').await
    }
}
