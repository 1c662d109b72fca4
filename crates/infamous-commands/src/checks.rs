//! Command checks

use crate::framework::{Context, Error};
use infamous_common::UserId;
use infamous_config::Config;
use tracing::warn;

/// Whether `user_id` is one of the configured bot owners.
pub fn is_owner(config: &Config, user_id: UserId) -> bool {
    config.discord.owner_ids.contains(&user_id.get())
}

/// Whether `guild_id` is the configured testing guild.
pub fn is_testing_guild(config: &Config, guild_id: Option<u64>) -> bool {
    matches!(
        (guild_id, config.discord.testing_guild_id),
        (Some(guild), Some(testing)) if guild == testing
    )
}

/// Poise check: the author is a bot owner.
pub async fn is_admin(ctx: Context<'_>) -> Result<bool, Error> {
    let author = UserId(ctx.author().id.get());
    let allowed = is_owner(&ctx.data().config, author);
    if !allowed {
        warn!(user_id = %author, command = %ctx.command().qualified_name, "Non-owner attempted developer command");
    }
    Ok(allowed)
}

/// Poise check: the command runs inside the testing guild.
pub async fn in_testing(ctx: Context<'_>) -> Result<bool, Error> {
    Ok(is_testing_guild(
        &ctx.data().config,
        ctx.guild_id().map(|id| id.get()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        let mut config = Config::default();
        config.discord.owner_ids = vec![10, 20];
        config.discord.testing_guild_id = Some(99);
        config
    }

    #[test]
    fn test_is_owner() {
        let config = config();
        assert!(is_owner(&config, UserId(10)));
        assert!(is_owner(&config, UserId(20)));
        assert!(!is_owner(&config, UserId(30)));
    }

    #[test]
    fn test_is_testing_guild() {
        let config = config();
        assert!(is_testing_guild(&config, Some(99)));
        assert!(!is_testing_guild(&config, Some(98)));
        assert!(!is_testing_guild(&config, None));
        assert!(!is_testing_guild(&Config::default(), Some(99)));
    }
}
