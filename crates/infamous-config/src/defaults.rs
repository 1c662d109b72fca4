//! Default values for every configuration section.

use crate::schema::*;

impl Default for Config {
    fn default() -> Self {
        Self {
            discord: DiscordConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingSettings::default(),
            source: SourceConfig::default(),
            pagination: PaginationConfig::default(),
        }
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            prefix: "!".to_string(),
            owner_ids: Vec::new(),
            embed_color: 0x0072_89DA,
            testing_guild_id: None,
            beta_role_id: None,
            webhook_url: None,
            loop_limit: 10,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 5,
            acquire_timeout_seconds: 5,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            file_path: None,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            repository_url: None,
            guild_icon_fallback: "https://imgur.com/Xy8i2UB.png".to_string(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 120,
        }
    }
}
