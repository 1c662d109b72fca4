//! Application-wide error types using thiserror.

use infamous_blocklist::{BlockError, StoreError};
use poise::serenity_prelude as serenity;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// Discord/Serenity error.
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    /// The block list database could not be prepared.
    #[error("Database error: {0}")]
    Database(#[from] StoreError),

    /// The block list could not be loaded.
    #[error("Block list error: {0}")]
    BlockList(#[from] BlockError),
}

/// Result type for the bot application.
pub type BotResult<T> = Result<T, BotError>;
