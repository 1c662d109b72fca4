//! # Infamous Commands
//!
//! The developer cog: hidden, owner-only prefix commands built on Poise.
//!
//! Every command belongs to an extension (its Poise category, named after the
//! module that defines it). Extensions can be unloaded and loaded again at
//! runtime; the framework's command check refuses commands of unloaded
//! extensions and refuses every command from blocked users.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod beta;
pub mod checks;
pub mod developer;
pub mod dispatch;
pub mod extensions;
pub mod find;
pub mod framework;
pub mod guilds;
pub mod imitate;
pub mod messaging;
pub mod moderation;
pub mod pagination;
pub mod source;

pub use extensions::{ExtensionError, ExtensionRegistry};
pub use framework::*;
