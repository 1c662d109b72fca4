//! # Infamous Bot
//!
//! Binary crate wiring the developer cog into a running Discord client:
//! configuration, logging, the block list database and the Poise framework.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bot;
pub mod error;

pub use bot::*;
pub use error::*;
