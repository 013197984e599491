//! # Looptune Common Library
//!
//! Shared code for the looptune player crates including:
//! - Error types
//! - TOML configuration loading and path resolution
//! - Track title cleaning used for display, sorting and searching
//! - Playlist persistence record layout

pub mod config;
pub mod error;
pub mod record;
pub mod title;

pub use error::{Error, Result};
pub use title::clean_title;
