//! # Hottrack Common Library
//!
//! Shared code for the hottrack chart service:
//! - Song record and its derived URLs
//! - Slug generation
//! - Chart snapshot import adapter
//! - Query/filter engine and archive grouping
//! - CSV/XLSX export
//! - Configuration loading and database initialization

pub mod archive;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod export;
pub mod import;
pub mod search;
pub mod slug;
pub mod song;

pub use error::{Error, Result, ValidationError};
pub use song::Song;
