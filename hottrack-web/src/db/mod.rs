//! Database access layer for hottrack-web
//!
//! Connection setup and schema creation live in `hottrack_common::db`.

pub mod songs;

pub use hottrack_common::db::{init_database, init_memory_database};
