//! Presentation channels for screening sessions.
//!
//! The REST surface lives in `screening::routes`; this module holds the
//! terminal adapter.

pub mod cli;

pub use cli::CliChannel;
