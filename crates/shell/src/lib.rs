//! Interactive console shell around a single current account.
//!
//! The shell owns all user-facing text; the account itself never performs IO.

pub mod app;
pub mod commands;
pub mod config;

pub use app::Shell;
pub use commands::{Action, CommandError, CommandTable, Outcome, ShellCommand};
pub use config::{ConfigError, ShellConfig};
