//! Command-line surface
//!
//! - [`args`] - clap argument definitions and config assembly
//! - [`observer`] - Console rendering of pipeline events
//! - [`error`] - CLI error type

pub mod args;
pub mod error;
pub mod observer;

pub use args::Cli;
pub use error::CliError;
pub use observer::ConsoleObserver;
