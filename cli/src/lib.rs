//! # Wakfu Theme CLI
//!
//! Command-line front end for the theme engine: loads the theme through the
//! on-disk cache, prints colors, elements, pixmaps and skin parts, and edits
//! the custom-color layer.
//!
//! ## Modules
//!
//! - [`commands`] - Command definitions and their execution
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Error types reported to the user
//! - [`logger`] - Logging configuration
//!
//! This library interface enables integration testing by providing access to internal modules.

pub mod commands;
pub mod config;
pub mod error;
pub mod logger;

pub use commands::{Cli, Command};
pub use error::{AppError, AppResult};
