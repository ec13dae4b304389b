//! # Runtime Support
//!
//! Environment configuration and logging setup for the sync binary.
//!
//! ## Overview
//!
//! - **`config`**: loads the required service endpoints and credentials from
//!   the environment (an optional `.env` file is honored), with fail-fast
//!   validation and descriptive errors
//! - **`logging`**: initializes the `tracing-subscriber` pipeline with
//!   env-filter support and a selectable output format

pub mod config;
pub mod error;
pub mod logging;

pub use config::SyncSettings;
pub use error::{Result, RuntimeError};
pub use logging::{init_logging, LogFormat, LoggingConfig};
