//! Configuration module
//!
//! Display and behavior defaults, stored as TOML in the user's config
//! directory and overridden per invocation from the command line.

pub mod config;

pub use config::{BehaviorConfig, Config, DisplayConfig};
