//! Configuration layering helpers
//!
//! Configuration in this workspace is resolved in layers: compiled defaults,
//! then an optional file, then environment variables, then command-line flags.
//! This module provides the environment layer and the `ConfigBuilder` trait
//! that ties the layers together.
//!
//! # Example
//!
//! ```rust,ignore
//! use tooling::config::{env_parse, ConfigBuilder};
//!
//! #[derive(Clone, Default)]
//! struct ServerConfig {
//!     port: u16,
//! }
//!
//! impl ConfigBuilder for ServerConfig {
//!     fn apply_env(&mut self, prefix: &str) -> tooling::Result<()> {
//!         if let Some(port) = env_parse(&env_key(prefix, "port"))? {
//!             self.port = port;
//!         }
//!         Ok(())
//!     }
//! }
//! ```

mod builder;
mod env;

pub use builder::ConfigBuilder;
pub use env::{env_flag, env_key, env_list, env_parse, env_var};
