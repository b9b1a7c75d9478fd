//! Configuration management for Shade.
//!
//! - [`types`]: the [`ShadeConfig`] schema with its [`LoggingConfig`] and
//!   [`NotificationsConfig`] sections.
//! - [`defaults`]: default values used for missing fields.
//! - [`loader`]: [`ConfigLoader`], which merges the system and user files and validates.
//!
//! ```rust,ignore
//! use shade_core::config::ConfigLoader;
//!
//! match ConfigLoader::load() {
//!     Ok(config) => println!("log level: {}", config.logging.level),
//!     Err(e) => {
//!         shade_core::logging::init_minimal_logging();
//!         tracing::error!("Configuration loading failed: {}", e);
//!     }
//! }
//! ```

pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{LoggingConfig, NotificationsConfig, ShadeConfig};
