//! # Shade Core Library (`shade-core`)
//!
//! Infrastructure shared by the Shade crates:
//!
//! - **Error handling**: [`CoreError`] with the more specific [`ConfigError`] and [`LoggingError`].
//! - **Configuration**: TOML loading with system/user merging and validation via [`ConfigLoader`].
//! - **Logging**: `tracing` subscribers for console and rolling file output.
//! - **Types**: [`Color`] with the contrast math used for notification accents.
//! - **Utilities**: filesystem and XDG path helpers.
//!
//! ```rust,ignore
//! use shade_core::config::ConfigLoader;
//! use shade_core::logging::init_logging;
//! use shade_core::error::CoreError;
//!
//! fn main() -> Result<(), CoreError> {
//!     let config = ConfigLoader::load()?;
//!     init_logging(&config.logging, false)?;
//!     tracing::info!("Shade core initialized.");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

pub use config::{ConfigLoader, LoggingConfig, NotificationsConfig, ShadeConfig};
pub use error::{ConfigError, CoreError, LoggingError};
pub use logging::{init_logging, init_minimal_logging};
pub use types::Color;
