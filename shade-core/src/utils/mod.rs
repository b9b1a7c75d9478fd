//! General utilities for Shade core.
//!
//! - [`fs`]: directory creation and optional file reads.
//! - [`paths`]: XDG and application directory resolution.

pub mod fs;
pub mod paths;

pub use fs::ensure_dir_exists;
