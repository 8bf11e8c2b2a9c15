//! Shared foundation for the taglens workspace: error types, configuration
//! loading and an optional logging bootstrap.

// --- Error Module ---
pub mod error;
pub use self::error::*;

// --- Config Module ---
pub mod config;
pub use self::config::*;

// --- Logging Module ---
pub mod logging;
