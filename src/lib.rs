//! Gatherly
//!
//! An event registration, attendance and lifecycle engine. This library
//! provides the capacity-aware registration workflow (public and private
//! events), QR-backed attendee credentials with scan-based attendance
//! confirmation, and the background scheduler that sends event reminders
//! and archives elapsed events.

pub mod config;
pub mod database;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{GatherlyError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
