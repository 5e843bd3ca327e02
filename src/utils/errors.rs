//! Error handling for Gatherly
//!
//! This module defines the main error type used throughout the application
//! and provides a unified error handling strategy. Request-path variants
//! carry the user-visible message in their display text.

use thiserror::Error;

/// Main error type for Gatherly operations
#[derive(Error, Debug)]
pub enum GatherlyError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Join request not found: {request_id}")]
    RequestNotFound { request_id: i64 },

    #[error("No attendee record matches the scanned credential")]
    AttendeeNotFound,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("You are already registered for this event")]
    AlreadyRegistered { event_id: i64 },

    #[error("Sorry, this event is full")]
    EventFull { event_id: i64 },

    #[error("Organizers cannot register for their own events")]
    SelfRegistration,

    #[error("You are not registered for this event")]
    NotRegistered { event_id: i64 },

    #[error("Event {event_id} has been archived")]
    EventArchived { event_id: i64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error("QR encoding error: {0}")]
    QrEncoding(#[from] qrcode::types::QrError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Gatherly operations
pub type Result<T> = std::result::Result<T, GatherlyError>;

impl GatherlyError {
    /// Whether the scheduler should treat this as a transient storage
    /// failure, to be skipped silently and retried on the next tick.
    pub fn is_transient_storage(&self) -> bool {
        match self {
            GatherlyError::Database(sqlx::Error::Database(e)) => {
                // 42P01: undefined_table, seen on first boot before the
                // schema exists.
                e.code().as_deref() == Some("42P01")
            }
            GatherlyError::Database(e) => matches!(
                e,
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        let err = GatherlyError::AlreadyRegistered { event_id: 7 };
        assert_eq!(err.to_string(), "You are already registered for this event");

        let err = GatherlyError::EventFull { event_id: 7 };
        assert_eq!(err.to_string(), "Sorry, this event is full");

        let err = GatherlyError::SelfRegistration;
        assert_eq!(
            err.to_string(),
            "Organizers cannot register for their own events"
        );
    }

    #[test]
    fn test_transient_classification() {
        let err = GatherlyError::EventNotFound { event_id: 1 };
        assert!(!err.is_transient_storage());

        let err = GatherlyError::Database(sqlx::Error::PoolTimedOut);
        assert!(err.is_transient_storage());
    }
}
