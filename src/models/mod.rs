//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod attendee;
pub mod event;
pub mod join_request;
pub mod notification;
pub mod user;

// Re-export commonly used models
pub use attendee::{Attendee, AttendanceClaim};
pub use event::{CreateEventRequest, Event, EventMode, EventVisibility, UpdateEventRequest};
pub use join_request::{JoinRequest, JoinRequestStatus};
pub use notification::EventNotification;
pub use user::{CreateUserRequest, User};
