//! Repository modules for database operations

pub mod attendee;
pub mod event;
pub mod join_request;
pub mod notification;
pub mod user;

pub use attendee::AttendeeRepository;
pub use event::EventRepository;
pub use join_request::JoinRequestRepository;
pub use notification::NotificationRepository;
pub use user::UserRepository;
