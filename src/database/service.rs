//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{
    AttendeeRepository, DatabasePool, EventRepository, JoinRequestRepository,
    NotificationRepository, UserRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub pool: DatabasePool,
    pub users: UserRepository,
    pub events: EventRepository,
    pub attendees: AttendeeRepository,
    pub join_requests: JoinRequestRepository,
    pub notifications: NotificationRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            attendees: AttendeeRepository::new(pool.clone()),
            join_requests: JoinRequestRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool.clone()),
            pool,
        }
    }
}
