//! Reminder subscription model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user's subscription to reminder notifications for one event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventNotification {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub created_at: DateTime<Utc>,
}
