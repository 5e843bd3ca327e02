//! Attendee model
//!
//! An attendee row is the durable proof that one user holds a seat at one
//! event. The token is the secret binding the row to its scannable
//! credential; `attended` only ever moves false -> true.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendee {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub token: String,
    pub qr_code_path: Option<String>,
    pub attended: bool,
    pub registered_at: DateTime<Utc>,
}

/// The decoded contents of a scanned credential, matched field-for-field
/// against a stored attendee row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceClaim {
    pub attendee_id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub token: String,
}
