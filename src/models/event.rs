//! Event model
//!
//! Visibility and mode are closed enums mapped to Postgres enum types and
//! parsed once at the boundary; `capacity` is the live remaining-seat
//! counter, never negative.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::utils::errors::GatherlyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_mode", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventMode {
    Online,
    Offline,
}

impl fmt::Display for EventMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventMode::Online => write!(f, "online"),
            EventMode::Offline => write!(f, "offline"),
        }
    }
}

impl FromStr for EventMode {
    type Err = GatherlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "online" => Ok(EventMode::Online),
            "offline" => Ok(EventMode::Offline),
            other => Err(GatherlyError::InvalidInput(format!(
                "unknown event mode: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_visibility", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventVisibility {
    Public,
    Private,
}

impl fmt::Display for EventVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventVisibility::Public => write!(f, "public"),
            EventVisibility::Private => write!(f, "private"),
        }
    }
}

impl FromStr for EventVisibility {
    type Err = GatherlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(EventVisibility::Public),
            "private" => Ok(EventVisibility::Private),
            other => Err(GatherlyError::InvalidInput(format!(
                "unknown event visibility: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub mode: EventMode,
    pub visibility: EventVisibility,
    pub venue: Option<String>,
    pub capacity: i32,
    pub tag: Option<String>,
    pub organizer_id: i64,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub mode: EventMode,
    pub visibility: EventVisibility,
    pub venue: Option<String>,
    pub capacity: i32,
    pub tag: Option<String>,
    pub organizer_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub mode: Option<EventMode>,
    pub visibility: Option<EventVisibility>,
    pub venue: Option<String>,
    pub capacity: Option<i32>,
    pub tag: Option<String>,
}
