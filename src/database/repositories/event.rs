//! Event repository implementation
//!
//! Seat accounting lives here: `reserve_seat` is the atomic
//! check-then-decrement of the capacity ledger and must always run inside
//! the transaction that creates the matching attendee row.

use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::event::{CreateEventRequest, Event, UpdateEventRequest};
use crate::utils::errors::GatherlyError;

const EVENT_COLUMNS: &str = "id, title, description, event_date, start_time, end_time, mode, \
     visibility, venue, capacity, tag, organizer_id, is_archived, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(&self, request: CreateEventRequest) -> Result<Event, GatherlyError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (title, description, event_date, start_time, end_time, mode,
                                visibility, venue, capacity, tag, organizer_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(request.title)
        .bind(request.description)
        .bind(request.event_date)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.mode)
        .bind(request.visibility)
        .bind(request.venue)
        .bind(request.capacity)
        .bind(request.tag)
        .bind(request.organizer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, GatherlyError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Update event fields; unset fields keep their stored value
    pub async fn update(&self, id: i64, request: UpdateEventRequest) -> Result<Event, GatherlyError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                event_date = COALESCE($4, event_date),
                start_time = COALESCE($5, start_time),
                end_time = COALESCE($6, end_time),
                mode = COALESCE($7, mode),
                visibility = COALESCE($8, visibility),
                venue = COALESCE($9, venue),
                capacity = COALESCE($10, capacity),
                tag = COALESCE($11, tag),
                updated_at = $12
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.event_date)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.mode)
        .bind(request.visibility)
        .bind(request.venue)
        .bind(request.capacity)
        .bind(request.tag)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete event; attendee rows follow via FK cascade
    pub async fn delete(&self, id: i64) -> Result<(), GatherlyError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count current attendees for an event
    pub async fn attendee_count(&self, event_id: i64) -> Result<i64, GatherlyError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM attendees WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    /// Atomically claim one seat. The conditional update is the capacity
    /// check and the decrement in a single statement; a false return
    /// means the event is full.
    pub async fn reserve_seat(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i64,
    ) -> Result<bool, GatherlyError> {
        let result = sqlx::query(
            "UPDATE events SET capacity = capacity - 1, updated_at = NOW() \
             WHERE id = $1 AND capacity > 0",
        )
        .bind(event_id)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Return a previously claimed seat to the pool
    pub async fn release_seat(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i64,
    ) -> Result<(), GatherlyError> {
        sqlx::query(
            "UPDATE events SET capacity = capacity + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(event_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Non-archived events happening on the given date
    pub async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<Event>, GatherlyError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE event_date = $1 AND NOT is_archived \
             ORDER BY id ASC"
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Non-archived events whose time window has fully elapsed: dated
    /// before today, or dated today with a set end time already past.
    pub async fn find_completed(
        &self,
        today: NaiveDate,
        now: NaiveTime,
    ) -> Result<Vec<Event>, GatherlyError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {EVENT_COLUMNS} FROM events
            WHERE NOT is_archived
              AND (event_date < $1
                   OR (event_date = $1 AND end_time IS NOT NULL AND end_time < $2))
            ORDER BY id ASC
            "#
        ))
        .bind(today)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Mark an event archived. One-way; archived events are never revived.
    pub async fn archive(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i64,
    ) -> Result<(), GatherlyError> {
        sqlx::query(
            "UPDATE events SET is_archived = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(event_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
