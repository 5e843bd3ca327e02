//! Attendee repository implementation

use sqlx::{PgPool, Postgres, Transaction};

use crate::models::attendee::{Attendee, AttendanceClaim};
use crate::utils::errors::GatherlyError;

const ATTENDEE_COLUMNS: &str =
    "id, user_id, event_id, token, qr_code_path, attended, registered_at";

#[derive(Debug, Clone)]
pub struct AttendeeRepository {
    pool: PgPool,
}

impl AttendeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an attendee row inside the registration transaction
    pub async fn insert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: i64,
        event_id: i64,
        token: &str,
    ) -> Result<Attendee, GatherlyError> {
        let attendee = sqlx::query_as::<_, Attendee>(&format!(
            r#"
            INSERT INTO attendees (user_id, event_id, token)
            VALUES ($1, $2, $3)
            RETURNING {ATTENDEE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(event_id)
        .bind(token)
        .fetch_one(&mut **tx)
        .await?;

        Ok(attendee)
    }

    /// Record the credential image path for an attendee
    pub async fn set_qr_path(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        attendee_id: i64,
        path: &str,
    ) -> Result<(), GatherlyError> {
        sqlx::query("UPDATE attendees SET qr_code_path = $2 WHERE id = $1")
            .bind(attendee_id)
            .bind(path)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Find an attendee row for one (user, event) pair
    pub async fn find_by_user_and_event(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<Attendee>, GatherlyError> {
        let attendee = sqlx::query_as::<_, Attendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM attendees WHERE user_id = $1 AND event_id = $2"
        ))
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendee)
    }

    /// Find the attendee row matching a scanned credential. All four
    /// fields must match exactly; the token is the secret that binds the
    /// proof to the record.
    pub async fn find_by_claim(
        &self,
        claim: &AttendanceClaim,
    ) -> Result<Option<Attendee>, GatherlyError> {
        let attendee = sqlx::query_as::<_, Attendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM attendees \
             WHERE id = $1 AND event_id = $2 AND user_id = $3 AND token = $4"
        ))
        .bind(claim.attendee_id)
        .bind(claim.event_id)
        .bind(claim.user_id)
        .bind(&claim.token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendee)
    }

    /// Flip the one-way attended flag
    pub async fn mark_attended(&self, attendee_id: i64) -> Result<(), GatherlyError> {
        sqlx::query("UPDATE attendees SET attended = TRUE WHERE id = $1")
            .bind(attendee_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete one attendee row inside the unregistration transaction
    pub async fn delete(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        attendee_id: i64,
    ) -> Result<(), GatherlyError> {
        sqlx::query("DELETE FROM attendees WHERE id = $1")
            .bind(attendee_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// List an event's attendees
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<Attendee>, GatherlyError> {
        let attendees = sqlx::query_as::<_, Attendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM attendees WHERE event_id = $1 \
             ORDER BY registered_at ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attendees)
    }

    /// Delete every attendee row for an event inside the archival
    /// transaction, returning the credential image paths that need
    /// removal once the transaction commits.
    pub async fn delete_for_event(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i64,
    ) -> Result<Vec<String>, GatherlyError> {
        let paths: Vec<(Option<String>,)> = sqlx::query_as(
            "DELETE FROM attendees WHERE event_id = $1 RETURNING qr_code_path",
        )
        .bind(event_id)
        .fetch_all(&mut **tx)
        .await?;

        Ok(paths.into_iter().filter_map(|(path,)| path).collect())
    }
}
