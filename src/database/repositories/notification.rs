//! Reminder subscription repository implementation
//!
//! Also owns the reminder_log ledger: a (event, user) pair is claimed
//! there before any send attempt, which is what makes reminder dispatch
//! at-most-once across process restarts.

use sqlx::PgPool;

use crate::models::notification::EventNotification;
use crate::models::user::User;
use crate::utils::errors::GatherlyError;

#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Subscribe a user to an event's reminders. Duplicate subscriptions
    /// are a no-op; returns the new subscription row, or None when one
    /// already existed.
    pub async fn subscribe(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<EventNotification>, GatherlyError> {
        let subscription = sqlx::query_as::<_, EventNotification>(
            r#"
            INSERT INTO event_notifications (user_id, event_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, event_id) DO NOTHING
            RETURNING id, user_id, event_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    /// Remove a user's subscription; returns whether one existed.
    pub async fn unsubscribe(&self, user_id: i64, event_id: i64) -> Result<bool, GatherlyError> {
        let result =
            sqlx::query("DELETE FROM event_notifications WHERE user_id = $1 AND event_id = $2")
                .bind(user_id)
                .bind(event_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Users subscribed to an event's reminders
    pub async fn list_subscribers(&self, event_id: i64) -> Result<Vec<User>, GatherlyError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.email, u.created_at, u.updated_at
            FROM users u
            INNER JOIN event_notifications n ON n.user_id = u.id
            WHERE n.event_id = $1
            ORDER BY u.id ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Claim the reminder slot for (event, user). True means the caller
    /// now owns the one send allowed for the pair; false means it was
    /// already claimed.
    pub async fn claim_reminder(&self, event_id: i64, user_id: i64) -> Result<bool, GatherlyError> {
        let result = sqlx::query(
            r#"
            INSERT INTO reminder_log (event_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (event_id, user_id) DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
