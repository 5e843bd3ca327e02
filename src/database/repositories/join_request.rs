//! Join request repository implementation

use sqlx::{PgPool, Postgres, Transaction};

use crate::models::join_request::{JoinRequest, JoinRequestStatus};
use crate::utils::errors::GatherlyError;

const REQUEST_COLUMNS: &str = "id, user_id, event_id, status, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct JoinRequestRepository {
    pool: PgPool,
}

impl JoinRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a pending request for (user, event). Returns None when a
    /// request for the pair already exists, whatever its status.
    pub async fn create_pending(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<JoinRequest>, GatherlyError> {
        let request = sqlx::query_as::<_, JoinRequest>(&format!(
            r#"
            INSERT INTO join_requests (user_id, event_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, event_id) DO NOTHING
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Find request by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<JoinRequest>, GatherlyError> {
        let request = sqlx::query_as::<_, JoinRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM join_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Find the request for one (user, event) pair
    pub async fn find_by_user_and_event(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<JoinRequest>, GatherlyError> {
        let request = sqlx::query_as::<_, JoinRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM join_requests WHERE user_id = $1 AND event_id = $2"
        ))
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Move a request out of pending inside the approval transaction
    pub async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request_id: i64,
        status: JoinRequestStatus,
    ) -> Result<JoinRequest, GatherlyError> {
        let request = sqlx::query_as::<_, JoinRequest>(&format!(
            r#"
            UPDATE join_requests
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(request_id)
        .bind(status)
        .fetch_one(&mut **tx)
        .await?;

        Ok(request)
    }

    /// List requests awaiting a decision for an event
    pub async fn list_pending_for_event(
        &self,
        event_id: i64,
    ) -> Result<Vec<JoinRequest>, GatherlyError> {
        let requests = sqlx::query_as::<_, JoinRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM join_requests \
             WHERE event_id = $1 AND status = 'pending' ORDER BY created_at ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }
}
