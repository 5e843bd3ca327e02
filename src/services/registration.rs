//! Registration workflow implementation
//!
//! The state machine governing how a user becomes an attendee: direct
//! registration for public events, request/approve/reject for private
//! ones, and unregistration. Every path that touches the seat counter
//! runs inside one transaction with the attendee mutation it pays for,
//! so a failure after the reservation can never strand a decremented
//! seat.

use tracing::{debug, info, warn};

use crate::database::DatabaseService;
use crate::models::event::EventVisibility;
use crate::models::join_request::{JoinRequest, JoinRequestStatus};
use crate::services::credential::{remove_credential_file, CredentialIssuer};
use crate::utils::errors::{GatherlyError, Result};

/// Successful outcomes of a registration call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// A seat was claimed and a credential issued.
    Registered {
        attendee_id: i64,
        qr_code_path: String,
    },
    /// Private event: a join request is awaiting the organizer.
    PendingApproval,
}

/// Successful outcomes of an approval call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// The request was approved. `attendee_id` is None when the user had
    /// already become an attendee through some earlier path.
    Approved { attendee_id: Option<i64> },
    /// The request had already left pending; nothing changed.
    AlreadyDecided { status: JoinRequestStatus },
}

/// Registration workflow service
#[derive(Clone)]
pub struct RegistrationService {
    db: DatabaseService,
    issuer: CredentialIssuer,
}

impl RegistrationService {
    /// Create a new RegistrationService instance
    pub fn new(db: DatabaseService, issuer: CredentialIssuer) -> Self {
        Self { db, issuer }
    }

    /// Register a user for an event.
    ///
    /// Public events claim a seat and issue a credential immediately;
    /// private events record a pending join request and claim nothing.
    pub async fn register(&self, user_id: i64, event_id: i64) -> Result<RegistrationOutcome> {
        debug!(user_id = user_id, event_id = event_id, "Registration attempt");

        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(GatherlyError::EventNotFound { event_id })?;

        if event.is_archived {
            return Err(GatherlyError::EventArchived { event_id });
        }
        if event.organizer_id == user_id {
            return Err(GatherlyError::SelfRegistration);
        }
        if self
            .db
            .attendees
            .find_by_user_and_event(user_id, event_id)
            .await?
            .is_some()
        {
            return Err(GatherlyError::AlreadyRegistered { event_id });
        }

        match event.visibility {
            EventVisibility::Private => {
                // Re-requesting is idempotent: an existing request of any
                // status short-circuits, and the unique constraint covers
                // the race between the lookup and the insert.
                if self
                    .db
                    .join_requests
                    .find_by_user_and_event(user_id, event_id)
                    .await?
                    .is_none()
                {
                    self.db.join_requests.create_pending(user_id, event_id).await?;
                    info!(user_id = user_id, event_id = event_id, "Join request created");
                }
                Ok(RegistrationOutcome::PendingApproval)
            }
            EventVisibility::Public => {
                let user = self
                    .db
                    .users
                    .find_by_id(user_id)
                    .await?
                    .ok_or(GatherlyError::UserNotFound { user_id })?;

                let mut tx = self.db.pool.begin().await?;

                if !self.db.events.reserve_seat(&mut tx, event_id).await? {
                    return Err(GatherlyError::EventFull { event_id });
                }

                let token = self.issuer.generate_token();
                let attendee = self
                    .db
                    .attendees
                    .insert(&mut tx, user_id, event_id, &token)
                    .await?;
                let issued = self.issuer.issue(
                    attendee.id,
                    user_id,
                    event_id,
                    &token,
                    &user.username,
                    &event.title,
                )?;

                if let Err(e) = self
                    .db
                    .attendees
                    .set_qr_path(&mut tx, attendee.id, &issued.qr_code_path)
                    .await
                {
                    remove_credential_file(&issued.qr_code_path).await;
                    return Err(e);
                }
                if let Err(e) = tx.commit().await {
                    remove_credential_file(&issued.qr_code_path).await;
                    return Err(e.into());
                }

                info!(
                    user_id = user_id,
                    event_id = event_id,
                    attendee_id = attendee.id,
                    "User registered for event"
                );

                Ok(RegistrationOutcome::Registered {
                    attendee_id: attendee.id,
                    qr_code_path: issued.qr_code_path,
                })
            }
        }
    }

    /// Approve a pending join request (organizer only).
    ///
    /// If the event filled up while the request waited, the call fails
    /// with `EventFull` and the request stays pending so the organizer
    /// can retry once a seat frees up.
    pub async fn approve(&self, request_id: i64, caller_id: i64) -> Result<ApprovalOutcome> {
        let request = self
            .db
            .join_requests
            .find_by_id(request_id)
            .await?
            .ok_or(GatherlyError::RequestNotFound { request_id })?;
        let event = self
            .db
            .events
            .find_by_id(request.event_id)
            .await?
            .ok_or(GatherlyError::EventNotFound {
                event_id: request.event_id,
            })?;

        if event.organizer_id != caller_id {
            return Err(GatherlyError::Unauthorized(
                "only the event organizer can approve join requests".to_string(),
            ));
        }
        if request.status != JoinRequestStatus::Pending {
            debug!(request_id = request_id, status = %request.status, "Approve is a no-op");
            return Ok(ApprovalOutcome::AlreadyDecided {
                status: request.status,
            });
        }

        let already_attending = self
            .db
            .attendees
            .find_by_user_and_event(request.user_id, request.event_id)
            .await?
            .is_some();

        let mut tx = self.db.pool.begin().await?;
        let mut issued_path: Option<String> = None;
        let mut attendee_id = None;

        if !already_attending {
            if !self.db.events.reserve_seat(&mut tx, request.event_id).await? {
                // Dropping the transaction rolls everything back; the
                // request is left pending for a later retry.
                warn!(
                    request_id = request_id,
                    event_id = request.event_id,
                    "Approval denied: event filled while request was pending"
                );
                return Err(GatherlyError::EventFull {
                    event_id: request.event_id,
                });
            }

            let user = self
                .db
                .users
                .find_by_id(request.user_id)
                .await?
                .ok_or(GatherlyError::UserNotFound {
                    user_id: request.user_id,
                })?;

            let token = self.issuer.generate_token();
            let attendee = self
                .db
                .attendees
                .insert(&mut tx, request.user_id, request.event_id, &token)
                .await?;
            let issued = self.issuer.issue(
                attendee.id,
                request.user_id,
                request.event_id,
                &token,
                &user.username,
                &event.title,
            )?;

            if let Err(e) = self
                .db
                .attendees
                .set_qr_path(&mut tx, attendee.id, &issued.qr_code_path)
                .await
            {
                remove_credential_file(&issued.qr_code_path).await;
                return Err(e);
            }

            attendee_id = Some(attendee.id);
            issued_path = Some(issued.qr_code_path);
        }

        self.db
            .join_requests
            .set_status(&mut tx, request_id, JoinRequestStatus::Approved)
            .await?;

        if let Err(e) = tx.commit().await {
            if let Some(path) = issued_path {
                remove_credential_file(&path).await;
            }
            return Err(e.into());
        }

        info!(
            request_id = request_id,
            event_id = request.event_id,
            user_id = request.user_id,
            "Join request approved"
        );

        Ok(ApprovalOutcome::Approved { attendee_id })
    }

    /// Reject a pending join request (organizer only). Idempotent on a
    /// request that has already been decided; returns the request as it
    /// stands after the call.
    pub async fn reject(&self, request_id: i64, caller_id: i64) -> Result<JoinRequest> {
        let request = self
            .db
            .join_requests
            .find_by_id(request_id)
            .await?
            .ok_or(GatherlyError::RequestNotFound { request_id })?;
        let event = self
            .db
            .events
            .find_by_id(request.event_id)
            .await?
            .ok_or(GatherlyError::EventNotFound {
                event_id: request.event_id,
            })?;

        if event.organizer_id != caller_id {
            return Err(GatherlyError::Unauthorized(
                "only the event organizer can reject join requests".to_string(),
            ));
        }
        if request.status != JoinRequestStatus::Pending {
            debug!(request_id = request_id, status = %request.status, "Reject is a no-op");
            return Ok(request);
        }

        let mut tx = self.db.pool.begin().await?;
        let request = self
            .db
            .join_requests
            .set_status(&mut tx, request_id, JoinRequestStatus::Rejected)
            .await?;
        tx.commit().await?;

        info!(request_id = request_id, event_id = request.event_id, "Join request rejected");

        Ok(request)
    }

    /// Unregister a user from an event: delete the attendee row, release
    /// the seat, and remove the credential file. Join-request history is
    /// left untouched.
    pub async fn unregister(&self, user_id: i64, event_id: i64) -> Result<()> {
        let attendee = self
            .db
            .attendees
            .find_by_user_and_event(user_id, event_id)
            .await?
            .ok_or(GatherlyError::NotRegistered { event_id })?;

        let mut tx = self.db.pool.begin().await?;
        self.db.attendees.delete(&mut tx, attendee.id).await?;
        self.db.events.release_seat(&mut tx, event_id).await?;
        tx.commit().await?;

        if let Some(path) = &attendee.qr_code_path {
            remove_credential_file(path).await;
        }

        info!(
            user_id = user_id,
            event_id = event_id,
            attendee_id = attendee.id,
            "User unregistered from event"
        );

        Ok(())
    }
}
