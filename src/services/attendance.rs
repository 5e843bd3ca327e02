//! Attendance verifier implementation
//!
//! Validates a scanned credential against the stored attendee record and
//! flips the one-way attended flag. The token in the claim is the sole
//! secret binding the proof to the record; anything less than an exact
//! four-field match is treated as no record at all.

use tracing::{debug, info};

use crate::database::DatabaseService;
use crate::models::attendee::AttendanceClaim;
use crate::utils::errors::{GatherlyError, Result};

/// Outcome of an attendance confirmation scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendanceOutcome {
    /// First valid scan: the attended flag was just set.
    Confirmed {
        attendee_name: String,
        event_title: String,
    },
    /// The credential was already confirmed earlier. Not an error.
    AlreadyConfirmed {
        attendee_name: String,
        event_title: String,
    },
}

/// Attendance verification service
#[derive(Clone)]
pub struct AttendanceService {
    db: DatabaseService,
}

impl AttendanceService {
    /// Create a new AttendanceService instance
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Confirm attendance from a decoded credential scan.
    ///
    /// Only the event's organizer may confirm; a re-scan of an already
    /// confirmed credential reports `AlreadyConfirmed` and changes
    /// nothing.
    pub async fn mark_attended(
        &self,
        claim: &AttendanceClaim,
        caller_id: i64,
    ) -> Result<AttendanceOutcome> {
        debug!(
            attendee_id = claim.attendee_id,
            event_id = claim.event_id,
            "Attendance scan received"
        );

        let attendee = self
            .db
            .attendees
            .find_by_claim(claim)
            .await?
            .ok_or(GatherlyError::AttendeeNotFound)?;

        let event = self
            .db
            .events
            .find_by_id(attendee.event_id)
            .await?
            .ok_or(GatherlyError::EventNotFound {
                event_id: attendee.event_id,
            })?;

        if event.organizer_id != caller_id {
            return Err(GatherlyError::Unauthorized(
                "only the event organizer can confirm attendance".to_string(),
            ));
        }

        let user = self
            .db
            .users
            .find_by_id(attendee.user_id)
            .await?
            .ok_or(GatherlyError::UserNotFound {
                user_id: attendee.user_id,
            })?;

        if attendee.attended {
            return Ok(AttendanceOutcome::AlreadyConfirmed {
                attendee_name: user.username,
                event_title: event.title,
            });
        }

        self.db.attendees.mark_attended(attendee.id).await?;

        info!(
            attendee_id = attendee.id,
            event_id = event.id,
            "Attendance confirmed"
        );

        Ok(AttendanceOutcome::Confirmed {
            attendee_name: user.username,
            event_title: event.title,
        })
    }
}
