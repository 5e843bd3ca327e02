//! Event service implementation
//!
//! Organizer-facing event management: create/update/delete with input
//! validation, the event detail view, the attendee roster, and the
//! reminder subscription toggle.

use tracing::{debug, info};

use crate::database::DatabaseService;
use crate::models::attendee::Attendee;
use crate::models::event::{CreateEventRequest, Event, UpdateEventRequest};
use crate::services::credential::remove_credential_file;
use crate::utils::errors::{GatherlyError, Result};

const TITLE_MIN: usize = 3;
const TITLE_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 1000;
const VENUE_MAX: usize = 150;
const CAPACITY_MAX: i32 = 10_000;

/// Event management service
#[derive(Clone)]
pub struct EventService {
    db: DatabaseService,
}

impl EventService {
    /// Create a new EventService instance
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Create a new event for an organizer
    pub async fn create_event(&self, mut request: CreateEventRequest) -> Result<Event> {
        request.title = request.title.trim().to_string();
        validate_event_fields(
            &request.title,
            request.description.as_deref(),
            request.venue.as_deref(),
            request.capacity,
            request.start_time.zip(request.end_time),
        )?;
        if request.event_date < chrono::Utc::now().date_naive() {
            return Err(GatherlyError::InvalidInput(
                "event date cannot be in the past".to_string(),
            ));
        }

        let organizer_id = request.organizer_id;
        self.db
            .users
            .find_by_id(organizer_id)
            .await?
            .ok_or(GatherlyError::UserNotFound {
                user_id: organizer_id,
            })?;

        let event = self.db.events.create(request).await?;
        info!(event_id = event.id, organizer_id = organizer_id, "Event created");

        Ok(event)
    }

    /// Update an event (organizer only, not after archival)
    pub async fn update_event(
        &self,
        event_id: i64,
        caller_id: i64,
        request: UpdateEventRequest,
    ) -> Result<Event> {
        let existing = self.require_organizer(event_id, caller_id, "update").await?;
        if existing.is_archived {
            return Err(GatherlyError::EventArchived { event_id });
        }

        let title = match &request.title {
            Some(t) => t.trim().to_string(),
            None => existing.title.clone(),
        };
        let times = request
            .start_time
            .or(existing.start_time)
            .zip(request.end_time.or(existing.end_time));
        validate_event_fields(
            &title,
            request.description.as_deref().or(existing.description.as_deref()),
            request.venue.as_deref().or(existing.venue.as_deref()),
            request.capacity.unwrap_or(existing.capacity),
            times,
        )?;

        let request = UpdateEventRequest {
            title: Some(title),
            ..request
        };
        let event = self.db.events.update(event_id, request).await?;
        info!(event_id = event_id, "Event updated");

        Ok(event)
    }

    /// Delete an event (organizer only). Attendee rows go with it via
    /// the schema cascade; their credential files are removed here.
    pub async fn delete_event(&self, event_id: i64, caller_id: i64) -> Result<()> {
        self.require_organizer(event_id, caller_id, "delete").await?;

        let attendees = self.db.attendees.list_for_event(event_id).await?;
        self.db.events.delete(event_id).await?;

        for attendee in &attendees {
            if let Some(path) = &attendee.qr_code_path {
                remove_credential_file(path).await;
            }
        }

        info!(event_id = event_id, "Event deleted");
        Ok(())
    }

    /// Fetch an event together with its current attendee count
    pub async fn get_event_with_count(&self, event_id: i64) -> Result<(Event, i64)> {
        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(GatherlyError::EventNotFound { event_id })?;
        let count = self.db.events.attendee_count(event_id).await?;

        Ok((event, count))
    }

    /// List an event's attendees
    pub async fn list_attendees(&self, event_id: i64) -> Result<Vec<Attendee>> {
        self.db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(GatherlyError::EventNotFound { event_id })?;

        self.db.attendees.list_for_event(event_id).await
    }

    /// Subscribe a user to reminder notifications for an event
    pub async fn subscribe_reminders(&self, user_id: i64, event_id: i64) -> Result<bool> {
        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(GatherlyError::EventNotFound { event_id })?;
        if event.is_archived {
            return Err(GatherlyError::EventArchived { event_id });
        }

        let created = self
            .db
            .notifications
            .subscribe(user_id, event_id)
            .await?
            .is_some();
        debug!(user_id = user_id, event_id = event_id, created = created, "Reminder toggle on");

        Ok(created)
    }

    /// Remove a user's reminder subscription for an event
    pub async fn unsubscribe_reminders(&self, user_id: i64, event_id: i64) -> Result<bool> {
        let removed = self.db.notifications.unsubscribe(user_id, event_id).await?;
        debug!(user_id = user_id, event_id = event_id, removed = removed, "Reminder toggle off");

        Ok(removed)
    }

    async fn require_organizer(
        &self,
        event_id: i64,
        caller_id: i64,
        action: &str,
    ) -> Result<Event> {
        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(GatherlyError::EventNotFound { event_id })?;

        if event.organizer_id != caller_id {
            return Err(GatherlyError::Unauthorized(format!(
                "only the event organizer can {action} this event"
            )));
        }

        Ok(event)
    }
}

/// Shared field checks for create and update
fn validate_event_fields(
    title: &str,
    description: Option<&str>,
    venue: Option<&str>,
    capacity: i32,
    times: Option<(chrono::NaiveTime, chrono::NaiveTime)>,
) -> Result<()> {
    if title.len() < TITLE_MIN || title.len() > TITLE_MAX {
        return Err(GatherlyError::InvalidInput(format!(
            "event title must be between {TITLE_MIN} and {TITLE_MAX} characters"
        )));
    }
    if let Some(description) = description {
        if description.len() > DESCRIPTION_MAX {
            return Err(GatherlyError::InvalidInput(format!(
                "event description must be at most {DESCRIPTION_MAX} characters"
            )));
        }
    }
    if let Some(venue) = venue {
        if venue.len() > VENUE_MAX {
            return Err(GatherlyError::InvalidInput(format!(
                "event venue must be at most {VENUE_MAX} characters"
            )));
        }
    }
    if capacity < 1 || capacity > CAPACITY_MAX {
        return Err(GatherlyError::InvalidInput(format!(
            "event capacity must be between 1 and {CAPACITY_MAX}"
        )));
    }
    if let Some((start, end)) = times {
        if end <= start {
            return Err(GatherlyError::InvalidInput(
                "event end time must be after its start time".to_string(),
            ));
        }
    }

    Ok(())
}
