//! Reminder dispatch job
//!
//! For every non-archived event happening tomorrow, notify each
//! subscriber at most once. The reminder_log row is claimed before the
//! send, so a crash mid-sweep loses a reminder rather than duplicating
//! one; delivery is best-effort and failures are not retried.

use chrono::{Duration, Utc};
use tracing::{debug, warn};

use crate::database::DatabaseService;
use crate::services::NotificationService;
use crate::utils::errors::Result;

/// Run one reminder sweep. Returns how many reminders were dispatched.
pub async fn run_reminder_sweep(
    db: &DatabaseService,
    notifications: &NotificationService,
) -> Result<usize> {
    let tomorrow = Utc::now().date_naive() + Duration::days(1);
    let events = db.events.find_by_date(tomorrow).await?;

    if events.is_empty() {
        return Ok(0);
    }

    let mut dispatched = 0;
    for event in &events {
        let subscribers = db.notifications.list_subscribers(event.id).await?;

        for user in &subscribers {
            if !db.notifications.claim_reminder(event.id, user.id).await? {
                debug!(
                    event_id = event.id,
                    user_id = user.id,
                    "Reminder already sent, skipping"
                );
                continue;
            }

            // The claim above is the at-most-once guarantee; a failed
            // delivery is logged and the pair is still considered done.
            if let Err(e) = notifications.send_event_reminder(user, event).await {
                warn!(
                    event_id = event.id,
                    user_id = user.id,
                    error = %e,
                    "Reminder delivery failed, not retrying"
                );
            }
            dispatched += 1;
        }
    }

    Ok(dispatched)
}
