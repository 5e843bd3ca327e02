//! Auto-archival job
//!
//! Archives every event whose time window has fully elapsed and cascades
//! the cleanup of its live attendance data. One transaction covers the
//! whole sweep: if it fails nothing is kept and the sweep reruns on the
//! next tick. Credential files are removed only after the commit.

use chrono::Utc;
use tracing::info;

use crate::database::DatabaseService;
use crate::services::credential::remove_credential_file;
use crate::utils::errors::Result;

/// Run one archival sweep. Returns how many events were archived.
pub async fn run_archive_sweep(db: &DatabaseService) -> Result<usize> {
    let now = Utc::now();
    let completed = db.events.find_completed(now.date_naive(), now.time()).await?;

    if completed.is_empty() {
        return Ok(0);
    }

    let mut tx = db.pool.begin().await?;
    let mut stale_files = Vec::new();

    for event in &completed {
        info!(event_id = event.id, title = %event.title, "Archiving completed event");
        db.events.archive(&mut tx, event.id).await?;
        stale_files.extend(db.attendees.delete_for_event(&mut tx, event.id).await?);
    }

    tx.commit().await?;

    for path in &stale_files {
        remove_credential_file(path).await;
    }

    Ok(completed.len())
}
