//! Lifecycle scheduler
//!
//! Registers the two recurring background jobs: reminder dispatch and
//! auto-archival. Job errors never escape the closures, so a transient
//! storage failure (or a schema that does not exist yet on first boot)
//! skips a tick instead of killing the loop.

pub mod archive;
pub mod reminder;

use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, error, info};

use crate::config::SchedulerConfig;
use crate::database::DatabaseService;
use crate::services::NotificationService;
use crate::utils::errors::{GatherlyError, Result};
use crate::utils::logging::log_scheduler_run;

/// Start the background scheduler with both jobs registered.
///
/// Also runs one archival sweep immediately, so a process that was down
/// for a while catches up without waiting for the first tick.
pub async fn start(
    db: DatabaseService,
    notifications: NotificationService,
    config: &SchedulerConfig,
) -> Result<JobScheduler> {
    report("archive", archive::run_archive_sweep(&db).await);

    let scheduler = JobScheduler::new().await.map_err(scheduler_error)?;
    let cron = format!("0 */{} * * * *", config.tick_minutes);

    let reminder_db = db.clone();
    let reminder_notifications = notifications.clone();
    let reminder_job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let db = reminder_db.clone();
        let notifications = reminder_notifications.clone();
        Box::pin(async move {
            report("reminders", reminder::run_reminder_sweep(&db, &notifications).await);
        })
    })
    .map_err(scheduler_error)?;

    let archive_db = db.clone();
    let archive_job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let db = archive_db.clone();
        Box::pin(async move {
            report("archive", archive::run_archive_sweep(&db).await);
        })
    })
    .map_err(scheduler_error)?;

    scheduler.add(reminder_job).await.map_err(scheduler_error)?;
    scheduler.add(archive_job).await.map_err(scheduler_error)?;
    scheduler.start().await.map_err(scheduler_error)?;

    info!(
        tick_minutes = config.tick_minutes,
        "Lifecycle scheduler started (reminders + auto-archive)"
    );

    Ok(scheduler)
}

/// Log one sweep's outcome without letting any error escape.
fn report(job: &str, result: Result<usize>) {
    match result {
        Ok(0) => {}
        Ok(affected) => log_scheduler_run(job, affected),
        Err(e) if e.is_transient_storage() => {
            debug!(job = job, "Storage not ready, skipping sweep until next tick")
        }
        Err(e) => error!(job = job, error = %e, "Scheduler sweep failed"),
    }
}

fn scheduler_error(e: tokio_cron_scheduler::JobSchedulerError) -> GatherlyError {
    GatherlyError::Scheduler(e.to_string())
}
