//! Lifecycle scheduler integration tests
//!
//! Exercises the two sweeps directly rather than waiting on the cron
//! loop: archival (with credential-file cleanup) and reminder dispatch
//! (with the durable at-most-once ledger).

mod helpers;

use chrono::{Duration, NaiveTime, Utc};
use serial_test::serial;
use std::path::Path;
use std::sync::Arc;

use gatherly::config::EmailConfig;
use gatherly::database::DatabaseService;
use gatherly::models::event::EventVisibility;
use gatherly::scheduler::{archive, reminder};
use gatherly::services::{LogMailer, NotificationService};

use helpers::test_data::{
    build_services, create_event, create_event_on, create_user, RecordingMailer,
};
use helpers::TestDatabase;

#[tokio::test]
#[serial]
async fn test_archive_sweep_cascades_attendance_cleanup() {
    let db = TestDatabase::new().await.expect("Failed to create test database");
    let service_db = DatabaseService::new(db.pool.clone());
    let qr_dir = tempfile::tempdir().unwrap();
    let services = build_services(service_db.clone(), qr_dir.path(), Arc::new(LogMailer));

    let organizer = create_user(&service_db, "organizer").await;
    let attendee = create_user(&service_db, "attendee").await;

    let yesterday = Utc::now().date_naive() - Duration::days(1);
    let elapsed = create_event_on(&service_db, organizer.id, yesterday, None).await;
    let upcoming = create_event(&service_db, organizer.id, EventVisibility::Public, 5).await;

    services
        .registration_service
        .register(attendee.id, elapsed.id)
        .await
        .unwrap();
    services
        .registration_service
        .register(attendee.id, upcoming.id)
        .await
        .unwrap();

    let credential_path = service_db
        .attendees
        .find_by_user_and_event(attendee.id, elapsed.id)
        .await
        .unwrap()
        .unwrap()
        .qr_code_path
        .unwrap();
    assert!(Path::new(&credential_path).exists());

    let archived = archive::run_archive_sweep(&service_db).await.unwrap();
    assert_eq!(archived, 1);

    // The elapsed event is archived, its attendance data and credential
    // file are gone.
    let elapsed_row = service_db.events.find_by_id(elapsed.id).await.unwrap().unwrap();
    assert!(elapsed_row.is_archived);
    assert!(service_db
        .attendees
        .find_by_user_and_event(attendee.id, elapsed.id)
        .await
        .unwrap()
        .is_none());
    assert!(!Path::new(&credential_path).exists());

    // The upcoming event and its attendee are untouched.
    let upcoming_row = service_db.events.find_by_id(upcoming.id).await.unwrap().unwrap();
    assert!(!upcoming_row.is_archived);
    assert!(service_db
        .attendees
        .find_by_user_and_event(attendee.id, upcoming.id)
        .await
        .unwrap()
        .is_some());

    // A second sweep finds nothing left to do.
    assert_eq!(archive::run_archive_sweep(&service_db).await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn test_archive_sweep_uses_end_time_on_same_day() {
    let db = TestDatabase::new().await.expect("Failed to create test database");
    let service_db = DatabaseService::new(db.pool.clone());

    let organizer = create_user(&service_db, "organizer").await;
    let today = Utc::now().date_naive();

    let finished =
        create_event_on(&service_db, organizer.id, today, NaiveTime::from_hms_opt(0, 0, 1)).await;
    let open_ended = create_event_on(&service_db, organizer.id, today, None).await;

    let archived = archive::run_archive_sweep(&service_db).await.unwrap();
    assert_eq!(archived, 1);

    let finished_row = service_db.events.find_by_id(finished.id).await.unwrap().unwrap();
    assert!(finished_row.is_archived);

    // Without an end time, a same-day event is still in its window.
    let open_row = service_db.events.find_by_id(open_ended.id).await.unwrap().unwrap();
    assert!(!open_row.is_archived);
}

#[tokio::test]
#[serial]
async fn test_join_requests_survive_archival() {
    let db = TestDatabase::new().await.expect("Failed to create test database");
    let service_db = DatabaseService::new(db.pool.clone());
    let qr_dir = tempfile::tempdir().unwrap();
    let services = build_services(service_db.clone(), qr_dir.path(), Arc::new(LogMailer));

    let organizer = create_user(&service_db, "organizer").await;
    let requester = create_user(&service_db, "requester").await;

    let mut request = helpers::test_data::event_request(organizer.id, EventVisibility::Private, 5);
    request.event_date = Utc::now().date_naive() - Duration::days(1);
    let event = service_db.events.create(request).await.unwrap();

    services
        .registration_service
        .register(requester.id, event.id)
        .await
        .unwrap();

    archive::run_archive_sweep(&service_db).await.unwrap();

    // The request is kept as an audit record of the asked-and-undecided.
    assert_eq!(db.count_records("join_requests").await.unwrap(), 1);
    let event_row = service_db.events.find_by_id(event.id).await.unwrap().unwrap();
    assert!(event_row.is_archived);
}

#[tokio::test]
#[serial]
async fn test_reminder_sweep_is_at_most_once_per_pair() {
    let db = TestDatabase::new().await.expect("Failed to create test database");
    let service_db = DatabaseService::new(db.pool.clone());
    let qr_dir = tempfile::tempdir().unwrap();
    let services = build_services(service_db.clone(), qr_dir.path(), Arc::new(LogMailer));

    let mailer = Arc::new(RecordingMailer::default());
    let notifications = NotificationService::new(
        mailer.clone(),
        EmailConfig {
            from_address: "noreply@gatherly.local".to_string(),
        },
    );

    let organizer = create_user(&service_db, "organizer").await;
    let subscriber = create_user(&service_db, "subscriber").await;

    // Dated tomorrow by the fixture default.
    let event = create_event(&service_db, organizer.id, EventVisibility::Public, 5).await;

    services
        .event_service
        .subscribe_reminders(subscriber.id, event.id)
        .await
        .unwrap();

    let sent = reminder::run_reminder_sweep(&service_db, &notifications)
        .await
        .unwrap();
    assert_eq!(sent, 1);
    assert_eq!(mailer.sent_count(), 1);

    {
        let sent = mailer.sent.lock().unwrap();
        let (to, subject) = &sent[0];
        assert_eq!(to, &subscriber.email);
        assert!(subject.contains("is tomorrow!"));
    }

    // The second sweep finds the pair already claimed in reminder_log.
    let sent = reminder::run_reminder_sweep(&service_db, &notifications)
        .await
        .unwrap();
    assert_eq!(sent, 0);
    assert_eq!(mailer.sent_count(), 1);
    assert_eq!(db.count_records("reminder_log").await.unwrap(), 1);
}

#[tokio::test]
#[serial]
async fn test_reminder_sweep_skips_unsubscribed_and_distant_events() {
    let db = TestDatabase::new().await.expect("Failed to create test database");
    let service_db = DatabaseService::new(db.pool.clone());
    let qr_dir = tempfile::tempdir().unwrap();
    let services = build_services(service_db.clone(), qr_dir.path(), Arc::new(LogMailer));

    let mailer = Arc::new(RecordingMailer::default());
    let notifications = NotificationService::new(
        mailer.clone(),
        EmailConfig {
            from_address: "noreply@gatherly.local".to_string(),
        },
    );

    let organizer = create_user(&service_db, "organizer").await;
    let subscriber = create_user(&service_db, "subscriber").await;

    // One event tomorrow, one next week; subscribed to both, then the
    // toggle is flipped off for tomorrow's.
    let soon = create_event(&service_db, organizer.id, EventVisibility::Public, 5).await;
    let later = create_event_on(
        &service_db,
        organizer.id,
        Utc::now().date_naive() + Duration::days(7),
        None,
    )
    .await;

    for event_id in [soon.id, later.id] {
        services
            .event_service
            .subscribe_reminders(subscriber.id, event_id)
            .await
            .unwrap();
    }
    services
        .event_service
        .unsubscribe_reminders(subscriber.id, soon.id)
        .await
        .unwrap();

    let sent = reminder::run_reminder_sweep(&service_db, &notifications)
        .await
        .unwrap();
    assert_eq!(sent, 0, "no subscriber for tomorrow, later event not due");
    assert_eq!(mailer.sent_count(), 0);
    assert_eq!(db.count_records("reminder_log").await.unwrap(), 0);
}
