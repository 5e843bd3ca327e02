//! Test fixture builders and doubles

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use gatherly::config::Settings;
use gatherly::database::DatabaseService;
use gatherly::models::event::{CreateEventRequest, Event, EventMode, EventVisibility};
use gatherly::models::user::{CreateUserRequest, User};
use gatherly::services::{Mailer, ServiceFactory};
use gatherly::Result;

/// Create a user with a unique username and email
pub async fn create_user(db: &DatabaseService, name: &str) -> User {
    let suffix = Uuid::new_v4().simple().to_string();
    db.users
        .create(CreateUserRequest {
            username: format!("{name}_{}", &suffix[..8]),
            email: format!("{name}_{}@example.com", &suffix[..8]),
        })
        .await
        .expect("Failed to create test user")
}

/// A create-event request with sensible defaults, dated tomorrow
pub fn event_request(
    organizer_id: i64,
    visibility: EventVisibility,
    capacity: i32,
) -> CreateEventRequest {
    CreateEventRequest {
        title: "Test Swing Night".to_string(),
        description: Some("A test event".to_string()),
        event_date: Utc::now().date_naive() + Duration::days(1),
        start_time: NaiveTime::from_hms_opt(19, 0, 0),
        end_time: NaiveTime::from_hms_opt(22, 0, 0),
        mode: EventMode::Offline,
        visibility,
        venue: Some("Test Venue".to_string()),
        capacity,
        tag: Some("Social".to_string()),
        organizer_id,
    }
}

/// Insert an event directly through the repository (no validation), so
/// tests can create past-dated events for archival scenarios.
pub async fn create_event(
    db: &DatabaseService,
    organizer_id: i64,
    visibility: EventVisibility,
    capacity: i32,
) -> Event {
    db.events
        .create(event_request(organizer_id, visibility, capacity))
        .await
        .expect("Failed to create test event")
}

/// Insert an event with an explicit date and end time
pub async fn create_event_on(
    db: &DatabaseService,
    organizer_id: i64,
    date: NaiveDate,
    end_time: Option<NaiveTime>,
) -> Event {
    let mut request = event_request(organizer_id, EventVisibility::Public, 10);
    request.event_date = date;
    request.end_time = end_time;
    db.events
        .create(request)
        .await
        .expect("Failed to create test event")
}

/// Settings pointing credential storage at a test directory
pub fn test_settings(storage_dir: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.credentials.storage_dir = storage_dir.to_string_lossy().into_owned();
    settings
}

/// Build the full service stack over a test database
pub fn build_services(
    db: DatabaseService,
    storage_dir: &Path,
    mailer: Arc<dyn Mailer>,
) -> ServiceFactory {
    ServiceFactory::new(db, test_settings(storage_dir), mailer)
}

/// Mailer double that records every send
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_notification(&self, to: &str, subject: &str, _body: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string()));
        Ok(())
    }
}
