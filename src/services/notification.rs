//! Notification service implementation
//!
//! Formats reminder emails and hands them to the outbound `Mailer`
//! collaborator. The transport behind the trait (SMTP, an API, a queue)
//! is wired by the host process; the engine only depends on the seam.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::EmailConfig;
use crate::models::event::Event;
use crate::models::user::User;
use crate::utils::errors::Result;
use crate::utils::helpers::format_event_schedule;

/// Outbound email collaborator
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message. Failure means this attempt failed; callers
    /// decide whether the message is retried.
    async fn send_notification(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Mailer that only logs. Used in development and wherever no real
/// transport is configured.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_notification(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        info!(to = to, subject = subject, bytes = body.len(), "Mail send (log only)");
        Ok(())
    }
}

/// Notification service for reminder dispatch
#[derive(Clone)]
pub struct NotificationService {
    mailer: Arc<dyn Mailer>,
    config: EmailConfig,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(mailer: Arc<dyn Mailer>, config: EmailConfig) -> Self {
        Self { mailer, config }
    }

    /// Send a "happening tomorrow" reminder to one subscriber
    pub async fn send_event_reminder(&self, user: &User, event: &Event) -> Result<()> {
        let subject = format!("Reminder: {} is tomorrow!", event.title);
        let body = format!(
            "Hi {},\n\nThis is a reminder that '{}' is happening on {}.{}\n",
            user.username,
            event.title,
            format_event_schedule(event.event_date, event.start_time),
            event
                .venue
                .as_deref()
                .map(|venue| format!("\nLocation: {venue}"))
                .unwrap_or_default(),
        );

        match self
            .mailer
            .send_notification(&user.email, &subject, &body)
            .await
        {
            Ok(()) => {
                info!(
                    user_id = user.id,
                    event_id = event.id,
                    from = %self.config.from_address,
                    "Reminder sent"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    user_id = user.id,
                    event_id = event.id,
                    error = %e,
                    "Failed to send reminder"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use std::sync::Mutex;

    use crate::models::event::{EventMode, EventVisibility};

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send_notification(&self, to: &str, subject: &str, body: &str) -> Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string(), body.to_string()));
            Ok(())
        }
    }

    fn sample_event() -> Event {
        Event {
            id: 5,
            title: "Rust Meetup".to_string(),
            description: None,
            event_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(18, 30, 0),
            end_time: None,
            mode: EventMode::Offline,
            visibility: EventVisibility::Public,
            venue: Some("Community Hall".to_string()),
            capacity: 40,
            tag: None,
            organizer_id: 1,
            is_archived: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_user() -> User {
        User {
            id: 2,
            username: "dana".to_string(),
            email: "dana@example.com".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_reminder_formatting() {
        let mailer = Arc::new(RecordingMailer::default());
        let service = NotificationService::new(
            mailer.clone(),
            EmailConfig {
                from_address: "noreply@gatherly.local".to_string(),
            },
        );

        service
            .send_event_reminder(&sample_user(), &sample_event())
            .await
            .unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);

        let (to, subject, body) = &sent[0];
        assert_eq!(to, "dana@example.com");
        assert_eq!(subject, "Reminder: Rust Meetup is tomorrow!");
        assert!(body.contains("Hi dana"));
        assert!(body.contains("01 Jun 2024 at 18:30"));
        assert!(body.contains("Community Hall"));
    }
}
