//! Services module
//!
//! This module contains business logic services

pub mod attendance;
pub mod credential;
pub mod event;
pub mod notification;
pub mod registration;

// Re-export commonly used services
pub use attendance::{AttendanceOutcome, AttendanceService};
pub use credential::{CredentialIssuer, CredentialProof, IssuedCredential};
pub use event::EventService;
pub use notification::{LogMailer, Mailer, NotificationService};
pub use registration::{ApprovalOutcome, RegistrationOutcome, RegistrationService};

use std::sync::Arc;

use crate::config::Settings;
use crate::database::DatabaseService;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub event_service: EventService,
    pub registration_service: RegistrationService,
    pub attendance_service: AttendanceService,
    pub notification_service: NotificationService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(db: DatabaseService, settings: Settings, mailer: Arc<dyn Mailer>) -> Self {
        let issuer = CredentialIssuer::new(settings.credentials.clone());

        Self {
            event_service: EventService::new(db.clone()),
            registration_service: RegistrationService::new(db.clone(), issuer),
            attendance_service: AttendanceService::new(db),
            notification_service: NotificationService::new(mailer, settings.email),
        }
    }
}
