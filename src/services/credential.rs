//! Credential issuer implementation
//!
//! Issues the per-registration secret token and the scannable proof that
//! binds {attendee, user, event, token} together: a canonical JSON payload
//! rendered as a QR image on disk. Error-correction level L keeps the
//! code readable with roughly 7% of the image damaged.

use image::Luma;
use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::CredentialConfig;
use crate::utils::errors::Result;
use crate::utils::helpers;

/// The canonical proof payload. Key names and types are the wire format
/// scanners decode; they must round-trip exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialProof {
    pub attendee_id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub token: String,
    pub username: String,
    pub event_name: String,
}

/// A freshly issued credential
#[derive(Debug, Clone)]
pub struct IssuedCredential {
    pub token: String,
    pub payload: String,
    pub qr_code_path: String,
}

/// Credential issuer for attendee registrations
#[derive(Debug, Clone)]
pub struct CredentialIssuer {
    config: CredentialConfig,
}

impl CredentialIssuer {
    /// Create a new CredentialIssuer instance
    pub fn new(config: CredentialConfig) -> Self {
        Self { config }
    }

    /// Draw a fresh attendee token from the OS random source
    pub fn generate_token(&self) -> String {
        helpers::generate_token(self.config.token_length)
    }

    /// Encode and persist the QR proof for an attendee record.
    ///
    /// The token must be the one stored on the attendee row; the caller
    /// owns removing the written file if its transaction fails to commit.
    pub fn issue(
        &self,
        attendee_id: i64,
        user_id: i64,
        event_id: i64,
        token: &str,
        username: &str,
        event_name: &str,
    ) -> Result<IssuedCredential> {
        let proof = CredentialProof {
            attendee_id,
            user_id,
            event_id,
            token: token.to_string(),
            username: username.to_string(),
            event_name: event_name.to_string(),
        };
        let payload = serde_json::to_string(&proof)?;

        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::L)?;
        let img = code.render::<Luma<u8>>().build();

        std::fs::create_dir_all(&self.config.storage_dir)?;
        let path = self.credential_path(attendee_id, user_id, event_id);
        img.save(&path)?;

        debug!(
            attendee_id = attendee_id,
            path = %path.display(),
            "Credential proof issued"
        );

        Ok(IssuedCredential {
            token: token.to_string(),
            payload,
            qr_code_path: path.to_string_lossy().into_owned(),
        })
    }

    fn credential_path(&self, attendee_id: i64, user_id: i64, event_id: i64) -> PathBuf {
        Path::new(&self.config.storage_dir)
            .join(format!("qr_{user_id}_{event_id}_{attendee_id}.png"))
    }
}

/// Remove a credential image. A file that is already gone is skipped;
/// any other failure is logged and swallowed, since the owning record is
/// already deleted and the file is merely stale.
pub async fn remove_credential_file(path: &str) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = path, "Credential proof removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = path, "Credential proof already absent, skipping")
        }
        Err(e) => warn!(path = path, error = %e, "Failed to remove credential proof"),
    }
}
