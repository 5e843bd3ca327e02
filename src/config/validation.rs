//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{GatherlyError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_credential_config(&settings.credentials)?;
    validate_scheduler_config(&settings.scheduler)?;
    validate_email_config(&settings.email)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(GatherlyError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(GatherlyError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(GatherlyError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate credential storage configuration
fn validate_credential_config(config: &super::CredentialConfig) -> Result<()> {
    if config.storage_dir.is_empty() {
        return Err(GatherlyError::Config(
            "Credential storage directory is required".to_string(),
        ));
    }

    // Anything shorter cannot carry the required 256 bits of entropy.
    if config.token_length < 43 {
        return Err(GatherlyError::Config(
            "Credential token length must be at least 43 symbols".to_string(),
        ));
    }

    Ok(())
}

/// Validate scheduler configuration
fn validate_scheduler_config(config: &super::SchedulerConfig) -> Result<()> {
    if config.tick_minutes == 0 || config.tick_minutes > 59 {
        return Err(GatherlyError::Config(
            "Scheduler tick must be between 1 and 59 minutes".to_string(),
        ));
    }

    Ok(())
}

/// Validate outbound email configuration
fn validate_email_config(config: &super::EmailConfig) -> Result<()> {
    if config.from_address.is_empty() || !config.from_address.contains('@') {
        return Err(GatherlyError::Config(
            "Email from address must be a valid address".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(GatherlyError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(GatherlyError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_tick() {
        let mut settings = Settings::default();
        settings.scheduler.tick_minutes = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_short_tokens() {
        let mut settings = Settings::default();
        settings.credentials.token_length = 16;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_bad_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
