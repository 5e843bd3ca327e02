//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{NaiveDate, NaiveTime};
use rand::rngs::OsRng;
use rand::Rng;

/// URL-safe alphabet used for credential tokens (RFC 4648 base64url symbols).
const TOKEN_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Default credential token length. 43 symbols of a 64-symbol alphabet
/// carry 258 bits of entropy, matching a 32-byte url-safe token.
pub const TOKEN_LENGTH: usize = 43;

/// Generate a URL-safe credential token from the operating system RNG.
pub fn generate_token(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..TOKEN_CHARSET.len());
            TOKEN_CHARSET[idx] as char
        })
        .collect()
}

/// Format an event's date and optional start time for user display.
pub fn format_event_schedule(date: NaiveDate, start_time: Option<NaiveTime>) -> String {
    match start_time {
        Some(time) => format!("{} at {}", date.format("%d %b %Y"), time.format("%H:%M")),
        None => date.format("%d %b %Y").to_string(),
    }
}
