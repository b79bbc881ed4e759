//! Reusable field validators
//!
//! Each validator inspects an already-trimmed string and returns the message to
//! report when the value is rejected.

use regex::Regex;
use std::sync::OnceLock;

/// Validator: value must not be empty
pub fn required(message: &'static str) -> impl Fn(&str) -> Result<(), String> + Send + Sync + Clone {
    move |value: &str| {
        if value.is_empty() {
            Err(message.to_string())
        } else {
            Ok(())
        }
    }
}

/// Validator: value must not exceed `max` characters
pub fn max_chars(
    max: usize,
    message: &'static str,
) -> impl Fn(&str) -> Result<(), String> + Send + Sync + Clone {
    move |value: &str| {
        if value.chars().count() > max {
            Err(message.to_string())
        } else {
            Ok(())
        }
    }
}

/// Validator: value must be an `http://` or `https://` URL
pub fn http_url(message: &'static str) -> impl Fn(&str) -> Result<(), String> + Send + Sync + Clone {
    move |value: &str| {
        if is_http_url(value) {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }
}

/// `http(s)://` followed by at least one character
pub fn is_http_url(value: &str) -> bool {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = URL_REGEX.get_or_init(|| Regex::new(r"^https?://.+").expect("static regex"));
    regex.is_match(value)
}
