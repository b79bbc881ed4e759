//! Input normalisation applied before validation

/// Trim surrounding whitespace; a missing value stays missing
pub fn trim(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string())
}

/// Trim, then treat an empty result as absent
pub fn trim_to_none(value: Option<String>) -> Option<String> {
    trim(value).filter(|s| !s.is_empty())
}

/// Canonical form of an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
