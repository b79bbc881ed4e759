//! Raw request inputs and their conversion into validated domain values
//!
//! Inputs deserialize leniently (every field optional) so that a missing field
//! is reported as a field error rather than a JSON error. All checks run before
//! anything is written.

use super::filters::{normalize_email, trim, trim_to_none};
use super::validators::{http_url, max_chars, required};
use crate::core::entity::{Category, RatingValue, ResourceDraft, ResourcePatch};
use crate::core::error::{FieldValidationError, ValidationError};
use serde::Deserialize;
use validator::Validate;

const TITLE_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 500;
const URL_MESSAGE: &str = "Please provide a valid URL (must start with http:// or https://)";

type Check<'a> = &'a dyn Fn(&str) -> Result<(), String>;

/// Collects field errors across a whole input
#[derive(Debug, Default)]
struct FieldChecker {
    errors: Vec<FieldValidationError>,
}

impl FieldChecker {
    /// Run `checks` in order, recording the first failure for `field`
    fn check(&mut self, field: &str, value: &str, checks: &[Check<'_>]) -> bool {
        for check in checks {
            if let Err(message) = check(value) {
                self.push(field, message);
                return false;
            }
        }
        true
    }

    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldValidationError::new(field, message));
    }

    fn category(&mut self, value: &str) -> Option<Category> {
        match value.parse::<Category>() {
            Ok(category) => Some(category),
            Err(_) => {
                self.push("category", format!("'{}' is not a valid category", value));
                None
            }
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::FieldErrors(self.errors))
        }
    }
}

// =============================================================================
// Resources
// =============================================================================

/// Body of a create-resource request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewResourceInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub link: Option<String>,
}

impl NewResourceInput {
    pub fn validate(self) -> Result<ResourceDraft, ValidationError> {
        let title = trim(self.title).unwrap_or_default();
        let description = trim(self.description).unwrap_or_default();
        let category = trim(self.category).unwrap_or_default();
        let link = trim(self.link).unwrap_or_default();

        let mut checker = FieldChecker::default();
        checker.check(
            "title",
            &title,
            &[
                &required("Please provide a title"),
                &max_chars(TITLE_MAX, "Title cannot exceed 100 characters"),
            ],
        );
        checker.check(
            "description",
            &description,
            &[
                &required("Please provide a description"),
                &max_chars(DESCRIPTION_MAX, "Description cannot exceed 500 characters"),
            ],
        );
        let parsed_category = if checker.check(
            "category",
            &category,
            &[&required("Please provide a category")],
        ) {
            checker.category(&category)
        } else {
            None
        };
        checker.check(
            "link",
            &link,
            &[
                &required("Please provide a resource link"),
                &http_url(URL_MESSAGE),
            ],
        );
        checker.finish()?;

        Ok(ResourceDraft {
            title,
            description,
            category: parsed_category.ok_or(ValidationError::InvalidCategory { value: category })?,
            link,
        })
    }
}

/// Body of an update-resource request
///
/// Only the four editable fields are read; anything else in the body
/// (`createdBy`, `likes`, `ratings`, `averageRating`, ...) is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceUpdateInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub link: Option<String>,
}

impl ResourceUpdateInput {
    pub fn validate(self) -> Result<ResourcePatch, ValidationError> {
        let mut checker = FieldChecker::default();
        let mut patch = ResourcePatch::default();

        if let Some(title) = trim(self.title) {
            if checker.check(
                "title",
                &title,
                &[
                    &required("Please provide a title"),
                    &max_chars(TITLE_MAX, "Title cannot exceed 100 characters"),
                ],
            ) {
                patch.title = Some(title);
            }
        }
        if let Some(description) = trim(self.description) {
            if checker.check(
                "description",
                &description,
                &[
                    &required("Please provide a description"),
                    &max_chars(DESCRIPTION_MAX, "Description cannot exceed 500 characters"),
                ],
            ) {
                patch.description = Some(description);
            }
        }
        if let Some(category) = trim(self.category) {
            if checker.check("category", &category, &[&required("Please provide a category")]) {
                patch.category = checker.category(&category);
            }
        }
        if let Some(link) = trim(self.link) {
            if checker.check(
                "link",
                &link,
                &[
                    &required("Please provide a resource link"),
                    &http_url(URL_MESSAGE),
                ],
            ) {
                patch.link = Some(link);
            }
        }

        checker.finish()?;
        Ok(patch)
    }
}

/// Body of a rate request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RateInput {
    pub rating: Option<serde_json::Value>,
}

impl RateInput {
    pub fn validate(&self) -> Result<RatingValue, ValidationError> {
        match &self.rating {
            Some(value) => RatingValue::from_json(value),
            None => Err(ValidationError::InvalidRating),
        }
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// Body of a registration request
///
/// There is deliberately no `role` field: a role in the body is dropped by
/// deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Normalised registration, checked with `validator`
#[derive(Debug, Clone, Validate)]
pub struct Registration {
    #[validate(length(max = 50, message = "Name cannot exceed 50 characters"))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl RegisterInput {
    pub fn validate(self) -> Result<Registration, ValidationError> {
        let name = trim_to_none(self.name);
        let email = trim_to_none(self.email).map(|e| normalize_email(&e));
        let password = self.password.filter(|p| !p.is_empty());

        let mut checker = FieldChecker::default();
        if name.is_none() {
            checker.push("name", "Please provide a name");
        }
        if email.is_none() {
            checker.push("email", "Please provide an email");
        }
        if password.is_none() {
            checker.push("password", "Please provide a password");
        }
        checker.finish()?;

        let registration = Registration {
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default(),
        };
        registration
            .validate()
            .map_err(|errors| from_validator(&errors, &["name", "email", "password"]))?;
        Ok(registration)
    }
}

/// Body of a login request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginInput {
    /// Returns the normalised email and the raw password
    pub fn validate(self) -> Result<(String, String), ValidationError> {
        let email = trim_to_none(self.email).map(|e| normalize_email(&e));
        let password = self.password.filter(|p| !p.is_empty());
        match (email, password) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(ValidationError::FieldErrors(vec![FieldValidationError::new(
                "credentials",
                "Please provide email and password",
            )])),
        }
    }
}

/// Flatten `validator` output into field errors, in a stable field order
fn from_validator(errors: &validator::ValidationErrors, order: &[&str]) -> ValidationError {
    let by_field = errors.field_errors();
    let mut out = Vec::new();
    for field in order {
        if let Some(list) = by_field.get(*field) {
            for err in list.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                out.push(FieldValidationError::new(*field, message));
            }
        }
    }
    ValidationError::FieldErrors(out)
}
