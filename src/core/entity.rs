//! Domain entities: users, resources, categories and ratings

use crate::core::error::ValidationError;
use crate::core::rating;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// User role
///
/// New accounts are always `Learner`; `Admin` is only ever assigned directly in
/// the data store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Learner,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Learner => "learner",
            Role::Admin => "admin",
        }
    }
}

/// Fixed set of resource categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "Mobile Development")]
    MobileDevelopment,
    #[serde(rename = "Data Science")]
    DataScience,
    #[serde(rename = "Machine Learning")]
    MachineLearning,
    #[serde(rename = "Programming Languages")]
    ProgrammingLanguages,
    #[serde(rename = "Database")]
    Database,
    #[serde(rename = "DevOps")]
    DevOps,
    #[serde(rename = "UI/UX Design")]
    UiUxDesign,
    #[serde(rename = "Cybersecurity")]
    Cybersecurity,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::WebDevelopment,
        Category::MobileDevelopment,
        Category::DataScience,
        Category::MachineLearning,
        Category::ProgrammingLanguages,
        Category::Database,
        Category::DevOps,
        Category::UiUxDesign,
        Category::Cybersecurity,
        Category::Other,
    ];

    /// Display label, which is also the wire and storage value
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::WebDevelopment => "Web Development",
            Category::MobileDevelopment => "Mobile Development",
            Category::DataScience => "Data Science",
            Category::MachineLearning => "Machine Learning",
            Category::ProgrammingLanguages => "Programming Languages",
            Category::Database => "Database",
            Category::DevOps => "DevOps",
            Category::UiUxDesign => "UI/UX Design",
            Category::Cybersecurity => "Cybersecurity",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    /// Exact match against the labels; no case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidCategory {
                value: s.to_string(),
            })
    }
}

/// A rating value, guaranteed to be an integer in 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RatingValue(u8);

impl RatingValue {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::InvalidRating)
        }
    }

    /// Parse from an arbitrary JSON value; only integral numbers are accepted
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ValidationError> {
        value
            .as_i64()
            .ok_or(ValidationError::InvalidRating)
            .and_then(Self::new)
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for RatingValue {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RatingValue> for i64 {
    fn from(value: RatingValue) -> Self {
        value.0 as i64
    }
}

/// One user's rating of a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user: Uuid,
    #[serde(rename = "rating")]
    pub value: RatingValue,
}

// =============================================================================
// User
// =============================================================================

/// Stored credential record
///
/// Carries the password hash, so it is never handed to the HTTP layer directly;
/// use [`User::to_public`] for responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Normalized to lowercase
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    #[serde(default)]
    pub bookmarks: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a freshly registered account.
    ///
    /// This is the only constructor used by registration and the role is fixed
    /// here; nothing copies a role from caller input.
    pub fn new_learner(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role: Role::Learner,
            bookmarks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Flip membership of `resource_id` in the bookmark set.
    ///
    /// Returns `true` when the resource is bookmarked after the call.
    pub fn toggle_bookmark(&mut self, resource_id: Uuid) -> bool {
        let bookmarked = toggle_member(&mut self.bookmarks, resource_id);
        self.updated_at = Utc::now();
        bookmarked
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            bookmarks: self.bookmarks.clone(),
            created_at: self.created_at,
        }
    }
}

/// User as exposed to callers, without the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub bookmarks: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Resource
// =============================================================================

/// Validated fields for a new resource
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub link: String,
}

/// Validated partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourcePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub link: Option<String>,
}

impl ResourcePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.link.is_none()
    }
}

/// A shared learning resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub link: String,
    /// Set once at creation
    pub created_by: Uuid,
    #[serde(default)]
    pub likes: Vec<Uuid>,
    #[serde(default)]
    pub ratings: Vec<Rating>,
    /// Always derived from `ratings`
    #[serde(default)]
    pub average_rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    pub fn new(draft: ResourceDraft, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            category: draft.category,
            link: draft.link,
            created_by,
            likes: Vec::new(),
            ratings: Vec::new(),
            average_rating: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.likes.contains(&user_id)
    }

    /// Flip `user_id`'s like. Returns `true` when the resource is liked after the call.
    pub fn toggle_like(&mut self, user_id: Uuid) -> bool {
        let liked = toggle_member(&mut self.likes, user_id);
        self.updated_at = Utc::now();
        liked
    }

    /// Record `user_id`'s rating, replacing any earlier one, and refresh the average.
    pub fn rate(&mut self, user_id: Uuid, value: RatingValue) {
        match self.ratings.iter_mut().find(|r| r.user == user_id) {
            Some(existing) => existing.value = value,
            None => self.ratings.push(Rating {
                user: user_id,
                value,
            }),
        }
        self.recompute_average();
        self.updated_at = Utc::now();
    }

    /// Re-derive `average_rating` from `ratings`
    pub fn recompute_average(&mut self) {
        self.average_rating = rating::average_rating(&self.ratings);
    }

    /// Apply a validated partial update. `created_by`, likes and ratings are
    /// not reachable through a patch.
    pub fn apply(&mut self, patch: &ResourcePatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(link) = &patch.link {
            self.link = link.clone();
        }
        self.updated_at = Utc::now();
    }
}

/// Flip membership of `id` in an ordered, duplicate-free set.
/// Returns `true` if `id` is present afterwards.
fn toggle_member(set: &mut Vec<Uuid>, id: Uuid) -> bool {
    if let Some(pos) = set.iter().position(|x| *x == id) {
        set.remove(pos);
        false
    } else {
        set.push(id);
        true
    }
}
