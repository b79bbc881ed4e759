//! Storage traits for users and resources
//!
//! Backends are agnostic to HTTP and authorization. Every read-modify-write
//! method (`toggle_like`, `upsert_rating`, `toggle_bookmark`, `apply_patch`) is
//! atomic per record: two concurrent calls on the same record never interleave
//! their read and write.

use crate::core::entity::{RatingValue, Resource, ResourcePatch, User};
use crate::core::query::{PageRequest, ResourceFilter, SortOrder};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Outcome of a like toggle
#[derive(Debug, Clone)]
pub struct LikeToggle {
    pub resource: Resource,
    /// Whether the caller likes the resource after the toggle
    pub liked: bool,
}

/// Outcome of a bookmark toggle
#[derive(Debug, Clone)]
pub struct BookmarkToggle {
    pub bookmarks: Vec<Uuid>,
    /// Whether the resource is bookmarked after the toggle
    pub bookmarked: bool,
}

/// Credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Returns `None` if the email is already registered.
    async fn create(&self, user: User) -> Result<Option<User>>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>>;

    /// Lookup by normalized (lowercase) email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Users with the given ids; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>>;

    /// All users, newest first
    async fn list(&self) -> Result<Vec<User>>;

    /// Flip `resource_id` in the user's bookmarks. `None` if the user is gone.
    async fn toggle_bookmark(
        &self,
        user_id: &Uuid,
        resource_id: &Uuid,
    ) -> Result<Option<BookmarkToggle>>;
}

/// Resource store
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn insert(&self, resource: Resource) -> Result<Resource>;

    async fn get(&self, id: &Uuid) -> Result<Option<Resource>>;

    /// Resources with the given ids, in the order of `ids`; unknown ids are skipped
    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<Resource>>;

    /// Matching resources in `sort` order, optionally restricted to one page
    async fn find(
        &self,
        filter: &ResourceFilter,
        sort: SortOrder,
        page: Option<PageRequest>,
    ) -> Result<Vec<Resource>>;

    /// Number of matching resources
    async fn count(&self, filter: &ResourceFilter) -> Result<usize>;

    /// Apply a validated patch. `None` if the resource is gone.
    async fn apply_patch(&self, id: &Uuid, patch: &ResourcePatch) -> Result<Option<Resource>>;

    /// Returns `true` if a resource was removed
    async fn delete(&self, id: &Uuid) -> Result<bool>;

    async fn toggle_like(&self, id: &Uuid, user_id: &Uuid) -> Result<Option<LikeToggle>>;

    /// Insert or overwrite `user_id`'s rating and refresh the average
    async fn upsert_rating(
        &self,
        id: &Uuid,
        user_id: &Uuid,
        value: RatingValue,
    ) -> Result<Option<Resource>>;
}
