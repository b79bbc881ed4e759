//! In-memory implementation of the user and resource stores
//!
//! Used for testing and development. Every read-modify-write runs entirely
//! under the table's write lock, which makes it atomic per record.

use crate::core::entity::{RatingValue, Resource, ResourcePatch, User};
use crate::core::query::{PageRequest, ResourceFilter, SortOrder};
use crate::core::store::{BookmarkToggle, LikeToggle, ResourceStore, UserStore};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Default)]
struct UserTable {
    by_id: HashMap<Uuid, User>,
    /// Normalized email -> id
    by_email: HashMap<String, Uuid>,
}

/// In-memory store for users and resources
///
/// Clones share the same underlying tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    users: Arc<RwLock<UserTable>>,
    resources: Arc<RwLock<HashMap<Uuid, Resource>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_users(&self) -> Result<RwLockReadGuard<'_, UserTable>> {
        self.users
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))
    }

    fn write_users(&self) -> Result<RwLockWriteGuard<'_, UserTable>> {
        self.users
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))
    }

    fn read_resources(&self) -> Result<RwLockReadGuard<'_, HashMap<Uuid, Resource>>> {
        self.resources
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))
    }

    fn write_resources(&self) -> Result<RwLockWriteGuard<'_, HashMap<Uuid, Resource>>> {
        self.resources
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))
    }

    /// Run `f` on one resource under the write lock
    fn modify_resource<T>(&self, id: &Uuid, f: impl FnOnce(&mut Resource) -> T) -> Result<Option<T>> {
        let mut resources = self.write_resources()?;
        Ok(resources.get_mut(id).map(f))
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create(&self, user: User) -> Result<Option<User>> {
        let mut table = self.write_users()?;
        if table.by_email.contains_key(&user.email) {
            return Ok(None);
        }
        table.by_email.insert(user.email.clone(), user.id);
        table.by_id.insert(user.id, user.clone());
        Ok(Some(user))
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        Ok(self.read_users()?.by_id.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let table = self.read_users()?;
        Ok(table
            .by_email
            .get(email)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        let table = self.read_users()?;
        Ok(ids.iter().filter_map(|id| table.by_id.get(id)).cloned().collect())
    }

    async fn list(&self) -> Result<Vec<User>> {
        let table = self.read_users()?;
        let mut users: Vec<User> = table.by_id.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn toggle_bookmark(
        &self,
        user_id: &Uuid,
        resource_id: &Uuid,
    ) -> Result<Option<BookmarkToggle>> {
        let mut table = self.write_users()?;
        Ok(table.by_id.get_mut(user_id).map(|user| {
            let bookmarked = user.toggle_bookmark(*resource_id);
            BookmarkToggle {
                bookmarks: user.bookmarks.clone(),
                bookmarked,
            }
        }))
    }
}

#[async_trait]
impl ResourceStore for InMemoryStore {
    async fn insert(&self, resource: Resource) -> Result<Resource> {
        self.write_resources()?.insert(resource.id, resource.clone());
        Ok(resource)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Resource>> {
        Ok(self.read_resources()?.get(id).cloned())
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<Resource>> {
        let resources = self.read_resources()?;
        Ok(ids.iter().filter_map(|id| resources.get(id)).cloned().collect())
    }

    async fn find(
        &self,
        filter: &ResourceFilter,
        sort: SortOrder,
        page: Option<PageRequest>,
    ) -> Result<Vec<Resource>> {
        let resources = self.read_resources()?;
        let mut matching: Vec<&Resource> = resources.values().filter(|r| filter.matches(r)).collect();
        matching.sort_by(|a, b| sort.compare(a, b));

        let (skip, take) = match page {
            Some(p) => (p.offset(), p.limit),
            None => (0, usize::MAX),
        };
        Ok(matching.into_iter().skip(skip).take(take).cloned().collect())
    }

    async fn count(&self, filter: &ResourceFilter) -> Result<usize> {
        Ok(self
            .read_resources()?
            .values()
            .filter(|r| filter.matches(r))
            .count())
    }

    async fn apply_patch(&self, id: &Uuid, patch: &ResourcePatch) -> Result<Option<Resource>> {
        self.modify_resource(id, |r| {
            r.apply(patch);
            r.clone()
        })
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        Ok(self.write_resources()?.remove(id).is_some())
    }

    async fn toggle_like(&self, id: &Uuid, user_id: &Uuid) -> Result<Option<LikeToggle>> {
        self.modify_resource(id, |r| {
            let liked = r.toggle_like(*user_id);
            LikeToggle {
                resource: r.clone(),
                liked,
            }
        })
    }

    async fn upsert_rating(
        &self,
        id: &Uuid,
        user_id: &Uuid,
        value: RatingValue,
    ) -> Result<Option<Resource>> {
        self.modify_resource(id, |r| {
            r.rate(*user_id, value);
            r.clone()
        })
    }
}
