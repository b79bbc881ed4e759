//! User operations: profile, admin listing and bookmarks

use super::{ResourceView, populate};
use crate::core::auth::{AuthContext, AuthPolicy};
use crate::core::entity::PublicUser;
use crate::core::error::{AuthError, HubError, HubResult};
use crate::core::store::{BookmarkToggle, ResourceStore, UserStore};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    resources: Arc<dyn ResourceStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, resources: Arc<dyn ResourceStore>) -> Self {
        Self { users, resources }
    }

    /// Caller's own profile
    pub async fn me(&self, ctx: &AuthContext) -> HubResult<PublicUser> {
        let identity = ctx.require()?;
        let user = self
            .users
            .find_by_id(&identity.id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(user.to_public())
    }

    /// Every account, newest first. Admin only.
    pub async fn list_all(&self, ctx: &AuthContext) -> HubResult<Vec<PublicUser>> {
        AuthPolicy::AdminOnly.authorize(ctx, "Access denied. Admin privileges required.")?;
        let users = self.users.list().await?;
        Ok(users.iter().map(|u| u.to_public()).collect())
    }

    /// Flip a bookmark. The resource must exist at the time of the call.
    pub async fn toggle_bookmark(
        &self,
        ctx: &AuthContext,
        resource_id: Uuid,
    ) -> HubResult<BookmarkToggle> {
        let identity = ctx.require()?;
        if self.resources.get(&resource_id).await?.is_none() {
            return Err(HubError::resource_not_found(resource_id));
        }
        let toggle = self
            .users
            .toggle_bookmark(&identity.id, &resource_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(toggle)
    }

    /// Bookmarked resources in bookmark order. Deleted resources are skipped.
    pub async fn bookmarks(&self, ctx: &AuthContext) -> HubResult<Vec<ResourceView>> {
        let identity = ctx.require()?;
        let user = self
            .users
            .find_by_id(&identity.id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let resources = self.resources.get_many(&user.bookmarks).await?;
        if resources.len() < user.bookmarks.len() {
            tracing::debug!(
                user_id = %user.id,
                dangling = user.bookmarks.len() - resources.len(),
                "skipping bookmarks of deleted resources"
            );
        }
        Ok(populate(self.users.as_ref(), resources).await?)
    }
}
