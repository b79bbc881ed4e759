//! Resource operations: CRUD, listing, likes and ratings

use super::populate;
use crate::core::auth::{AuthContext, AuthPolicy};
use crate::core::entity::{Category, Rating, Resource, User};
use crate::core::error::{HubError, HubResult};
use crate::core::query::{ListParams, PaginationMeta, ResourceFilter, SortOrder};
use crate::core::store::{ResourceStore, UserStore};
use crate::core::validation::{NewResourceInput, RateInput, ResourceUpdateInput};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Creator as rendered inside a resource
///
/// `name` and `email` are absent when the creator account no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatorRef {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CreatorRef {
    pub fn resolve(id: Uuid, user: Option<&User>) -> Self {
        Self {
            id,
            name: user.map(|u| u.name.clone()),
            email: user.map(|u| u.email.clone()),
        }
    }
}

/// Resource as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub link: String,
    pub created_by: CreatorRef,
    pub likes: Vec<Uuid>,
    pub ratings: Vec<Rating>,
    pub average_rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResourceView {
    pub fn new(resource: Resource, created_by: CreatorRef) -> Self {
        Self {
            id: resource.id,
            title: resource.title,
            description: resource.description,
            category: resource.category,
            link: resource.link,
            created_by,
            likes: resource.likes,
            ratings: resource.ratings,
            average_rating: resource.average_rating,
            created_at: resource.created_at,
            updated_at: resource.updated_at,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone)]
pub struct ResourcePage {
    pub resources: Vec<ResourceView>,
    pub meta: PaginationMeta,
}

#[derive(Clone)]
pub struct ResourceService {
    resources: Arc<dyn ResourceStore>,
    users: Arc<dyn UserStore>,
}

impl ResourceService {
    pub fn new(resources: Arc<dyn ResourceStore>, users: Arc<dyn UserStore>) -> Self {
        Self { resources, users }
    }

    pub async fn create(&self, ctx: &AuthContext, input: NewResourceInput) -> HubResult<ResourceView> {
        let identity = AuthPolicy::Authenticated.authorize(ctx, "Not authorized")?;
        let draft = input.validate()?;

        let resource = self.resources.insert(Resource::new(draft, identity.id)).await?;
        tracing::info!(resource_id = %resource.id, user_id = %identity.id, "resource created");
        self.view(resource).await
    }

    pub async fn get(&self, id: Uuid) -> HubResult<ResourceView> {
        let resource = self.fetch(id).await?;
        self.view(resource).await
    }

    /// Filtered, sorted, paginated listing. Public.
    pub async fn list(&self, params: ListParams) -> HubResult<ResourcePage> {
        let query = params.into_query()?;
        let total = self.resources.count(&query.filter).await?;
        let items = self
            .resources
            .find(&query.filter, query.sort, Some(query.page))
            .await?;

        let meta = PaginationMeta::new(query.page, total, items.len());
        Ok(ResourcePage {
            resources: populate(self.users.as_ref(), items).await?,
            meta,
        })
    }

    /// All resources created by the caller, newest first
    pub async fn mine(&self, ctx: &AuthContext) -> HubResult<Vec<ResourceView>> {
        let identity = ctx.require()?;
        let items = self
            .resources
            .find(&ResourceFilter::by_creator(identity.id), SortOrder::Newest, None)
            .await?;
        Ok(populate(self.users.as_ref(), items).await?)
    }

    /// Creator or admin only. All supplied fields are validated before the write.
    pub async fn update(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        input: ResourceUpdateInput,
    ) -> HubResult<ResourceView> {
        ctx.require()?;
        let existing = self.fetch(id).await?;
        AuthPolicy::CreatorOrAdmin {
            creator: existing.created_by,
        }
        .authorize(ctx, "Not authorized to update this resource")?;

        let patch = input.validate()?;
        let updated = self
            .resources
            .apply_patch(&id, &patch)
            .await?
            .ok_or_else(|| HubError::resource_not_found(id))?;
        self.view(updated).await
    }

    /// Creator or admin only. Bookmarks and likes pointing at the resource are
    /// left in place and filtered out when read.
    pub async fn delete(&self, ctx: &AuthContext, id: Uuid) -> HubResult<()> {
        ctx.require()?;
        let existing = self.fetch(id).await?;
        let identity = AuthPolicy::CreatorOrAdmin {
            creator: existing.created_by,
        }
        .authorize(ctx, "Not authorized to delete this resource")?;

        if !self.resources.delete(&id).await? {
            return Err(HubError::resource_not_found(id));
        }
        tracing::info!(resource_id = %id, user_id = %identity.id, "resource deleted");
        Ok(())
    }

    /// Returns the updated resource and whether the caller now likes it
    pub async fn toggle_like(&self, ctx: &AuthContext, id: Uuid) -> HubResult<(ResourceView, bool)> {
        let identity = ctx.require()?;
        let toggle = self
            .resources
            .toggle_like(&id, &identity.id)
            .await?
            .ok_or_else(|| HubError::resource_not_found(id))?;
        Ok((self.view(toggle.resource).await?, toggle.liked))
    }

    /// Insert or overwrite the caller's rating
    pub async fn rate(&self, ctx: &AuthContext, id: Uuid, input: RateInput) -> HubResult<ResourceView> {
        let identity = ctx.require()?;
        let value = input.validate()?;
        let resource = self
            .resources
            .upsert_rating(&id, &identity.id, value)
            .await?
            .ok_or_else(|| HubError::resource_not_found(id))?;
        tracing::debug!(resource_id = %id, rating = value.get(), "resource rated");
        self.view(resource).await
    }

    async fn fetch(&self, id: Uuid) -> HubResult<Resource> {
        self.resources
            .get(&id)
            .await?
            .ok_or_else(|| HubError::resource_not_found(id))
    }

    async fn view(&self, resource: Resource) -> HubResult<ResourceView> {
        let creator = self.users.find_by_id(&resource.created_by).await?;
        let created_by = CreatorRef::resolve(resource.created_by, creator.as_ref());
        Ok(ResourceView::new(resource, created_by))
    }
}
