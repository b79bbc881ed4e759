//! Application services
//!
//! Services combine authorization, validation and store calls. They know
//! nothing about HTTP; handlers translate their results into responses.

pub mod resources;
pub mod users;

pub use resources::{CreatorRef, ResourcePage, ResourceService, ResourceView};
pub use users::UserService;

use crate::core::entity::{Resource, User};
use crate::core::store::UserStore;
use std::collections::HashMap;
use uuid::Uuid;

/// Render resources with their creators resolved in a single store lookup
pub(crate) async fn populate(
    users: &dyn UserStore,
    resources: Vec<Resource>,
) -> anyhow::Result<Vec<ResourceView>> {
    let mut creator_ids: Vec<Uuid> = resources.iter().map(|r| r.created_by).collect();
    creator_ids.sort();
    creator_ids.dedup();

    let creators: HashMap<Uuid, User> = users
        .find_by_ids(&creator_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(resources
        .into_iter()
        .map(|r| {
            let creator = CreatorRef::resolve(r.created_by, creators.get(&r.created_by));
            ResourceView::new(r, creator)
        })
        .collect())
}
