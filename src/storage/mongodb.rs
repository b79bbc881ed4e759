//! MongoDB storage backend using the official MongoDB async driver.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag.
//!
//! # Storage model
//!
//! One collection per entity: `users` and `resources`. Entities are serialized
//! via `serde_json::Value` as an intermediate format, then converted to BSON
//! documents; the `id` field is mapped to MongoDB's `_id` convention. Each
//! document also carries two bookkeeping fields that the domain types ignore:
//!
//! - `revision`: incremented on every write, used as the compare-and-swap key
//! - `createdTs`: creation time in microseconds, used as the sort key
//!
//! # Atomicity
//!
//! Likes, ratings and bookmarks are single `findOneAndUpdate` calls whose
//! update pipeline computes the new set from the stored one, so concurrent
//! writers never retry. Patches read the document, apply the domain change
//! and replace the document only if its `revision` is unchanged; a lost race
//! re-reads and retries, up to [`MAX_CAS_ATTEMPTS`] times.

use crate::core::entity::{RatingValue, Resource, ResourcePatch, User};
use crate::core::error::StorageError;
use crate::core::query::{PageRequest, ResourceFilter, SortOrder};
use crate::core::store::{BookmarkToggle, LikeToggle, ResourceStore, UserStore};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

pub const MAX_CAS_ATTEMPTS: usize = 16;

const USERS: &str = "users";
const RESOURCES: &str = "resources";
const DEFAULT_DATABASE: &str = "learning_resource_hub";
const DUPLICATE_KEY: i32 = 11000;

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// renaming `id` → `_id` for MongoDB convention.
fn json_to_document(json: serde_json::Value) -> Result<Document> {
    let bson_val = mongodb::bson::to_bson(&json)
        .map_err(|e| anyhow!("Failed to convert JSON to BSON: {}", e))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => return Err(anyhow!("Expected BSON document, got non-object")),
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value,
/// renaming `_id` → `id` for domain entity convention.
fn document_to_json(mut doc: Document) -> serde_json::Value {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    Bson::Document(doc).into_relaxed_extjson()
}

fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

/// Serialize an entity and stamp the bookkeeping fields
fn to_document<T: Serialize>(
    entity: &T,
    revision: i64,
    created: chrono::DateTime<chrono::Utc>,
) -> Result<Document> {
    let json =
        serde_json::to_value(entity).map_err(|e| anyhow!("Failed to serialize entity: {}", e))?;
    let mut doc = json_to_document(json)?;
    doc.insert("revision", revision);
    doc.insert("createdTs", created.timestamp_micros());
    Ok(doc)
}

fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T> {
    serde_json::from_value(document_to_json(doc))
        .map_err(|e| anyhow!("Failed to deserialize entity from document: {}", e))
}

fn revision_of(doc: &Document) -> i64 {
    doc.get_i64("revision").unwrap_or(0)
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

/// Compile a filter into a native query document.
///
/// The search text is escaped before it becomes a regex, so it only ever
/// matches literally.
pub fn filter_document(filter: &ResourceFilter) -> Document {
    let mut query = Document::new();
    if let Some(category) = filter.category {
        query.insert("category", category.as_str());
    }
    if let Some(creator) = filter.created_by {
        query.insert("createdBy", uuid_bson(&creator));
    }
    if let Some(search) = &filter.search {
        let pattern = regex::escape(search);
        query.insert(
            "$or",
            vec![
                doc! { "title": { "$regex": pattern.as_str(), "$options": "i" } },
                doc! { "description": { "$regex": pattern.as_str(), "$options": "i" } },
            ],
        );
    }
    query
}

/// Sort document matching [`SortOrder::compare`]
pub fn sort_document(sort: SortOrder) -> Document {
    match sort {
        SortOrder::Newest => doc! { "createdTs": -1, "_id": 1 },
        SortOrder::Oldest => doc! { "createdTs": 1, "_id": 1 },
        SortOrder::Rating => doc! { "averageRating": -1, "createdTs": -1, "_id": 1 },
        SortOrder::Likes => doc! { "likeCount": -1, "createdTs": -1, "_id": 1 },
    }
}

// ---------------------------------------------------------------------------
// MongoStore
// ---------------------------------------------------------------------------

/// Server-side timestamp in the same RFC 3339 form serde writes
fn now_string() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
}

/// Update pipeline that flips `member` in the array `field`.
///
/// Removal keeps the order of the remaining members; insertion appends.
fn toggle_member_pipeline(field: &str, member: Bson) -> Vec<Document> {
    let path = format!("${}", field);
    let toggled = doc! {
        "$cond": [
            { "$in": [member.clone(), { "$ifNull": [path.clone(), []] }] },
            {
                "$filter": {
                    "input": path.clone(),
                    "cond": { "$ne": ["$$this", member.clone()] }
                }
            },
            { "$concatArrays": [{ "$ifNull": [path, []] }, [member]] }
        ]
    };

    let mut set = Document::new();
    set.insert(field, toggled);
    set.insert("updatedAt", now_string());
    set.insert("revision", bump_revision());
    vec![doc! { "$set": set }]
}

fn bump_revision() -> Document {
    doc! { "$add": [{ "$ifNull": ["$revision", 0_i64] }, 1_i64] }
}

/// Update pipeline that records `user`'s rating, replacing an earlier one in
/// place, and re-derives `averageRating` rounded half-up to one decimal
fn upsert_rating_pipeline(user: Bson, value: i64) -> Vec<Document> {
    let entry = doc! { "user": user.clone(), "rating": value };
    vec![
        doc! {
            "$set": {
                "ratings": {
                    "$cond": [
                        { "$in": [user.clone(), { "$ifNull": ["$ratings.user", []] }] },
                        {
                            "$map": {
                                "input": "$ratings",
                                "in": {
                                    "$cond": [
                                        { "$eq": ["$$this.user", user] },
                                        entry.clone(),
                                        "$$this"
                                    ]
                                }
                            }
                        },
                        { "$concatArrays": [{ "$ifNull": ["$ratings", []] }, [entry]] }
                    ]
                }
            }
        },
        doc! {
            "$set": {
                "averageRating": {
                    "$divide": [
                        {
                            "$trunc": {
                                "$add": [{ "$multiply": [{ "$avg": "$ratings.rating" }, 10.0] }, 0.5]
                            }
                        },
                        10.0
                    ]
                },
                "updatedAt": now_string(),
                "revision": bump_revision()
            }
        },
    ]
}

/// `$skip`/`$limit` values for a page, or `None` when the offset does not fit
/// in a BSON int64
fn page_window(page: PageRequest) -> Option<(i64, i64)> {
    let skip = i64::try_from(page.offset()).ok()?;
    let limit = i64::try_from(page.limit).ok()?;
    Some((skip, limit))
}

/// User and resource store backed by MongoDB
///
/// # Example
///
/// ```rust,ignore
/// let store = MongoStore::connect("mongodb://localhost:27017/learning_resource_hub", None).await?;
/// let users: Arc<dyn UserStore> = Arc::new(store.clone());
/// ```
#[derive(Clone, Debug)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Wrap an existing database handle. Call [`MongoStore::ensure_indexes`] before use.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Connect, select the database and create indexes.
    ///
    /// `database` overrides the database named in the URI; without either,
    /// `learning_resource_hub` is used.
    pub async fn connect(uri: &str, database: Option<&str>) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| connection_error(e.to_string()))?;
        let database = match database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
        };

        let store = Self::new(database);
        store
            .ensure_indexes()
            .await
            .map_err(|e| connection_error(format!("{:#}", e)))?;
        tracing::info!(database = store.database.name(), "connected to MongoDB");
        Ok(store)
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Create the unique email index and the resource query indexes.
    ///
    /// Idempotent; safe to call on every startup.
    pub async fn ensure_indexes(&self) -> Result<()> {
        self.users()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await
            .map_err(|e| anyhow!("Failed to create index on users collection: {}", e))?;

        let indexes = vec![
            IndexModel::builder().keys(doc! { "createdTs": -1 }).build(),
            IndexModel::builder()
                .keys(doc! { "category": 1, "createdTs": -1 })
                .build(),
            IndexModel::builder().keys(doc! { "createdBy": 1 }).build(),
        ];
        self.resources()
            .create_indexes(indexes)
            .await
            .map_err(|e| anyhow!("Failed to create indexes on resources collection: {}", e))?;

        Ok(())
    }

    fn users(&self) -> Collection<Document> {
        self.database.collection(USERS)
    }

    fn resources(&self) -> Collection<Document> {
        self.database.collection(RESOURCES)
    }

    /// Compare-and-swap loop over one document.
    ///
    /// `change` is re-run against the freshest copy on every attempt. Returns
    /// `None` when the document does not exist.
    async fn modify<T, R, F>(
        &self,
        collection: Collection<Document>,
        id: &Uuid,
        created: fn(&T) -> chrono::DateTime<chrono::Utc>,
        mut change: F,
    ) -> Result<Option<(T, R)>>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut(&mut T) -> R,
    {
        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let Some(current) = collection
                .find_one(doc! { "_id": uuid_bson(id) })
                .await
                .map_err(|e| anyhow!("Failed to read document {}: {}", id, e))?
            else {
                return Ok(None);
            };

            let revision = revision_of(&current);
            let mut entity: T = from_document(current)?;
            let outcome = change(&mut entity);
            let replacement = to_document(&entity, revision + 1, created(&entity))?;

            let result = collection
                .replace_one(doc! { "_id": uuid_bson(id), "revision": revision }, replacement)
                .await
                .map_err(|e| anyhow!("Failed to update document {}: {}", id, e))?;
            if result.matched_count == 1 {
                return Ok(Some((entity, outcome)));
            }
            tracing::debug!(%id, attempt, "revision changed during update, retrying");
        }

        Err(StorageError::OperationFailed {
            message: format!(
                "document {} kept changing; gave up after {} attempts",
                id, MAX_CAS_ATTEMPTS
            ),
        }
        .into())
    }

    /// Apply an update pipeline to one document and return it as stored
    /// afterwards. `None` when the document does not exist.
    async fn update_returning<T: DeserializeOwned>(
        collection: Collection<Document>,
        id: &Uuid,
        pipeline: Vec<Document>,
    ) -> Result<Option<T>> {
        let updated = collection
            .find_one_and_update(doc! { "_id": uuid_bson(id) }, pipeline)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| anyhow!("Failed to update document {}: {}", id, e))?;
        updated.map(from_document).transpose()
    }

    async fn collect<T: DeserializeOwned>(
        cursor: mongodb::Cursor<Document>,
        what: &str,
    ) -> Result<Vec<T>> {
        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect {}: {}", what, e))?;
        docs.into_iter().map(from_document).collect()
    }
}

fn connection_error(message: String) -> anyhow::Error {
    StorageError::ConnectionError {
        backend: "MongoDB".to_string(),
        message,
    }
    .into()
}

fn resource_created(resource: &Resource) -> chrono::DateTime<chrono::Utc> {
    resource.created_at
}

#[async_trait]
impl UserStore for MongoStore {
    async fn create(&self, user: User) -> Result<Option<User>> {
        let doc = to_document(&user, 0, user.created_at)?;
        match self.users().insert_one(doc).await {
            Ok(_) => Ok(Some(user)),
            Err(e) if is_duplicate_key(&e) => Ok(None),
            Err(e) => Err(anyhow!("Failed to create user: {}", e)),
        }
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        let doc = self
            .users()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to get user: {}", e))?;
        doc.map(from_document).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let doc = self
            .users()
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| anyhow!("Failed to find user by email: {}", e))?;
        doc.map(from_document).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Bson> = ids.iter().map(uuid_bson).collect();
        let cursor = self
            .users()
            .find(doc! { "_id": { "$in": ids } })
            .await
            .map_err(|e| anyhow!("Failed to find users: {}", e))?;
        Self::collect(cursor, "users").await
    }

    async fn list(&self) -> Result<Vec<User>> {
        let cursor = self
            .users()
            .find(doc! {})
            .sort(doc! { "createdTs": -1, "_id": 1 })
            .await
            .map_err(|e| anyhow!("Failed to list users: {}", e))?;
        Self::collect(cursor, "users").await
    }

    async fn toggle_bookmark(
        &self,
        user_id: &Uuid,
        resource_id: &Uuid,
    ) -> Result<Option<BookmarkToggle>> {
        let pipeline = toggle_member_pipeline("bookmarks", uuid_bson(resource_id));
        let user: Option<User> = Self::update_returning(self.users(), user_id, pipeline).await?;
        Ok(user.map(|user| BookmarkToggle {
            bookmarked: user.bookmarks.contains(resource_id),
            bookmarks: user.bookmarks,
        }))
    }
}

#[async_trait]
impl ResourceStore for MongoStore {
    async fn insert(&self, resource: Resource) -> Result<Resource> {
        let doc = to_document(&resource, 0, resource.created_at)?;
        self.resources()
            .insert_one(doc)
            .await
            .map_err(|e| anyhow!("Failed to create resource: {}", e))?;
        Ok(resource)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Resource>> {
        let doc = self
            .resources()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to get resource: {}", e))?;
        doc.map(from_document).transpose()
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<Resource>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let wanted: Vec<Bson> = ids.iter().map(uuid_bson).collect();
        let cursor = self
            .resources()
            .find(doc! { "_id": { "$in": wanted } })
            .await
            .map_err(|e| anyhow!("Failed to find resources: {}", e))?;
        let found: Vec<Resource> = Self::collect(cursor, "resources").await?;

        // Restore the caller's order
        let mut by_id: std::collections::HashMap<Uuid, Resource> =
            found.into_iter().map(|r| (r.id, r)).collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn find(
        &self,
        filter: &ResourceFilter,
        sort: SortOrder,
        page: Option<PageRequest>,
    ) -> Result<Vec<Resource>> {
        let mut pipeline = vec![
            doc! { "$match": filter_document(filter) },
            doc! { "$addFields": { "likeCount": { "$size": "$likes" } } },
            doc! { "$sort": sort_document(sort) },
        ];
        if let Some(page) = page {
            let Some((skip, limit)) = page_window(page) else {
                // Past anything the server can address, so certainly empty
                return Ok(Vec::new());
            };
            pipeline.push(doc! { "$skip": skip });
            pipeline.push(doc! { "$limit": limit });
        }
        pipeline.push(doc! { "$project": { "likeCount": 0 } });

        let cursor = self
            .resources()
            .aggregate(pipeline)
            .await
            .map_err(|e| anyhow!("Failed to query resources: {}", e))?;
        Self::collect(cursor, "resources").await
    }

    async fn count(&self, filter: &ResourceFilter) -> Result<usize> {
        let n = self
            .resources()
            .count_documents(filter_document(filter))
            .await
            .map_err(|e| anyhow!("Failed to count resources: {}", e))?;
        Ok(n as usize)
    }

    async fn apply_patch(&self, id: &Uuid, patch: &ResourcePatch) -> Result<Option<Resource>> {
        let outcome = self
            .modify(self.resources(), id, resource_created, |r: &mut Resource| {
                r.apply(patch)
            })
            .await?;
        Ok(outcome.map(|(resource, ())| resource))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = self
            .resources()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to delete resource: {}", e))?;
        Ok(result.deleted_count > 0)
    }

    async fn toggle_like(&self, id: &Uuid, user_id: &Uuid) -> Result<Option<LikeToggle>> {
        let pipeline = toggle_member_pipeline("likes", uuid_bson(user_id));
        let resource: Option<Resource> =
            Self::update_returning(self.resources(), id, pipeline).await?;
        Ok(resource.map(|resource| LikeToggle {
            liked: resource.is_liked_by(*user_id),
            resource,
        }))
    }

    async fn upsert_rating(
        &self,
        id: &Uuid,
        user_id: &Uuid,
        value: RatingValue,
    ) -> Result<Option<Resource>> {
        let pipeline = upsert_rating_pipeline(uuid_bson(user_id), i64::from(value));
        Self::update_returning(self.resources(), id, pipeline).await
    }
}
