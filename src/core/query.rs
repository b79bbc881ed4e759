//! Resource listing: filters, sort orders and pagination
//!
//! Query-string parameters arrive as raw strings in [`ListParams`] and are
//! compiled once into a [`ResourceQuery`]. Stores never see raw input; each
//! backend translates the typed filter into its own native form.

use crate::core::entity::{Category, Resource};
use crate::core::error::ValidationError;
use crate::core::validation::filters::trim_to_none;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// Query parameters accepted by `GET /resources`
///
/// Every field is kept as a string so that junk paging values fall back to
/// defaults instead of rejecting the request.
///
/// # Example
/// ```text
/// GET /resources?search=python&category=Data%20Science&sort=rating&page=2&limit=5
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    /// Compile into a typed query. Only an unknown category is an error.
    pub fn into_query(self) -> Result<ResourceQuery, ValidationError> {
        let category = trim_to_none(self.category)
            .map(|c| c.parse::<Category>())
            .transpose()?;

        Ok(ResourceQuery {
            filter: ResourceFilter {
                search: trim_to_none(self.search),
                category,
                created_by: None,
            },
            sort: SortOrder::parse_lenient(self.sort.as_deref()),
            page: PageRequest::from_raw(self.page.as_deref(), self.limit.as_deref()),
        })
    }
}

/// Compiled listing query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceQuery {
    pub filter: ResourceFilter,
    pub sort: SortOrder,
    pub page: PageRequest,
}

/// Filter criteria; `None` fields do not constrain the result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceFilter {
    /// Case-insensitive substring of title or description
    pub search: Option<String>,
    pub category: Option<Category>,
    pub created_by: Option<Uuid>,
}

impl ResourceFilter {
    pub fn by_creator(user_id: Uuid) -> Self {
        Self {
            created_by: Some(user_id),
            ..Default::default()
        }
    }

    /// Evaluate the filter against one resource
    pub fn matches(&self, resource: &Resource) -> bool {
        if let Some(category) = self.category {
            if resource.category != category {
                return false;
            }
        }
        if let Some(creator) = self.created_by {
            if resource.created_by != creator {
                return false;
            }
        }
        match &self.search {
            Some(needle) => {
                let needle = needle.to_lowercase();
                resource.title.to_lowercase().contains(&needle)
                    || resource.description.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

/// Listing order
///
/// `Rating` and `Likes` break ties newest-first; every order finally breaks
/// ties on id so the result is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Rating,
    Likes,
}

impl SortOrder {
    /// Unknown or missing values fall back to `Newest`
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("oldest") => SortOrder::Oldest,
            Some("rating") => SortOrder::Rating,
            Some("likes") => SortOrder::Likes,
            _ => SortOrder::Newest,
        }
    }

    pub fn compare(&self, a: &Resource, b: &Resource) -> Ordering {
        let newest_first = b.created_at.cmp(&a.created_at);
        let primary = match self {
            SortOrder::Newest => newest_first,
            SortOrder::Oldest => a.created_at.cmp(&b.created_at),
            SortOrder::Rating => b
                .average_rating
                .total_cmp(&a.average_rating)
                .then(newest_first),
            SortOrder::Likes => b.like_count().cmp(&a.like_count()).then(newest_first),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// Offset pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Parse raw query values; anything non-numeric or non-positive uses the default
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let parse = |raw: Option<&str>, default: usize| {
            raw.and_then(|s| s.trim().parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(default)
        };
        Self::new(parse(page, DEFAULT_PAGE), parse(limit, DEFAULT_LIMIT))
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Pagination metadata returned with a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationMeta {
    /// Items on this page
    pub count: usize,
    /// Items matching the filter
    pub total: usize,
    pub page: usize,
    /// `ceil(total / limit)`
    pub pages: usize,
}

impl PaginationMeta {
    pub fn new(request: PageRequest, total: usize, count: usize) -> Self {
        let limit = request.limit.max(1);
        Self {
            count,
            total,
            page: request.page,
            pages: total.div_ceil(limit),
        }
    }
}
