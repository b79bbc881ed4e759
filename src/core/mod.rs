//! Core module: domain types, policies, services and store traits

pub mod auth;
pub mod authenticator;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod password;
pub mod query;
pub mod rating;
pub mod service;
pub mod store;
pub mod token;
pub mod validation;

pub use auth::{AuthContext, AuthPolicy, Identity};
pub use authenticator::{AuthSession, Authenticator};
pub use entity::{Category, PublicUser, Rating, RatingValue, Resource, Role, User};
pub use error::{HubError, HubResult};
pub use extractors::PathId;
pub use query::{ListParams, PageRequest, PaginationMeta, ResourceFilter, ResourceQuery, SortOrder};
pub use service::{ResourceService, ResourceView, UserService};
pub use store::{BookmarkToggle, LikeToggle, ResourceStore, UserStore};
pub use token::TokenSigner;
