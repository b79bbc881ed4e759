//! Shared test harness for storage backend testing
//!
//! Provides fixture builders for users and resources, and the contract test
//! macros every backend must pass.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//!
//! user_store_tests!(InMemoryStore::new());
//! resource_store_tests!(InMemoryStore::new());
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod user_store_tests;
#[macro_use]
pub mod resource_store_tests;

use chrono::{Duration, Utc};
use learnhub::core::entity::{Category, Resource, ResourceDraft, User};
use uuid::Uuid;

/// A learner whose account was created `age_secs` seconds ago
pub fn test_user(name: &str, email: &str, age_secs: i64) -> User {
    let mut user = User::new_learner(
        name.to_string(),
        email.to_lowercase(),
        "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
    );
    user.created_at = Utc::now() - Duration::seconds(age_secs);
    user.updated_at = user.created_at;
    user
}

pub fn test_draft(title: &str, description: &str, category: Category) -> ResourceDraft {
    ResourceDraft {
        title: title.to_string(),
        description: description.to_string(),
        category,
        link: format!(
            "https://example.com/{}",
            title.to_lowercase().replace(' ', "-")
        ),
    }
}

/// A resource created `age_secs` seconds ago
pub fn test_resource(
    title: &str,
    description: &str,
    category: Category,
    creator: Uuid,
    age_secs: i64,
) -> Resource {
    let mut resource = Resource::new(test_draft(title, description, category), creator);
    resource.created_at = Utc::now() - Duration::seconds(age_secs);
    resource.updated_at = resource.created_at;
    resource
}

/// Five resources across three categories, oldest first:
///
/// | title              | category             | age |
/// |--------------------|----------------------|-----|
/// | Rust ownership     | Programming Languages | 50 |
/// | Intro to pandas    | Data Science         | 40  |
/// | CSS grid guide     | Web Development      | 30  |
/// | Python for data    | Data Science         | 20  |
/// | Async Rust         | Programming Languages | 10 |
pub fn sample_catalog(creator: Uuid, other: Uuid) -> Vec<Resource> {
    vec![
        test_resource(
            "Rust ownership",
            "Borrowing explained",
            Category::ProgrammingLanguages,
            creator,
            50,
        ),
        test_resource(
            "Intro to pandas",
            "DataFrames with PYTHON",
            Category::DataScience,
            other,
            40,
        ),
        test_resource(
            "CSS grid guide",
            "Layouts",
            Category::WebDevelopment,
            creator,
            30,
        ),
        test_resource(
            "Python for data",
            "NumPy and friends",
            Category::DataScience,
            creator,
            20,
        ),
        test_resource(
            "Async Rust",
            "Futures and executors",
            Category::ProgrammingLanguages,
            other,
            10,
        ),
    ]
}

pub fn titles(resources: &[Resource]) -> Vec<&str> {
    resources.iter().map(|r| r.title.as_str()).collect()
}
