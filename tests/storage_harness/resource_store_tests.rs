//! Macro-generated test suite for `ResourceStore` contract validation.
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_insert_and_get`, `test_get_nonexistent`
//! - `test_get_many_keeps_order`: caller order, unknown ids skipped
//! - `test_apply_patch`, `test_apply_patch_nonexistent`
//! - `test_delete`
//!
//! ## Listing
//! - `test_find_search_is_case_insensitive`: title or description
//! - `test_find_search_is_literal`: regex metacharacters match literally
//! - `test_find_category_and_creator`
//! - `test_find_sort_orders`: newest, oldest, rating, likes
//! - `test_find_pagination`: page windows and out-of-range pages
//!
//! ## Likes and ratings
//! - `test_toggle_like`, `test_upsert_rating`
//! - `test_rerating_keeps_entry_position`, `test_average_rounds_half_up`
//! - `test_concurrent_likes`, `test_concurrent_ratings`: no lost updates
//! - `test_concurrent_like_toggles_by_one_user`: toggle parity under contention

/// Generate a `ResourceStore` conformance test suite.
///
/// `$factory` must evaluate to a fresh store implementing
/// `ResourceStore + Clone + 'static`. It is re-evaluated for each test.
#[macro_export]
macro_rules! resource_store_tests {
    ($factory:expr) => {
        mod resource_store_contract_tests {
            use super::*;
            use learnhub::core::entity::{Category, RatingValue, ResourcePatch};
            use learnhub::core::query::{PageRequest, ResourceFilter, SortOrder};
            use learnhub::core::rating::average_rating;
            use learnhub::core::store::ResourceStore;
            use uuid::Uuid;

            /// More concurrent writers than any bounded retry loop would absorb
            const WRITERS: usize = 32;

            async fn seeded<S: ResourceStore>(store: &S) -> (Uuid, Uuid) {
                let (creator, other) = (Uuid::new_v4(), Uuid::new_v4());
                for resource in sample_catalog(creator, other) {
                    store.insert(resource).await.unwrap();
                }
                (creator, other)
            }

            fn search(text: &str) -> ResourceFilter {
                ResourceFilter {
                    search: Some(text.to_string()),
                    ..Default::default()
                }
            }

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_insert_and_get() {
                let store = $factory;
                let resource = test_resource("SQL joins", "Inner and outer", Category::Database, Uuid::new_v4(), 0);

                let inserted = store.insert(resource.clone()).await.unwrap();
                assert_eq!(inserted.id, resource.id);

                let fetched = store.get(&resource.id).await.unwrap().unwrap();
                assert_eq!(fetched.title, "SQL joins");
                assert_eq!(fetched.category, Category::Database);
                assert_eq!(fetched.created_by, resource.created_by);
                assert_eq!(fetched.link, resource.link);
                assert!(fetched.likes.is_empty());
                assert!(fetched.ratings.is_empty());
                assert_eq!(fetched.average_rating, 0.0);
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let store = $factory;
                assert!(store.get(&Uuid::new_v4()).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_get_many_keeps_order() {
                let store = $factory;
                let creator = Uuid::new_v4();
                let a = store.insert(test_resource("A", "", Category::Other, creator, 0)).await.unwrap();
                let b = store.insert(test_resource("B", "", Category::Other, creator, 0)).await.unwrap();

                let found = store.get_many(&[b.id, Uuid::new_v4(), a.id]).await.unwrap();
                assert_eq!(titles(&found), vec!["B", "A"]);
                assert!(store.get_many(&[]).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_apply_patch() {
                let store = $factory;
                let resource = store
                    .insert(test_resource("Draft", "old", Category::Other, Uuid::new_v4(), 0))
                    .await
                    .unwrap();

                let patch = ResourcePatch {
                    title: Some("Final".to_string()),
                    category: Some(Category::DevOps),
                    ..Default::default()
                };
                let updated = store.apply_patch(&resource.id, &patch).await.unwrap().unwrap();
                assert_eq!(updated.title, "Final");
                assert_eq!(updated.category, Category::DevOps);
                assert_eq!(updated.description, "old");
                assert_eq!(updated.created_by, resource.created_by);

                let stored = store.get(&resource.id).await.unwrap().unwrap();
                assert_eq!(stored.title, "Final");
            }

            #[tokio::test]
            async fn test_apply_patch_nonexistent() {
                let store = $factory;
                let outcome = store
                    .apply_patch(&Uuid::new_v4(), &ResourcePatch::default())
                    .await
                    .unwrap();
                assert!(outcome.is_none());
            }

            #[tokio::test]
            async fn test_delete() {
                let store = $factory;
                let resource = store
                    .insert(test_resource("Doomed", "", Category::Other, Uuid::new_v4(), 0))
                    .await
                    .unwrap();

                assert!(store.delete(&resource.id).await.unwrap());
                assert!(store.get(&resource.id).await.unwrap().is_none());
                assert!(!store.delete(&resource.id).await.unwrap());
            }

            // ==================================================================
            // Listing
            // ==================================================================

            #[tokio::test]
            async fn test_find_search_is_case_insensitive() {
                let store = $factory;
                seeded(&store).await;

                let found = store.find(&search("python"), SortOrder::Newest, None).await.unwrap();
                assert_eq!(titles(&found), vec!["Python for data", "Intro to pandas"]);
                assert_eq!(store.count(&search("python")).await.unwrap(), 2);

                let found = store.find(&search("RUST"), SortOrder::Oldest, None).await.unwrap();
                assert_eq!(titles(&found), vec!["Rust ownership", "Async Rust"]);
            }

            #[tokio::test]
            async fn test_find_search_is_literal() {
                let store = $factory;
                seeded(&store).await;
                store
                    .insert(test_resource("C++ (modern)", "", Category::ProgrammingLanguages, Uuid::new_v4(), 0))
                    .await
                    .unwrap();

                let found = store.find(&search("c++ (mod"), SortOrder::Newest, None).await.unwrap();
                assert_eq!(titles(&found), vec!["C++ (modern)"]);
                assert_eq!(store.count(&search(".*")).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_find_category_and_creator() {
                let store = $factory;
                let (creator, _) = seeded(&store).await;

                let data_science = ResourceFilter {
                    category: Some(Category::DataScience),
                    ..Default::default()
                };
                let found = store.find(&data_science, SortOrder::Newest, None).await.unwrap();
                assert_eq!(titles(&found), vec!["Python for data", "Intro to pandas"]);

                let mine = ResourceFilter::by_creator(creator);
                let found = store.find(&mine, SortOrder::Newest, None).await.unwrap();
                assert_eq!(
                    titles(&found),
                    vec!["Python for data", "CSS grid guide", "Rust ownership"]
                );
                assert_eq!(store.count(&mine).await.unwrap(), 3);

                let combined = ResourceFilter {
                    search: Some("rust".to_string()),
                    category: Some(Category::ProgrammingLanguages),
                    created_by: Some(creator),
                };
                let found = store.find(&combined, SortOrder::Newest, None).await.unwrap();
                assert_eq!(titles(&found), vec!["Rust ownership"]);
            }

            #[tokio::test]
            async fn test_find_sort_orders() {
                let store = $factory;
                seeded(&store).await;
                let all = ResourceFilter::default();
                let by_title = |title: &str| {
                    let title = title.to_string();
                    let store = store.clone();
                    async move {
                        store
                            .find(&search(&title), SortOrder::Newest, None)
                            .await
                            .unwrap()
                            .remove(0)
                    }
                };

                let newest = store.find(&all, SortOrder::Newest, None).await.unwrap();
                assert_eq!(
                    titles(&newest),
                    vec!["Async Rust", "Python for data", "CSS grid guide", "Intro to pandas", "Rust ownership"]
                );
                let oldest = store.find(&all, SortOrder::Oldest, None).await.unwrap();
                assert_eq!(
                    titles(&oldest),
                    vec!["Rust ownership", "Intro to pandas", "CSS grid guide", "Python for data", "Async Rust"]
                );

                // Ratings: pandas 5.0, css 4.0, rust ownership 4.0 (older than css)
                let pandas = by_title("pandas").await;
                let css = by_title("CSS").await;
                let ownership = by_title("ownership").await;
                let five = RatingValue::new(5).unwrap();
                let four = RatingValue::new(4).unwrap();
                store.upsert_rating(&pandas.id, &Uuid::new_v4(), five).await.unwrap();
                store.upsert_rating(&css.id, &Uuid::new_v4(), four).await.unwrap();
                store.upsert_rating(&ownership.id, &Uuid::new_v4(), four).await.unwrap();

                let rated = store.find(&all, SortOrder::Rating, None).await.unwrap();
                assert_eq!(
                    titles(&rated),
                    vec!["Intro to pandas", "CSS grid guide", "Rust ownership", "Async Rust", "Python for data"]
                );

                // Likes: ownership 2, css 1
                store.toggle_like(&ownership.id, &Uuid::new_v4()).await.unwrap();
                store.toggle_like(&ownership.id, &Uuid::new_v4()).await.unwrap();
                store.toggle_like(&css.id, &Uuid::new_v4()).await.unwrap();

                let liked = store.find(&all, SortOrder::Likes, None).await.unwrap();
                assert_eq!(
                    titles(&liked),
                    vec!["Rust ownership", "CSS grid guide", "Async Rust", "Python for data", "Intro to pandas"]
                );
            }

            #[tokio::test]
            async fn test_find_pagination() {
                let store = $factory;
                seeded(&store).await;
                let all = ResourceFilter::default();

                let first = store
                    .find(&all, SortOrder::Oldest, Some(PageRequest::new(1, 2)))
                    .await
                    .unwrap();
                assert_eq!(titles(&first), vec!["Rust ownership", "Intro to pandas"]);

                let last = store
                    .find(&all, SortOrder::Oldest, Some(PageRequest::new(3, 2)))
                    .await
                    .unwrap();
                assert_eq!(titles(&last), vec!["Async Rust"]);

                let beyond = store
                    .find(&all, SortOrder::Oldest, Some(PageRequest::new(4, 2)))
                    .await
                    .unwrap();
                assert!(beyond.is_empty());
                assert_eq!(store.count(&all).await.unwrap(), 5);
            }

            // ==================================================================
            // Likes and ratings
            // ==================================================================

            #[tokio::test]
            async fn test_toggle_like() {
                let store = $factory;
                let resource = store
                    .insert(test_resource("Liked", "", Category::Other, Uuid::new_v4(), 0))
                    .await
                    .unwrap();
                let user = Uuid::new_v4();

                let on = store.toggle_like(&resource.id, &user).await.unwrap().unwrap();
                assert!(on.liked);
                assert_eq!(on.resource.likes, vec![user]);

                let off = store.toggle_like(&resource.id, &user).await.unwrap().unwrap();
                assert!(!off.liked);
                assert!(off.resource.likes.is_empty());

                assert!(store.toggle_like(&Uuid::new_v4(), &user).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_rerating_keeps_entry_position() {
                let store = $factory;
                let resource = store
                    .insert(test_resource("Ordered", "", Category::Other, Uuid::new_v4(), 0))
                    .await
                    .unwrap();
                let (first, second) = (Uuid::new_v4(), Uuid::new_v4());
                for (user, value) in [(first, 4), (second, 3), (first, 1)] {
                    store
                        .upsert_rating(&resource.id, &user, RatingValue::new(value).unwrap())
                        .await
                        .unwrap();
                }

                let stored = store.get(&resource.id).await.unwrap().unwrap();
                let entries: Vec<(Uuid, u8)> =
                    stored.ratings.iter().map(|r| (r.user, r.value.get())).collect();
                assert_eq!(entries, vec![(first, 1), (second, 3)]);
                assert!((stored.average_rating - 2.0).abs() < 1e-9);
            }

            #[tokio::test]
            async fn test_average_rounds_half_up() {
                let store = $factory;
                let resource = store
                    .insert(test_resource("Rounded", "", Category::Other, Uuid::new_v4(), 0))
                    .await
                    .unwrap();
                // 4 + 3 + 3 + 3 = 13 / 4 = 3.25
                for value in [4, 3, 3, 3] {
                    store
                        .upsert_rating(&resource.id, &Uuid::new_v4(), RatingValue::new(value).unwrap())
                        .await
                        .unwrap();
                }
                let stored = store.get(&resource.id).await.unwrap().unwrap();
                assert!((stored.average_rating - 3.3).abs() < 1e-9);
            }

            #[tokio::test]
            async fn test_upsert_rating() {
                let store = $factory;
                let resource = store
                    .insert(test_resource("Rated", "", Category::Other, Uuid::new_v4(), 0))
                    .await
                    .unwrap();
                let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());

                store.upsert_rating(&resource.id, &u1, RatingValue::new(4).unwrap()).await.unwrap();
                let rated = store
                    .upsert_rating(&resource.id, &u2, RatingValue::new(2).unwrap())
                    .await
                    .unwrap()
                    .unwrap();
                assert_eq!(rated.ratings.len(), 2);
                assert!((rated.average_rating - 3.0).abs() < 1e-9);

                let rerated = store
                    .upsert_rating(&resource.id, &u2, RatingValue::new(5).unwrap())
                    .await
                    .unwrap()
                    .unwrap();
                assert_eq!(rerated.ratings.len(), 2);
                assert!((rerated.average_rating - 4.5).abs() < 1e-9);

                let stored = store.get(&resource.id).await.unwrap().unwrap();
                assert!((stored.average_rating - 4.5).abs() < 1e-9);

                let missing = store
                    .upsert_rating(&Uuid::new_v4(), &u1, RatingValue::new(3).unwrap())
                    .await
                    .unwrap();
                assert!(missing.is_none());
            }

            #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
            async fn test_concurrent_likes() {
                let store = $factory;
                let resource = store
                    .insert(test_resource("Popular", "", Category::Other, Uuid::new_v4(), 0))
                    .await
                    .unwrap();

                let mut handles = Vec::new();
                for _ in 0..WRITERS {
                    let store = store.clone();
                    let id = resource.id;
                    handles.push(tokio::spawn(async move {
                        store.toggle_like(&id, &Uuid::new_v4()).await.unwrap();
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }

                let stored = store.get(&resource.id).await.unwrap().unwrap();
                assert_eq!(stored.like_count(), WRITERS, "no like may be lost");
            }

            #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
            async fn test_concurrent_like_toggles_by_one_user() {
                let store = $factory;
                let resource = store
                    .insert(test_resource("Flipped", "", Category::Other, Uuid::new_v4(), 0))
                    .await
                    .unwrap();
                let user = Uuid::new_v4();

                let mut handles = Vec::new();
                for _ in 0..WRITERS {
                    let store = store.clone();
                    let id = resource.id;
                    handles.push(tokio::spawn(async move {
                        store.toggle_like(&id, &user).await.unwrap().unwrap();
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }

                // An even number of toggles restores the original state
                let stored = store.get(&resource.id).await.unwrap().unwrap();
                assert!(stored.likes.is_empty());
            }

            #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
            async fn test_concurrent_ratings() {
                let store = $factory;
                let resource = store
                    .insert(test_resource("Contested", "", Category::Other, Uuid::new_v4(), 0))
                    .await
                    .unwrap();

                let mut handles = Vec::new();
                for i in 0..WRITERS as i64 {
                    let store = store.clone();
                    let id = resource.id;
                    handles.push(tokio::spawn(async move {
                        let value = RatingValue::new(i % 5 + 1).unwrap();
                        store.upsert_rating(&id, &Uuid::new_v4(), value).await.unwrap();
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }

                let stored = store.get(&resource.id).await.unwrap().unwrap();
                assert_eq!(stored.ratings.len(), WRITERS);
                // 1 and 2 seven times each, 3..=5 six times each: 93 / 32
                assert!((stored.average_rating - 2.9).abs() < 1e-9);
                assert_eq!(stored.average_rating, average_rating(&stored.ratings));
            }
        }
    };
}
