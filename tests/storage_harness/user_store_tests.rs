//! Macro-generated test suite for `UserStore` contract validation.
//!
//! # Generated Tests
//!
//! - `test_create_and_find`: create then fetch by id and by email
//! - `test_create_duplicate_email`: second account with the same email is refused
//! - `test_find_missing`: unknown id and email return None
//! - `test_find_by_ids_skips_unknown`: only existing users come back
//! - `test_list_newest_first`: listing order follows creation time
//! - `test_toggle_bookmark`: add, add another, remove
//! - `test_toggle_bookmark_unknown_user`: returns None
//! - `test_concurrent_bookmark_toggles`: parallel toggles on distinct resources all land

/// Generate a `UserStore` conformance test suite.
///
/// `$factory` must evaluate to a fresh store implementing
/// `UserStore + Clone + 'static`. It is re-evaluated for each test.
#[macro_export]
macro_rules! user_store_tests {
    ($factory:expr) => {
        mod user_store_contract_tests {
            use super::*;
            use learnhub::core::store::UserStore;
            use uuid::Uuid;

            #[tokio::test]
            async fn test_create_and_find() {
                let store = $factory;
                let user = test_user("Ada", "ada@example.com", 0);
                let id = user.id;

                let created = store.create(user.clone()).await.unwrap();
                assert_eq!(created.as_ref().map(|u| u.id), Some(id));

                let by_id = store.find_by_id(&id).await.unwrap().unwrap();
                assert_eq!(by_id.name, "Ada");
                assert_eq!(by_id.email, "ada@example.com");
                assert_eq!(by_id.password_hash, user.password_hash);
                assert!(by_id.bookmarks.is_empty());

                let by_email = store.find_by_email("ada@example.com").await.unwrap();
                assert_eq!(by_email.map(|u| u.id), Some(id));
            }

            #[tokio::test]
            async fn test_create_duplicate_email() {
                let store = $factory;
                let first = test_user("Ada", "ada@example.com", 0);
                let second = test_user("Impostor", "ada@example.com", 0);

                assert!(store.create(first.clone()).await.unwrap().is_some());
                assert!(store.create(second.clone()).await.unwrap().is_none());

                assert!(store.find_by_id(&second.id).await.unwrap().is_none());
                let owner = store.find_by_email("ada@example.com").await.unwrap().unwrap();
                assert_eq!(owner.id, first.id);
            }

            #[tokio::test]
            async fn test_find_missing() {
                let store = $factory;
                assert!(store.find_by_id(&Uuid::new_v4()).await.unwrap().is_none());
                assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_find_by_ids_skips_unknown() {
                let store = $factory;
                let a = store.create(test_user("A", "a@example.com", 0)).await.unwrap().unwrap();
                let b = store.create(test_user("B", "b@example.com", 0)).await.unwrap().unwrap();

                let mut found: Vec<Uuid> = store
                    .find_by_ids(&[a.id, Uuid::new_v4(), b.id])
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|u| u.id)
                    .collect();
                found.sort();
                let mut expected = vec![a.id, b.id];
                expected.sort();
                assert_eq!(found, expected);

                assert!(store.find_by_ids(&[]).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_newest_first() {
                let store = $factory;
                for (name, age) in [("old", 30), ("newest", 10), ("middle", 20)] {
                    let email = format!("{}@example.com", name);
                    store.create(test_user(name, &email, age)).await.unwrap();
                }

                let names: Vec<String> = store
                    .list()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|u| u.name)
                    .collect();
                assert_eq!(names, vec!["newest", "middle", "old"]);
            }

            #[tokio::test]
            async fn test_toggle_bookmark() {
                let store = $factory;
                let user = store.create(test_user("Ada", "ada@example.com", 0)).await.unwrap().unwrap();
                let (r1, r2) = (Uuid::new_v4(), Uuid::new_v4());

                let t = store.toggle_bookmark(&user.id, &r1).await.unwrap().unwrap();
                assert!(t.bookmarked);
                assert_eq!(t.bookmarks, vec![r1]);

                let t = store.toggle_bookmark(&user.id, &r2).await.unwrap().unwrap();
                assert!(t.bookmarked);
                assert_eq!(t.bookmarks, vec![r1, r2]);

                let t = store.toggle_bookmark(&user.id, &r1).await.unwrap().unwrap();
                assert!(!t.bookmarked);
                assert_eq!(t.bookmarks, vec![r2]);

                let stored = store.find_by_id(&user.id).await.unwrap().unwrap();
                assert_eq!(stored.bookmarks, vec![r2]);
            }

            #[tokio::test]
            async fn test_toggle_bookmark_unknown_user() {
                let store = $factory;
                let outcome = store
                    .toggle_bookmark(&Uuid::new_v4(), &Uuid::new_v4())
                    .await
                    .unwrap();
                assert!(outcome.is_none());
            }

            #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
            async fn test_concurrent_bookmark_toggles() {
                let store = $factory;
                let user = store.create(test_user("Ada", "ada@example.com", 0)).await.unwrap().unwrap();

                let mut handles = Vec::new();
                for _ in 0..32 {
                    let store = store.clone();
                    let user_id = user.id;
                    handles.push(tokio::spawn(async move {
                        let resource_id = Uuid::new_v4();
                        store.toggle_bookmark(&user_id, &resource_id).await.unwrap();
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }

                let stored = store.find_by_id(&user.id).await.unwrap().unwrap();
                assert_eq!(stored.bookmarks.len(), 32, "no toggle may be lost");
            }
        }
    };
}
