//! PostgreSQL repository against a real database
//!
//! Run with: `cargo test -p domain_users --test postgres_repository -- --ignored`

use domain_users::{
    FieldMask, PgUserRepository, User, UserError, UserField, UserFilter, UserRepository,
};
use test_utils::assertions::{assert_some, assert_uuid_eq};
use test_utils::{TestDataBuilder, TestDatabase};

fn user(builder: &TestDataBuilder, label: &str, country: &str) -> User {
    User::new(
        "Ada",
        "Lovelace",
        builder.nickname(label),
        "s3cret",
        builder.email(label),
        country,
    )
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_create_and_get() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("test_create_and_get");

    let mut created = user(&builder, "main", "DEU");
    repo.create(&mut created).await.unwrap();

    assert!(!created.id.is_nil());
    let created_at = assert_some(created.created_at, "created_at after insert");

    let fetched = repo.get(created.id).await.unwrap();
    assert_uuid_eq(fetched.id, created.id, "fetched user");
    assert_eq!(fetched.email, created.email);
    assert_eq!(fetched.created_at, Some(created_at));
    assert!(fetched.updated_at.is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_get_missing_user() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("test_get_missing_user");

    let result = repo.get(builder.unknown_id()).await;
    assert!(matches!(result, Err(UserError::NotFound)));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_duplicate_email_is_rejected() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("test_duplicate_email_is_rejected");

    let mut first = user(&builder, "same", "DEU");
    repo.create(&mut first).await.unwrap();

    let mut second = user(&builder, "same", "FRA");
    let result = repo.create(&mut second).await;
    assert!(matches!(result, Err(UserError::DuplicateEmail)));

    let all = repo.list(&UserFilter::default(), 0, 100).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].country, "DEU");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_update_writes_only_masked_fields() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("test_update_writes_only_masked_fields");

    let mut stored = user(&builder, "main", "DEU");
    repo.create(&mut stored).await.unwrap();

    let mut changes = stored.clone();
    changes.first_name = "Augusta".into();
    changes.country = "GBR".into();
    repo.update(&mut changes, &FieldMask::from([UserField::FirstName]))
        .await
        .unwrap();

    let fetched = repo.get(stored.id).await.unwrap();
    assert_eq!(fetched.first_name, "Augusta");
    assert_eq!(fetched.country, "DEU");
    assert!(fetched.updated_at.is_some());
    assert_eq!(fetched.updated_at, changes.updated_at);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_update_email_conflict() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("test_update_email_conflict");

    let mut first = user(&builder, "first", "DEU");
    let mut second = user(&builder, "second", "DEU");
    repo.create(&mut first).await.unwrap();
    repo.create(&mut second).await.unwrap();

    second.email = first.email.clone();
    let result = repo
        .update(&mut second, &FieldMask::from([UserField::Email]))
        .await;

    assert!(matches!(result, Err(UserError::DuplicateEmail)));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_update_missing_user() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("test_update_missing_user");

    let mut ghost = user(&builder, "ghost", "DEU");
    ghost.id = builder.unknown_id();

    let result = repo
        .update(&mut ghost, &FieldMask::from([UserField::Nickname]))
        .await;
    assert!(matches!(result, Err(UserError::NotFound)));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_list_filters_orders_and_paginates() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("test_list_filters_orders_and_paginates");

    let mut ids = Vec::new();
    for (i, country) in ["DEU", "GBR", "DEU", "FRA", "DEU"].iter().enumerate() {
        let mut u = user(&builder, &format!("u{i}"), country);
        repo.create(&mut u).await.unwrap();
        ids.push(u.id);
    }

    let all = repo.list(&UserFilter::default(), 0, 100).await.unwrap();
    assert_eq!(all.iter().map(|u| u.id).collect::<Vec<_>>(), ids);

    let germans = repo
        .list(&UserFilter::by_countries(["DEU"]), 0, 100)
        .await
        .unwrap();
    assert_eq!(germans.len(), 3);

    let mixed = repo
        .list(&UserFilter::by_countries(["GBR", "FRA"]), 0, 100)
        .await
        .unwrap();
    assert_eq!(mixed.len(), 2);

    let page = repo.list(&UserFilter::default(), 1, 2).await.unwrap();
    assert_eq!(page.iter().map(|u| u.id).collect::<Vec<_>>(), ids[1..3]);

    let past_end = repo.list(&UserFilter::default(), 10, 2).await.unwrap();
    assert!(past_end.is_empty());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_delete() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("test_delete");

    let mut u = user(&builder, "main", "DEU");
    repo.create(&mut u).await.unwrap();

    repo.delete(u.id).await.unwrap();

    assert!(matches!(repo.get(u.id).await, Err(UserError::NotFound)));
    assert!(matches!(repo.delete(u.id).await, Err(UserError::NotFound)));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_transaction_commits_on_ok() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("test_transaction_commits_on_ok");
    let pending = user(&builder, "main", "DEU");

    let created = repo
        .transaction(move |tx| {
            Box::pin(async move {
                assert!(tx.in_transaction());
                let mut u = pending;
                tx.create(&mut u).await?;
                Ok(u)
            })
        })
        .await
        .unwrap();

    assert_eq!(repo.get(created.id).await.unwrap().email, created.email);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_transaction_rolls_back_on_err() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("test_transaction_rolls_back_on_err");
    let pending = user(&builder, "main", "DEU");

    let result: Result<(), UserError> = repo
        .transaction(move |tx| {
            Box::pin(async move {
                let mut u = pending;
                tx.create(&mut u).await?;
                Err(UserError::validation("abort"))
            })
        })
        .await;

    assert!(matches!(result, Err(UserError::Validation(_))));
    assert!(repo.list(&UserFilter::default(), 0, 100).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_nested_transaction_joins_outer() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("test_nested_transaction_joins_outer");
    let pending = user(&builder, "main", "DEU");

    let result: Result<(), UserError> = repo
        .transaction(move |outer| {
            Box::pin(async move {
                outer
                    .transaction(move |inner| {
                        Box::pin(async move {
                            let mut u = pending;
                            inner.create(&mut u).await
                        })
                    })
                    .await?;
                Err(UserError::validation("abort outer"))
            })
        })
        .await;

    assert!(result.is_err());
    assert!(repo.list(&UserFilter::default(), 0, 100).await.unwrap().is_empty());
}
