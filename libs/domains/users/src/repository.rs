use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{FieldMask, User, UserFilter};

/// Persistence contract for users.
///
/// `create` and `update` write the store-assigned values (`id`, `created_at`,
/// `updated_at`) back into the record they are given.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch one user, `UserError::NotFound` if absent
    async fn get(&self, id: Uuid) -> UserResult<User>;

    /// Users matching `filter`, oldest first. No default is applied to `limit`.
    async fn list(&self, filter: &UserFilter, offset: u64, limit: u64) -> UserResult<Vec<User>>;

    /// Insert a user, assigning `id` and `created_at`
    async fn create(&self, user: &mut User) -> UserResult<()>;

    /// Write the masked attributes of `user` and refresh `updated_at`
    async fn update(&self, user: &mut User, mask: &FieldMask) -> UserResult<()>;

    /// Remove a user, `UserError::NotFound` if no row was affected
    async fn delete(&self, id: Uuid) -> UserResult<()>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

/// Strictly later than `previous`, so back-to-back writes never share a timestamp.
fn next_timestamp(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match previous {
        Some(prev) if now <= prev => prev + chrono::Duration::microseconds(1),
        _ => now,
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: Uuid) -> UserResult<User> {
        let users = self.users.read().await;
        users.get(&id).cloned().ok_or(UserError::NotFound)
    }

    async fn list(&self, filter: &UserFilter, offset: u64, limit: u64) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users.values().filter(|u| filter.matches(u)).cloned().collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(result.into_iter().skip(offset).take(limit).collect())
    }

    async fn create(&self, user: &mut User) -> UserResult<()> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::DuplicateEmail);
        }

        let latest = users.values().filter_map(|u| u.created_at).max();
        user.id = Uuid::now_v7();
        user.created_at = Some(next_timestamp(latest));
        user.updated_at = None;
        users.insert(user.id, user.clone());

        tracing::debug!(user_id = %user.id, "Inserted user");
        Ok(())
    }

    async fn update(&self, user: &mut User, mask: &FieldMask) -> UserResult<()> {
        let mut users = self.users.write().await;

        if mask.contains(crate::models::UserField::Email)
            && users.values().any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(UserError::DuplicateEmail);
        }

        let stored = users.get_mut(&user.id).ok_or(UserError::NotFound)?;
        stored.apply(user, mask);
        let updated_at = next_timestamp(stored.updated_at.or(stored.created_at));
        stored.updated_at = Some(updated_at);
        user.updated_at = Some(updated_at);

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> UserResult<()> {
        let mut users = self.users.write().await;
        users.remove(&id).map(|_| ()).ok_or(UserError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserField;

    fn user(email: &str, country: &str) -> User {
        User::new("Ada", "Lovelace", "ada", "s3cret", email, country)
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_created_at() {
        let repo = InMemoryUserRepository::new();
        let mut u = user("ada@example.com", "GBR");

        repo.create(&mut u).await.unwrap();

        assert!(!u.id.is_nil());
        assert!(u.created_at.is_some());
        assert_eq!(repo.get(u.id).await.unwrap(), u);
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        let mut first = user("ada@example.com", "GBR");
        let mut second = user("ada@example.com", "DEU");

        repo.create(&mut first).await.unwrap();
        let result = repo.create(&mut second).await;

        assert!(matches!(result, Err(UserError::DuplicateEmail)));
        assert_eq!(repo.len().await, 1);
        assert_eq!(repo.get(first.id).await.unwrap().country, "GBR");
    }

    #[tokio::test]
    async fn test_update_writes_only_masked_fields() {
        let repo = InMemoryUserRepository::new();
        let mut u = user("ada@example.com", "GBR");
        repo.create(&mut u).await.unwrap();

        let mut changes = u.clone();
        changes.first_name = "Augusta".to_string();
        changes.last_name = "King".to_string();
        repo.update(&mut changes, &FieldMask::from([UserField::FirstName]))
            .await
            .unwrap();

        let stored = repo.get(u.id).await.unwrap();
        assert_eq!(stored.first_name, "Augusta");
        assert_eq!(stored.last_name, "Lovelace");
        assert!(stored.updated_at.is_some());
        assert_eq!(stored.updated_at, changes.updated_at);
    }

    #[tokio::test]
    async fn test_update_timestamps_increase() {
        let repo = InMemoryUserRepository::new();
        let mut u = user("ada@example.com", "GBR");
        repo.create(&mut u).await.unwrap();

        let mask = FieldMask::from([UserField::Nickname]);
        repo.update(&mut u, &mask).await.unwrap();
        let first = u.updated_at.unwrap();
        repo.update(&mut u, &mask).await.unwrap();
        let second = u.updated_at.unwrap();

        assert!(first > u.created_at.unwrap());
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = InMemoryUserRepository::new();
        let mut u = user("ada@example.com", "GBR");
        u.id = Uuid::new_v4();

        let result = repo.update(&mut u, &FieldMask::from([UserField::FirstName])).await;
        assert!(matches!(result, Err(UserError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let repo = InMemoryUserRepository::new();
        for (i, country) in ["DEU", "GBR", "DEU", "FRA", "DEU"].iter().enumerate() {
            let mut u = user(&format!("user{i}@example.com"), country);
            repo.create(&mut u).await.unwrap();
        }

        let all = repo.list(&UserFilter::default(), 0, 100).await.unwrap();
        assert_eq!(all.len(), 5);

        let germans = repo.list(&UserFilter::by_countries(["DEU"]), 0, 100).await.unwrap();
        assert_eq!(germans.len(), 3);
        assert!(germans.iter().all(|u| u.country == "DEU"));

        let page = repo.list(&UserFilter::default(), 1, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, all[1].id);
        assert_eq!(page[1].id, all[2].id);

        let none = repo.list(&UserFilter::by_countries(["USA"]), 0, 100).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryUserRepository::new();
        let mut u = user("ada@example.com", "GBR");
        repo.create(&mut u).await.unwrap();

        repo.delete(u.id).await.unwrap();

        assert!(matches!(repo.get(u.id).await, Err(UserError::NotFound)));
        assert!(matches!(repo.delete(u.id).await, Err(UserError::NotFound)));
    }
}
