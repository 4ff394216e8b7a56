use crate::domain::repository::UserRepository;
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

#[derive(Clone)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self), fields(user_id = %user.id, username = %user.username))]
    async fn save_user(&self, user: User) -> Result<()> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        storage.insert(user.id.clone(), user.clone());
        debug!(
            user_id = %user.id,
            username = %user.username,
            "User saved to memory storage"
        );
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user.id))]
    async fn update_user(&self, user: User) -> Result<()> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        storage.insert(user.id.clone(), user.clone());
        debug!(user_id = %user.id, "User updated in memory storage");
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = id))]
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let user = storage.get(id).cloned();
        match &user {
            Some(u) => debug!(user_id = %u.id, username = %u.username, "User found in storage"),
            None => trace!(user_id = id, "User not found in storage"),
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(username = username))]
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let user = storage.values().find(|u| u.username == username).cloned();
        match &user {
            Some(u) => debug!(user_id = %u.id, username = %u.username, "User found in storage"),
            None => trace!(username = username, "User not found in storage"),
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(email = email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let user = storage.values().find(|u| u.email == email).cloned();
        match &user {
            Some(u) => debug!(user_id = %u.id, email = %u.email, "User found in storage"),
            None => trace!(email = email, "User not found in storage"),
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(id: &str, username: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_user_saves_user_correctly() {
        let repo = InMemoryUserRepository::new();
        let user = sample_user("user-1", "reader", "reader@example.com");

        repo.save_user(user.clone()).await.unwrap();

        let retrieved = repo.find_user_by_id("user-1").await.unwrap().unwrap();
        assert_eq!(retrieved.id, user.id);
        assert_eq!(retrieved.username, user.username);
        assert_eq!(retrieved.email, user.email);
        assert_eq!(retrieved.password_hash, user.password_hash);
    }

    #[tokio::test]
    async fn test_find_user_by_username() {
        let repo = InMemoryUserRepository::new();
        repo.save_user(sample_user("user-2", "alice", "alice@example.com"))
            .await
            .unwrap();

        let found = repo.find_user_by_username("alice").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().id, "user-2");
    }

    #[tokio::test]
    async fn test_find_user_by_email() {
        let repo = InMemoryUserRepository::new();
        repo.save_user(sample_user("user-3", "bob", "bob@example.com"))
            .await
            .unwrap();

        let found = repo.find_user_by_email("bob@example.com").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().id, "user-3");
    }

    #[tokio::test]
    async fn test_lookups_return_none_for_unknown_values() {
        let repo = InMemoryUserRepository::new();

        assert!(repo.find_user_by_id("missing").await.unwrap().is_none());
        assert!(
            repo.find_user_by_username("missing")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            repo.find_user_by_email("missing@example.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_update_user_overwrites_existing_user() {
        let repo = InMemoryUserRepository::new();
        repo.save_user(sample_user("user-4", "first", "first@example.com"))
            .await
            .unwrap();

        let mut updated = sample_user("user-4", "second", "second@example.com");
        updated.password_hash = "hash2".to_string();
        repo.update_user(updated).await.unwrap();

        let retrieved = repo.find_user_by_id("user-4").await.unwrap().unwrap();
        assert_eq!(retrieved.username, "second");
        assert_eq!(retrieved.email, "second@example.com");
        assert_eq!(retrieved.password_hash, "hash2");
    }

    #[tokio::test]
    async fn test_find_user_by_email_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.save_user(sample_user("user-5", "carol", "Carol@Example.com"))
            .await
            .unwrap();

        assert!(
            repo.find_user_by_email("Carol@Example.com")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            repo.find_user_by_email("carol@example.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_concurrent_writes() {
        let repo = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let repo_clone = repo.clone();
                let user = sample_user(
                    &format!("user-{}", i),
                    &format!("reader{}", i),
                    &format!("reader{}@example.com", i),
                );
                tokio::spawn(async move { repo_clone.save_user(user).await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        for i in 0..10 {
            let found = repo.find_user_by_id(&format!("user-{}", i)).await.unwrap();
            assert!(found.is_some());
        }
    }
}
