//! In-process user store.
//!
//! Used when no database is configured and by the test suites. Contents
//! are lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

#[derive(Default)]
struct Inner {
    next_id: i64,
    users: HashMap<String, User>,
}

/// Thread-safe in-memory user repository.
#[derive(Default)]
pub struct InMemoryUserRepository {
    inner: RwLock<Inner>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.inner.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store a user record as-is, without registration rules.
    ///
    /// Stands in for rows written by other tools or older deployments.
    pub fn insert(
        &self,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        role: impl Into<String>,
    ) -> Result<User, UserError> {
        self.inner
            .write()
            .store(username.into(), password_hash.into(), role.into())
    }
}

impl Inner {
    fn store(
        &mut self,
        username: String,
        password_hash: String,
        role: String,
    ) -> Result<User, UserError> {
        if self.users.contains_key(&username) {
            return Err(UserError::UsernameAlreadyExists(username));
        }

        self.next_id += 1;
        let stored = User {
            id: UserId(self.next_id),
            username,
            password_hash,
            role,
        };
        self.users.insert(stored.username.clone(), stored.clone());

        Ok(stored)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        self.inner.write().store(
            user.username.as_str().to_string(),
            user.password_hash,
            user.role,
        )
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        Ok(self.inner.read().users.get(username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::models::Username;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: Username::new(name.to_string()).unwrap(),
            password_hash: "hash".to_string(),
            role: "USER".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repository = InMemoryUserRepository::new();

        let alice = repository.create(new_user("alice")).await.unwrap();
        let bob = repository.create(new_user("bob")).await.unwrap();

        assert_eq!(alice.id, UserId(1));
        assert_eq!(bob.id, UserId(2));
        assert_eq!(repository.len(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_username() {
        let repository = InMemoryUserRepository::new();
        repository.create(new_user("alice")).await.unwrap();

        let result = repository.create(new_user("alice")).await;
        assert!(matches!(result, Err(UserError::UsernameAlreadyExists(_))));
        assert_eq!(repository.len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_username() {
        let repository = InMemoryUserRepository::new();
        repository.create(new_user("alice")).await.unwrap();

        let found = repository.find_by_username("alice").await.unwrap();
        assert_eq!(found.map(|user| user.id), Some(UserId(1)));
        assert!(repository.find_by_username("carol").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_keeps_unregistrable_names() {
        let repository = InMemoryUserRepository::new();
        repository.create(new_user("alice")).await.unwrap();

        let stored = repository
            .insert("alice@example.com", "hash", "ADMIN")
            .unwrap();
        assert_eq!(stored.id, UserId(2));

        let found = repository
            .find_by_username("alice@example.com")
            .await
            .unwrap()
            .expect("Stored user not found");
        assert_eq!(found, stored);

        assert!(matches!(
            repository.insert("alice", "other", "USER"),
            Err(UserError::UsernameAlreadyExists(_))
        ));
    }
}
