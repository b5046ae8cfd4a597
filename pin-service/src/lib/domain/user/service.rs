use std::sync::Arc;

use async_trait::async_trait;
use auth::Identity;
use auth::IdentityLookup;
use auth::LookupError;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::DEFAULT_ROLE;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Also serves as the identity lookup behind the authenticator.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service over a repository.
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self.password_hasher.hash(command.password.as_str())?;

        let user = NewUser {
            username: command.username,
            password_hash,
            role: DEFAULT_ROLE.to_string(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User registered"
        );

        Ok(created_user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        self.repository.find_by_username(username).await
    }
}

#[async_trait]
impl<UR> IdentityLookup for UserService<UR>
where
    UR: UserRepository,
{
    async fn find_identity(&self, username: &str) -> Result<Option<Identity>, LookupError> {
        self.find_user_by_username(username)
            .await
            .map(|user| user.map(Identity::from))
            .map_err(|e| LookupError(e.to_string()))
    }
}
