use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::with_timeout;
use crate::auth::credentials::{digest_password, normalize_email};
use crate::auth::TokenService;
use crate::database::models::{NewUser, User};
use crate::database::repository::UserRepository;
use crate::error::DomainError;

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user; Conflict when the email is already registered
    async fn register(&self, input: RegisterInput) -> Result<User, DomainError>;

    /// Check credentials and issue a bearer token
    async fn login(&self, email: &str, password: &str) -> Result<String, DomainError>;

    async fn fetch_by_id(&self, id: i64) -> Result<User, DomainError>;
}

pub struct UserServiceImpl {
    repo: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    timeout: Duration,
}

impl UserServiceImpl {
    pub fn new(repo: Arc<dyn UserRepository>, tokens: Arc<TokenService>, timeout: Duration) -> Self {
        Self {
            repo,
            tokens,
            timeout,
        }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn register(&self, input: RegisterInput) -> Result<User, DomainError> {
        with_timeout(self.timeout, async {
            let email = normalize_email(&input.email);

            match self.repo.fetch_by_email(&email).await {
                Ok(_) => return Err(DomainError::Conflict),
                Err(DomainError::NotFound) => {}
                Err(err) => return Err(err),
            }

            let now = Utc::now();
            self.repo
                .store(NewUser {
                    email,
                    password: digest_password(&input.password),
                    name: input.name,
                    created_at: now,
                    updated_at: now,
                })
                .await
        })
        .await
    }

    async fn login(&self, email: &str, password: &str) -> Result<String, DomainError> {
        with_timeout(self.timeout, async {
            // Unknown email reports as Conflict, as existing clients expect
            let user = match self.repo.fetch_by_email(&normalize_email(email)).await {
                Ok(user) => user,
                Err(DomainError::NotFound) => return Err(DomainError::Conflict),
                Err(err) => return Err(err),
            };

            if digest_password(password) != user.password {
                return Err(DomainError::WrongPassword);
            }

            Ok(self.tokens.issue(user.id, &user.email)?)
        })
        .await
    }

    async fn fetch_by_id(&self, id: i64) -> Result<User, DomainError> {
        with_timeout(self.timeout, self.repo.fetch_by_id(id)).await
    }
}
