use async_trait::async_trait;
use sqlx::PgPool;

use super::UserRepository;
use crate::database::models::{NewUser, Status, User, UserRow};
use crate::error::DomainError;

const SELECT_USER: &str =
    "SELECT id, email, password, name, status, created_at, updated_at FROM users";

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn fetch_by_id(&self, id: i64) -> Result<User, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE id = $1", SELECT_USER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::from).ok_or(DomainError::NotFound)
    }

    async fn fetch_by_email(&self, email: &str) -> Result<User, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{} WHERE LOWER(email) = LOWER($1)",
            SELECT_USER
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::from).ok_or(DomainError::NotFound)
    }

    async fn store(&self, user: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (email, password, name, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, email, password, name, status, created_at, updated_at",
        )
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.name)
        .bind(Status::Active.to_db())
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            // Two registrations racing past the existence check
            if let sqlx::Error::Database(db) = &err {
                if db.is_unique_violation() {
                    return DomainError::Conflict;
                }
            }
            DomainError::from(err)
        })?;

        tracing::info!("Registered user {}", row.id);
        Ok(row.into())
    }
}
