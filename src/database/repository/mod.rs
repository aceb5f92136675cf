//! Persistence contracts, one per entity, plus their PostgreSQL implementations.
//!
//! Every read path excludes inactive rows except the summaries. A missing row
//! is reported as `DomainError::NotFound`.

pub mod account;
pub mod transaction;
pub mod user;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::database::models::{
    Account, NewAccount, NewUser, SummaryDaily, SummaryMonthly, Transaction, TransactionDraft, User,
};
use crate::error::DomainError;
use crate::filter::ListQuery;

pub use account::PgAccountRepository;
pub use transaction::PgTransactionRepository;
pub use user::PgUserRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn fetch_by_id(&self, id: i64) -> Result<User, DomainError>;

    /// Case-insensitive match on the email column
    async fn fetch_by_email(&self, email: &str) -> Result<User, DomainError>;

    async fn store(&self, user: NewUser) -> Result<User, DomainError>;
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// One page of active accounts plus the total matching count
    async fn fetch_all(&self, query: &ListQuery) -> Result<(Vec<Account>, i64), DomainError>;

    async fn fetch_by_id(&self, id: i64) -> Result<Account, DomainError>;

    async fn store(&self, account: NewAccount, now: DateTime<Utc>) -> Result<Account, DomainError>;

    /// Persist name, type, description and updatedAt of an active account
    async fn update(&self, account: &Account) -> Result<(), DomainError>;

    /// Soft delete: flips the status to inactive
    async fn delete(&self, id: i64) -> Result<(), DomainError>;
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn fetch_all(&self, query: &ListQuery) -> Result<(Vec<Transaction>, i64), DomainError>;

    async fn fetch_by_id(&self, id: i64) -> Result<Transaction, DomainError>;

    /// Returns the new transaction id
    async fn store(&self, draft: &TransactionDraft, now: DateTime<Utc>) -> Result<i64, DomainError>;

    async fn update(&self, id: i64, draft: &TransactionDraft, now: DateTime<Utc>) -> Result<(), DomainError>;

    async fn delete(&self, id: i64) -> Result<(), DomainError>;

    async fn daily_summary(&self) -> Result<Vec<SummaryDaily>, DomainError>;

    async fn monthly_summary(&self) -> Result<Vec<SummaryMonthly>, DomainError>;
}
