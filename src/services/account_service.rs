use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::with_timeout;
use crate::database::models::{Account, AccountChanges, NewAccount};
use crate::database::repository::AccountRepository;
use crate::error::DomainError;
use crate::filter::ListQuery;

#[async_trait]
pub trait AccountService: Send + Sync {
    async fn fetch_all(&self, query: &ListQuery) -> Result<(Vec<Account>, i64), DomainError>;

    async fn fetch_by_id(&self, id: i64) -> Result<Account, DomainError>;

    async fn create(&self, account: NewAccount) -> Result<Account, DomainError>;

    async fn update(&self, id: i64, changes: AccountChanges) -> Result<Account, DomainError>;

    async fn delete(&self, id: i64) -> Result<(), DomainError>;
}

pub struct AccountServiceImpl {
    repo: Arc<dyn AccountRepository>,
    timeout: Duration,
}

impl AccountServiceImpl {
    pub fn new(repo: Arc<dyn AccountRepository>, timeout: Duration) -> Self {
        Self { repo, timeout }
    }
}

#[async_trait]
impl AccountService for AccountServiceImpl {
    async fn fetch_all(&self, query: &ListQuery) -> Result<(Vec<Account>, i64), DomainError> {
        with_timeout(self.timeout, self.repo.fetch_all(query)).await
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Account, DomainError> {
        with_timeout(self.timeout, self.repo.fetch_by_id(id)).await
    }

    async fn create(&self, account: NewAccount) -> Result<Account, DomainError> {
        with_timeout(self.timeout, self.repo.store(account, Utc::now())).await
    }

    async fn update(&self, id: i64, changes: AccountChanges) -> Result<Account, DomainError> {
        with_timeout(self.timeout, async {
            let existing = self.repo.fetch_by_id(id).await?;

            let mut account = changes.apply(existing);
            account.updated_at = Utc::now();
            self.repo.update(&account).await?;

            self.repo.fetch_by_id(id).await
        })
        .await
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        with_timeout(self.timeout, async {
            self.repo.fetch_by_id(id).await?;
            self.repo.delete(id).await
        })
        .await
    }
}
