use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::with_timeout;
use crate::database::models::{SummaryDaily, SummaryMonthly, Transaction, TransactionDraft};
use crate::database::repository::{AccountRepository, TransactionRepository};
use crate::error::DomainError;
use crate::filter::ListQuery;

#[async_trait]
pub trait TransactionService: Send + Sync {
    async fn fetch_all(&self, query: &ListQuery) -> Result<(Vec<Transaction>, i64), DomainError>;

    async fn fetch_by_id(&self, id: i64) -> Result<Transaction, DomainError>;

    /// The referenced account must exist
    async fn create(&self, draft: TransactionDraft) -> Result<Transaction, DomainError>;

    /// Both the transaction and the referenced account must exist
    async fn update(&self, id: i64, draft: TransactionDraft) -> Result<Transaction, DomainError>;

    async fn delete(&self, id: i64) -> Result<(), DomainError>;

    async fn daily_summary(&self) -> Result<Vec<SummaryDaily>, DomainError>;

    async fn monthly_summary(&self) -> Result<Vec<SummaryMonthly>, DomainError>;
}

pub struct TransactionServiceImpl {
    repo: Arc<dyn TransactionRepository>,
    accounts: Arc<dyn AccountRepository>,
    timeout: Duration,
}

impl TransactionServiceImpl {
    pub fn new(
        repo: Arc<dyn TransactionRepository>,
        accounts: Arc<dyn AccountRepository>,
        timeout: Duration,
    ) -> Self {
        Self {
            repo,
            accounts,
            timeout,
        }
    }
}

#[async_trait]
impl TransactionService for TransactionServiceImpl {
    async fn fetch_all(&self, query: &ListQuery) -> Result<(Vec<Transaction>, i64), DomainError> {
        with_timeout(self.timeout, self.repo.fetch_all(query)).await
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Transaction, DomainError> {
        with_timeout(self.timeout, self.repo.fetch_by_id(id)).await
    }

    async fn create(&self, draft: TransactionDraft) -> Result<Transaction, DomainError> {
        with_timeout(self.timeout, async {
            self.accounts.fetch_by_id(draft.account_id).await?;

            let id = self.repo.store(&draft, Utc::now()).await?;
            self.repo.fetch_by_id(id).await
        })
        .await
    }

    async fn update(&self, id: i64, draft: TransactionDraft) -> Result<Transaction, DomainError> {
        with_timeout(self.timeout, async {
            self.repo.fetch_by_id(id).await?;
            self.accounts.fetch_by_id(draft.account_id).await?;

            self.repo.update(id, &draft, Utc::now()).await?;
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

    async fn daily_summary(&self) -> Result<Vec<SummaryDaily>, DomainError> {
        with_timeout(self.timeout, self.repo.daily_summary()).await
    }

    async fn monthly_summary(&self) -> Result<Vec<SummaryMonthly>, DomainError> {
        with_timeout(self.timeout, self.repo.monthly_summary()).await
    }
}
