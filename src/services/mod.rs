//! Use-case layer: business rules between the handlers and the repositories.
//!
//! Every repository interaction runs under the configured request budget.
//! When it elapses the in-flight future is dropped and the call fails with
//! `DomainError::Timeout`.

pub mod account_service;
pub mod transaction_service;
pub mod user_service;

use std::future::Future;
use std::time::Duration;

use crate::error::DomainError;

pub use account_service::{AccountService, AccountServiceImpl};
pub use transaction_service::{TransactionService, TransactionServiceImpl};
pub use user_service::{RegisterInput, UserService, UserServiceImpl};

/// Run `operation` to completion or fail once `budget` has passed
pub(crate) async fn with_timeout<T, F>(budget: Duration, operation: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    match tokio::time::timeout(budget, operation).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("operation exceeded {:?} budget", budget);
            Err(DomainError::Timeout)
        }
    }
}
