pub mod account;
pub mod summary;
pub mod transaction;
pub mod user;

pub use account::{Account, AccountChanges, AccountRow, NewAccount};
pub use summary::{SummaryDaily, SummaryMonthly};
pub use transaction::{
    Transaction, TransactionAccount, TransactionDraft, TransactionKind, TransactionRow,
};
pub use user::{NewUser, User, UserRow};

use serde::{Deserialize, Serialize};

/// Row status, stored as SMALLINT 1/0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub fn to_db(self) -> i16 {
        match self {
            Status::Active => 1,
            Status::Inactive => 0,
        }
    }
}

impl From<i16> for Status {
    fn from(value: i16) -> Self {
        if value == 1 {
            Status::Active
        } else {
            Status::Inactive
        }
    }
}
