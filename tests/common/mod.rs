#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use fin_api::app::{app, AppState};
use fin_api::config::AppConfig;
use fin_api::database::models::{
    Account, NewAccount, NewUser, Status, SummaryDaily, SummaryMonthly, Transaction,
    TransactionAccount, TransactionDraft, User,
};
use fin_api::database::repository::{AccountRepository, TransactionRepository, UserRepository};
use fin_api::error::DomainError;
use fin_api::filter::ListQuery;

/// Apply equality filters, keyword and paging the way the SQL builder does
fn page<T: Clone>(
    rows: Vec<T>,
    query: &ListQuery,
    column: impl Fn(&T, &str) -> Option<String>,
    name: impl Fn(&T) -> &str,
) -> Result<(Vec<T>, i64), DomainError> {
    if query.limit < 0 || query.offset < 0 {
        return Err(DomainError::BadParamInput("limit".into()));
    }

    let mut matching = Vec::new();
    'rows: for row in rows {
        for (key, value) in &query.filters {
            match column(&row, key) {
                Some(actual) if &actual == value => {}
                Some(_) => continue 'rows,
                None => return Err(DomainError::BadParamInput(key.clone())),
            }
        }
        if let Some(keyword) = query.effective_keyword() {
            if !name(&row).contains(keyword) {
                continue;
            }
        }
        matching.push(row);
    }

    let total = matching.len() as i64;
    let rows = matching
        .into_iter()
        .skip(query.offset as usize)
        .take(query.limit as usize)
        .collect();
    Ok((rows, total))
}

#[derive(Default)]
pub struct FakeUsers {
    rows: Mutex<Vec<User>>,
    pub mutations: AtomicUsize,
}

#[async_trait]
impl UserRepository for FakeUsers {
    async fn fetch_by_id(&self, id: i64) -> Result<User, DomainError> {
        let rows = self.rows.lock().unwrap();
        rows.iter().find(|u| u.id == id).cloned().ok_or(DomainError::NotFound)
    }

    async fn fetch_by_email(&self, email: &str) -> Result<User, DomainError> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    async fn store(&self, user: NewUser) -> Result<User, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let stored = User {
            id: rows.len() as i64 + 1,
            email: user.email,
            password: user.password,
            name: user.name,
            status: Status::Active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        };
        rows.push(stored.clone());
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(stored)
    }
}

#[derive(Default)]
pub struct FakeAccounts {
    rows: Mutex<Vec<Account>>,
    pub mutations: AtomicUsize,
}

impl FakeAccounts {
    fn any_status(&self, id: i64) -> Option<Account> {
        self.rows.lock().unwrap().iter().find(|a| a.id == id).cloned()
    }
}

#[async_trait]
impl AccountRepository for FakeAccounts {
    async fn fetch_all(&self, query: &ListQuery) -> Result<(Vec<Account>, i64), DomainError> {
        let active: Vec<Account> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.status == Status::Active)
            .cloned()
            .collect();

        page(
            active,
            query,
            |a, key| match key {
                "id" => Some(a.id.to_string()),
                "name" => Some(a.name.clone()),
                "type" => Some(a.kind.clone()),
                "description" => Some(a.description.clone()),
                _ => None,
            },
            |a| a.name.as_str(),
        )
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Account, DomainError> {
        self.any_status(id)
            .filter(|a| a.status == Status::Active)
            .ok_or(DomainError::NotFound)
    }

    async fn store(&self, account: NewAccount, now: DateTime<Utc>) -> Result<Account, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let stored = Account {
            id: rows.len() as i64 + 1,
            name: account.name,
            kind: account.kind,
            description: account.description,
            status: Status::Active,
            created_at: now,
            updated_at: now,
        };
        rows.push(stored.clone());
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(stored)
    }

    async fn update(&self, account: &Account) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|a| a.id == account.id && a.status == Status::Active)
            .ok_or(DomainError::NotFound)?;
        row.name = account.name.clone();
        row.kind = account.kind.clone();
        row.description = account.description.clone();
        row.updated_at = account.updated_at;
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|a| a.id == id) {
            row.status = Status::Inactive;
        }
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone)]
struct StoredTransaction {
    id: i64,
    draft: TransactionDraft,
    status: Status,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub struct FakeTransactions {
    rows: Mutex<Vec<StoredTransaction>>,
    accounts: Arc<FakeAccounts>,
    pub mutations: AtomicUsize,
}

impl FakeTransactions {
    pub fn new(accounts: Arc<FakeAccounts>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            accounts,
            mutations: AtomicUsize::new(0),
        }
    }

    /// Insert a row with a fixed creation time, bypassing the service
    pub fn seed(&self, draft: TransactionDraft, created_at: DateTime<Utc>) -> i64 {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as i64 + 1;
        rows.push(StoredTransaction {
            id,
            draft,
            status: Status::Active,
            created_at,
            updated_at: created_at,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    // LEFT JOIN: the account is attached whatever its status
    fn join(&self, row: &StoredTransaction) -> Transaction {
        let account = self.accounts.any_status(row.draft.account_id);
        Transaction {
            id: row.id,
            name: row.draft.name.clone(),
            kind: row.draft.kind.as_str().to_string(),
            description: row.draft.description.clone(),
            amount_in: row.draft.amount_in,
            amount_out: row.draft.amount_out,
            status: row.status,
            account: TransactionAccount {
                id: row.draft.account_id,
                name: account.as_ref().map(|a| a.name.clone()).unwrap_or_default(),
                kind: account.as_ref().map(|a| a.kind.clone()).unwrap_or_default(),
                description: account
                    .as_ref()
                    .map(|a| a.description.clone())
                    .unwrap_or_default(),
                status: account.map(|a| a.status).unwrap_or(Status::Inactive),
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn averages(rows: &[&StoredTransaction]) -> (Option<Decimal>, Option<Decimal>) {
        let avg = |values: Vec<Decimal>| {
            if values.is_empty() {
                None
            } else {
                Some(values.iter().sum::<Decimal>() / Decimal::from(values.len()))
            }
        };
        let ins = rows
            .iter()
            .map(|r| r.draft.amount_in)
            .filter(|a| !a.is_zero())
            .collect();
        let outs = rows
            .iter()
            .map(|r| r.draft.amount_out)
            .filter(|a| !a.is_zero())
            .collect();
        (avg(ins), avg(outs))
    }
}

#[async_trait]
impl TransactionRepository for FakeTransactions {
    async fn fetch_all(&self, query: &ListQuery) -> Result<(Vec<Transaction>, i64), DomainError> {
        let active: Vec<Transaction> = {
            let rows = self.rows.lock().unwrap();
            rows.iter()
                .filter(|r| r.status == Status::Active)
                .map(|r| self.join(r))
                .collect()
        };

        let mut query = query.clone();
        for key in ["accountId", "account_id"] {
            if let Some(value) = query.filters.get(key) {
                value
                    .parse::<i64>()
                    .map_err(|_| DomainError::BadParamInput(key.into()))?;
            }
        }
        // Amounts compare numerically, so normalize both sides
        for key in ["amountIn", "amount_in", "amountOut", "amount_out"] {
            if let Some(value) = query.filters.get_mut(key) {
                let amount = value
                    .trim()
                    .parse::<Decimal>()
                    .map_err(|_| DomainError::BadParamInput(key.into()))?;
                *value = amount.normalize().to_string();
            }
        }

        page(
            active,
            &query,
            |t, key| match key {
                "accountId" | "account_id" => Some(t.account.id.to_string()),
                "amountIn" | "amount_in" => Some(t.amount_in.normalize().to_string()),
                "amountOut" | "amount_out" => Some(t.amount_out.normalize().to_string()),
                "name" => Some(t.name.clone()),
                "type" => Some(t.kind.clone()),
                "description" => Some(t.description.clone()),
                _ => None,
            },
            |t| t.name.as_str(),
        )
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Transaction, DomainError> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|r| r.id == id && r.status == Status::Active)
            .map(|r| self.join(r))
            .ok_or(DomainError::NotFound)
    }

    async fn store(&self, draft: &TransactionDraft, now: DateTime<Utc>) -> Result<i64, DomainError> {
        let id = self.seed(draft.clone(), now);
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn update(&self, id: i64, draft: &TransactionDraft, now: DateTime<Utc>) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id && r.status == Status::Active)
            .ok_or(DomainError::NotFound)?;
        row.draft = draft.clone();
        row.updated_at = now;
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|r| r.id == id) {
            row.status = Status::Inactive;
        }
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn daily_summary(&self) -> Result<Vec<SummaryDaily>, DomainError> {
        let rows = self.rows.lock().unwrap();
        let mut groups: BTreeMap<(i32, i32, i32), Vec<&StoredTransaction>> = BTreeMap::new();
        for row in rows.iter() {
            let d = row.created_at;
            groups
                .entry((d.year(), d.month() as i32, d.day() as i32))
                .or_default()
                .push(row);
        }
        Ok(groups
            .into_iter()
            .map(|((year, month, day), group)| {
                let (average_in, average_out) = Self::averages(&group);
                SummaryDaily {
                    day,
                    month,
                    year,
                    average_in,
                    average_out,
                }
            })
            .collect())
    }

    async fn monthly_summary(&self) -> Result<Vec<SummaryMonthly>, DomainError> {
        let rows = self.rows.lock().unwrap();
        let mut groups: BTreeMap<(i32, i32), Vec<&StoredTransaction>> = BTreeMap::new();
        for row in rows.iter() {
            let d = row.created_at;
            groups
                .entry((d.year(), d.month() as i32))
                .or_default()
                .push(row);
        }
        Ok(groups
            .into_iter()
            .map(|((year, month), group)| {
                let (average_in, average_out) = Self::averages(&group);
                SummaryMonthly {
                    month,
                    year,
                    average_in,
                    average_out,
                }
            })
            .collect())
    }
}

/// Router wired to in-memory repositories
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub users: Arc<FakeUsers>,
    pub accounts: Arc<FakeAccounts>,
    pub transactions: Arc<FakeTransactions>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::development())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let users = Arc::new(FakeUsers::default());
        let accounts = Arc::new(FakeAccounts::default());
        let transactions = Arc::new(FakeTransactions::new(accounts.clone()));

        let state = AppState::new(&config, users.clone(), accounts.clone(), transactions.clone());

        Self {
            router: app(state.clone()),
            state,
            users,
            accounts,
            transactions,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, json))
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Register and log in a user, returning the bearer token
    pub async fn login(&self, email: &str) -> Result<String> {
        let credentials = serde_json::json!({ "email": email, "password": "pw", "name": "Tester" });
        let (status, _) = self
            .send(Method::POST, "/v1/register", None, Some(credentials.clone()))
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {}", status);

        let (status, body) = self
            .send(Method::POST, "/v1/login", None, Some(credentials))
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {}", status);
        body["token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("login response has no token"))
    }

    pub async fn create_account(&self, token: &str, name: &str, kind: &str) -> Result<i64> {
        let (status, body) = self
            .post(
                "/v1/account",
                token,
                serde_json::json!({ "name": name, "type": kind, "description": format!("{} account", name) }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create account failed: {}", status);
        body["id"]
            .as_i64()
            .ok_or_else(|| anyhow::anyhow!("account response has no id"))
    }
}
