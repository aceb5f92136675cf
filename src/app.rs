use std::sync::Arc;

use axum::{
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::repository::{
    AccountRepository, PgAccountRepository, PgTransactionRepository, PgUserRepository,
    TransactionRepository, UserRepository,
};
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::{
    AccountService, AccountServiceImpl, TransactionService, TransactionServiceImpl, UserService,
    UserServiceImpl,
};

/// Read-only handles shared by every request
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserService>,
    pub accounts: Arc<dyn AccountService>,
    pub transactions: Arc<dyn TransactionService>,
    pub tokens: Arc<TokenService>,
    pub enable_cors: bool,
}

impl AppState {
    /// Wire services over the given repositories
    pub fn new(
        config: &AppConfig,
        user_repo: Arc<dyn UserRepository>,
        account_repo: Arc<dyn AccountRepository>,
        transaction_repo: Arc<dyn TransactionRepository>,
    ) -> Self {
        let timeout = config.request_timeout();
        let tokens = Arc::new(TokenService::from_config(&config.security));

        Self {
            users: Arc::new(UserServiceImpl::new(user_repo, tokens.clone(), timeout)),
            accounts: Arc::new(AccountServiceImpl::new(account_repo.clone(), timeout)),
            transactions: Arc::new(TransactionServiceImpl::new(
                transaction_repo,
                account_repo,
                timeout,
            )),
            tokens,
            enable_cors: config.security.enable_cors,
        }
    }

    /// PostgreSQL-backed state
    pub fn from_pool(config: &AppConfig, pool: PgPool) -> Self {
        Self::new(
            config,
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgAccountRepository::new(pool.clone())),
            Arc::new(PgTransactionRepository::new(pool)),
        )
    }
}

pub fn app(state: AppState) -> Router {
    let enable_cors = state.enable_cors;

    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/v1", public_routes().merge(protected_routes(state.clone())))
        .with_state(state);

    let router = if enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };
    router.layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/login", post(auth::login_post))
        .route("/register", post(auth::register_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{account, transaction};

    Router::new()
        .route("/profile", get(protected::profile_get))
        .route(
            "/account",
            get(account::account_list).post(account::account_post),
        )
        .route(
            "/account/:id",
            get(account::account_get)
                .patch(account::account_patch)
                .delete(account::account_delete),
        )
        .route(
            "/transaction",
            get(transaction::transaction_list).post(transaction::transaction_post),
        )
        .route("/transaction/daily", get(transaction::transaction_daily))
        .route("/transaction/monthly", get(transaction::transaction_monthly))
        .route(
            "/transaction/:id",
            get(transaction::transaction_get)
                .patch(transaction::transaction_patch)
                .delete(transaction::transaction_delete),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "Fin API (Rust)",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Personal finance API - users, ledger accounts, transactions and summaries",
        "endpoints": {
            "public": "/v1/login, /v1/register",
            "profile": "/v1/profile (protected)",
            "account": "/v1/account[/:id] (protected)",
            "transaction": "/v1/transaction[/:id|/daily|/monthly] (protected)",
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}
