// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and account creation.
// Route prefix: /v1 (e.g. /v1/login, /v1/register)

pub mod auth;

pub use auth::*;
