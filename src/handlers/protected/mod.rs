// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every route here sits behind jwt_auth_middleware, which places an
// AuthUser in the request extensions before the handler runs.

pub mod account; // /v1/account
pub mod profile; // /v1/profile
pub mod transaction; // /v1/transaction

pub use profile::profile_get;
