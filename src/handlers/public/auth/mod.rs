// handlers/public/auth/mod.rs - Public authentication handlers

pub mod login; // POST /v1/login - check credentials and get a token
pub mod register; // POST /v1/register - create a new user

pub use login::login_post;
pub use register::register_post;
