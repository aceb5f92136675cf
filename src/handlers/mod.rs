// handlers/mod.rs - two security tiers
//
// Public (no auth) → Protected (bearer token required)

pub mod protected;
pub mod public;
pub mod utils;

pub use protected::*;
pub use public::*;
