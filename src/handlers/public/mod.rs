// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Service banner and health check. Mounted at the root, outside the
// /api/{version} prefix and the auth gate.

pub mod health;

pub use health::{health, root};
