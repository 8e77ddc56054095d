// handlers/mod.rs - Two handler tiers
//
// Public (no auth) → Protected (bearer token, owner-scoped)

pub mod protected;
pub mod public;
