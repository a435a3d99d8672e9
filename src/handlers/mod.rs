// handlers/mod.rs - HTTP handlers grouped by security tier
//
// Public (no auth) → Protected (JWT auth, admin-only routes additionally
// pass through the role guard in routes.rs)
pub mod protected;
pub mod public;
