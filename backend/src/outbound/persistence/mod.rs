//! PostgreSQL persistence for the fallback session table.
//!
//! Diesel rows and the table definition stay private to this module; the
//! domain only sees the `FallbackSessionStore` port. Connections come from a
//! `bb8` pool over `diesel-async`.

mod diesel_fallback_session_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_fallback_session_store::DieselFallbackSessionStore;
pub use migrations::run_pending_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
