//! Outbound adapters implementing domain ports.
//!
//! - **surf_api**: reqwest client behind the `UpstreamHttp` port
//! - **persistence**: Diesel writer for the fallback session table
//!
//! Adapters translate between domain types and wire or row formats and hold
//! no business rules.

pub mod persistence;
pub mod surf_api;
