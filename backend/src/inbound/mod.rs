//! Inbound adapters that translate external requests into domain calls.
//!
//! Actix handlers live under [`http`]; framework types stop at this edge.

pub mod http;
