//! Faceted search for a property and roommate marketplace
//!
//! The [`filter`] module is the engine: criteria, query-string codec,
//! predicate evaluator, pagination and debounced URL sync. The remaining
//! modules serve it over HTTP on top of an embedded listing store.

pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handler;
pub mod listing;
pub mod middleware;
pub mod model;
pub mod route;
pub mod sessions;
