//! Film catalog service
//!
//! An axum application serving an in-memory film collection: listing,
//! lookup, append, shallow-merge update, removal, name search, year ordering
//! and poster uploads, plus token based login.

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod uploads;

pub use routes::create_router;
pub use state::AppState;
