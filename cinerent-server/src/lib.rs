//! HTTP layer of the cinerent movie-rental service.
//!
//! The binary lives in `main.rs`; everything else is exported so the
//! integration tests can build the router in-process and drive it without
//! binding a port.

pub mod errors;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
pub use routes::create_app;
