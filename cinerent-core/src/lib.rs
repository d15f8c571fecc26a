//! Domain core for the cinerent movie-rental service.
//!
//! Exposes the repository ports (async traits) the HTTP layer talks to,
//! their PostgreSQL implementations against a Pagila-style schema, and the
//! shared error taxonomy. The server crate holds the ports as trait objects
//! so tests can substitute in-memory fakes.

pub mod database;
pub mod error;
pub mod types;

pub use error::{RentalError, Result};
