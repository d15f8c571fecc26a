use std::fmt;
use std::sync::Arc;

use sqlx::PgPool;

use cinerent_core::database::ports::{CatalogRepository, CustomerRepository, RentalRepository};
use cinerent_core::database::postgres::{
    PostgresCatalogRepository, PostgresCustomerRepository, PostgresRentalRepository,
};

/// Shared handles for the route handlers. Repositories are held as trait
/// objects so tests can swap in in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogRepository>,
    pub rentals: Arc<dyn RentalRepository>,
    pub customers: Arc<dyn CustomerRepository>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        rentals: Arc<dyn RentalRepository>,
        customers: Arc<dyn CustomerRepository>,
    ) -> Self {
        Self {
            catalog,
            rentals,
            customers,
        }
    }

    /// Wires the PostgreSQL repositories over one shared pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PostgresCatalogRepository::new(pool.clone())),
            Arc::new(PostgresRentalRepository::new(pool.clone())),
            Arc::new(PostgresCustomerRepository::new(pool)),
        )
    }
}
