//! Repository ports. The HTTP layer depends on these traits only; the
//! PostgreSQL implementations live in [`crate::database::postgres`].

mod catalog;
mod customers;
mod rentals;

pub use catalog::CatalogRepository;
pub use customers::CustomerRepository;
pub use rentals::RentalRepository;
