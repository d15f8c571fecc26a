//! PostgreSQL implementations of the repository ports, written against a
//! Pagila-style schema (the Postgres port of the Sakila rental schema).

mod catalog;
mod customers;
mod rentals;

pub use catalog::PostgresCatalogRepository;
pub use customers::PostgresCustomerRepository;
pub use rentals::PostgresRentalRepository;
