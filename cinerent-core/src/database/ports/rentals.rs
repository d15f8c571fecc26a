use async_trait::async_trait;

use crate::error::Result;

// Rental lifecycle: checkout and return.
#[async_trait]
pub trait RentalRepository: Send + Sync {
    /// Rents one available copy of the film to the customer identified by
    /// exact first/last name, returning the new rental id.
    ///
    /// Fails with `NotFound` when no customer matches, `Unavailable` when
    /// every copy of the film is checked out.
    async fn rent_film(&self, film_id: i32, first_name: &str, last_name: &str) -> Result<i32>;

    /// Marks the rental returned by stamping its return date. Stamping an
    /// already-returned rental just refreshes the date.
    async fn return_film(&self, rental_id: i32) -> Result<()>;
}
