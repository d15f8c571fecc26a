use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    CustomerField, CustomerMatch, CustomerProfile, DelinquentCustomer, NewCustomer, OpenRental,
};

// Customer directory: lookup, onboarding, targeted updates, deletion.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Substring search across first name, last name, and email.
    async fn search(&self, term: &str) -> Result<Vec<CustomerMatch>>;

    /// Full profile with the address chain resolved.
    async fn profile(&self, customer_id: i32) -> Result<Option<CustomerProfile>>;

    /// Rentals of the customer that have not been returned.
    async fn open_rentals(&self, customer_id: i32) -> Result<Vec<OpenRental>>;

    /// Creates the customer, materializing country, city, and address rows
    /// on demand. Returns the new customer id.
    async fn create(&self, customer: &NewCustomer) -> Result<i32>;

    /// Writes a single whitelisted field, routed to the table the field
    /// belongs to (which may be up the customer's address chain).
    async fn update_field(&self, customer_id: i32, field: CustomerField, value: &str)
    -> Result<()>;

    /// Hard delete.
    async fn delete(&self, customer_id: i32) -> Result<()>;

    /// Customers holding at least one open rental, for the report.
    async fn delinquents(&self) -> Result<Vec<DelinquentCustomer>>;
}
