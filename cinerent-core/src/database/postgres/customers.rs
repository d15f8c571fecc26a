use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;

use crate::database::ports::CustomerRepository;
use crate::error::{RentalError, Result};
use crate::types::{
    CustomerField, CustomerMatch, CustomerProfile, DelinquentCustomer, NewCustomer, OpenRental,
};

/// Store new customers are registered under.
const DEFAULT_STORE_ID: i32 = 1;

/// PostgreSQL-backed implementation of the `CustomerRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    async fn search(&self, term: &str) -> Result<Vec<CustomerMatch>> {
        let like = format!("%{term}%");
        sqlx::query_as::<_, CustomerMatch>(
            r#"
            SELECT c.customer_id, c.first_name, c.last_name, c.email
            FROM customer c
            WHERE c.first_name ILIKE $1
               OR c.last_name ILIKE $1
               OR c.email ILIKE $1
            ORDER BY c.last_name, c.first_name
            "#,
        )
        .bind(like)
        .fetch_all(self.pool())
        .await
        .map_err(|e| RentalError::Internal(format!("Failed to search customers: {e}")))
    }

    async fn profile(&self, customer_id: i32) -> Result<Option<CustomerProfile>> {
        sqlx::query_as::<_, CustomerProfile>(
            r#"
            SELECT c.customer_id, c.store_id, c.first_name, c.last_name, c.email,
                   c.activebool AS active, c.create_date,
                   a.address, a.district, a.postal_code, a.phone,
                   ci.city, co.country
            FROM customer c
            JOIN address a ON a.address_id = c.address_id
            JOIN city ci ON ci.city_id = a.city_id
            JOIN country co ON co.country_id = ci.country_id
            WHERE c.customer_id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            RentalError::Internal(format!("Failed to load customer {customer_id}: {e}"))
        })
    }

    async fn open_rentals(&self, customer_id: i32) -> Result<Vec<OpenRental>> {
        sqlx::query_as::<_, OpenRental>(
            r#"
            SELECT r.rental_id, f.title AS film_title, r.rental_date
            FROM rental r
            JOIN inventory i ON i.inventory_id = r.inventory_id
            JOIN film f ON f.film_id = i.film_id
            WHERE r.customer_id = $1 AND r.return_date IS NULL
            ORDER BY r.rental_date
            "#,
        )
        .bind(customer_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            RentalError::Internal(format!(
                "Failed to list open rentals for customer {customer_id}: {e}"
            ))
        })
    }

    async fn create(&self, customer: &NewCustomer) -> Result<i32> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| RentalError::Internal(format!("Failed to start transaction: {e}")))?;

        // Lookup chain is resolved bottom-up: country, then city, then
        // address, inserting whatever is missing along the way.
        let country_id = resolve_country(&mut tx, &customer.country).await?;
        let city_id = resolve_city(&mut tx, &customer.city, country_id).await?;
        let address_id = resolve_address(&mut tx, customer, city_id).await?;

        let customer_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO customer
                (store_id, first_name, last_name, email, address_id,
                 activebool, create_date, active)
            VALUES ($1, $2, $3, $4, $5, TRUE, CURRENT_DATE, 1)
            RETURNING customer_id
            "#,
        )
        .bind(DEFAULT_STORE_ID)
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(address_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RentalError::Internal(format!("Failed to create customer: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| RentalError::Internal(format!("Failed to commit customer: {e}")))?;

        info!(customer_id, "created customer");
        Ok(customer_id)
    }

    async fn update_field(
        &self,
        customer_id: i32,
        field: CustomerField,
        value: &str,
    ) -> Result<()> {
        let result = sqlx::query(&update_statement(field))
            .bind(value)
            .bind(customer_id)
            .execute(self.pool())
            .await
            .map_err(|e| {
                RentalError::Internal(format!(
                    "Failed to update {} for customer {customer_id}: {e}",
                    field.column()
                ))
            })?;

        if result.rows_affected() == 0 {
            return Err(RentalError::NotFound("Customer".to_string()));
        }

        info!(customer_id, field = field.column(), "updated customer field");
        Ok(())
    }

    async fn delete(&self, customer_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM customer WHERE customer_id = $1")
            .bind(customer_id)
            .execute(self.pool())
            .await
            .map_err(|e| {
                RentalError::Internal(format!("Failed to delete customer {customer_id}: {e}"))
            })?;

        if result.rows_affected() == 0 {
            return Err(RentalError::NotFound("Customer".to_string()));
        }

        info!(customer_id, "deleted customer");
        Ok(())
    }

    async fn delinquents(&self) -> Result<Vec<DelinquentCustomer>> {
        sqlx::query_as::<_, DelinquentCustomer>(
            r#"
            SELECT c.customer_id, c.first_name, c.last_name, c.email,
                   COUNT(r.rental_id) AS open_rentals
            FROM customer c
            JOIN rental r ON r.customer_id = c.customer_id
                         AND r.return_date IS NULL
            GROUP BY c.customer_id, c.first_name, c.last_name, c.email
            ORDER BY c.last_name, c.first_name
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            RentalError::Internal(format!("Failed to list customers with open rentals: {e}"))
        })
    }
}

async fn resolve_country(tx: &mut Transaction<'_, Postgres>, country: &str) -> Result<i32> {
    let existing: Option<i32> =
        sqlx::query_scalar("SELECT country_id FROM country WHERE country = $1")
            .bind(country)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| RentalError::Internal(format!("Failed to look up country: {e}")))?;

    if let Some(id) = existing {
        return Ok(id);
    }

    sqlx::query_scalar("INSERT INTO country (country) VALUES ($1) RETURNING country_id")
        .bind(country)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| RentalError::Internal(format!("Failed to create country: {e}")))
}

async fn resolve_city(
    tx: &mut Transaction<'_, Postgres>,
    city: &str,
    country_id: i32,
) -> Result<i32> {
    let existing: Option<i32> =
        sqlx::query_scalar("SELECT city_id FROM city WHERE city = $1 AND country_id = $2")
            .bind(city)
            .bind(country_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| RentalError::Internal(format!("Failed to look up city: {e}")))?;

    if let Some(id) = existing {
        return Ok(id);
    }

    sqlx::query_scalar("INSERT INTO city (city, country_id) VALUES ($1, $2) RETURNING city_id")
        .bind(city)
        .bind(country_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| RentalError::Internal(format!("Failed to create city: {e}")))
}

async fn resolve_address(
    tx: &mut Transaction<'_, Postgres>,
    customer: &NewCustomer,
    city_id: i32,
) -> Result<i32> {
    let existing: Option<i32> =
        sqlx::query_scalar("SELECT address_id FROM address WHERE address = $1 AND city_id = $2")
            .bind(&customer.address)
            .bind(city_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| RentalError::Internal(format!("Failed to look up address: {e}")))?;

    if let Some(id) = existing {
        return Ok(id);
    }

    sqlx::query_scalar(
        r#"
        INSERT INTO address (address, district, city_id, postal_code, phone)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING address_id
        "#,
    )
    .bind(&customer.address)
    .bind(&customer.district)
    .bind(city_id)
    .bind(customer.postal_code.as_deref())
    .bind(customer.phone.as_deref().unwrap_or_default())
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| RentalError::Internal(format!("Failed to create address: {e}")))
}

/// Builds the single-column update for a whitelisted field. Table and column
/// names come from the [`CustomerField`] enum, never from request input; the
/// lookup-table variants route through the customer's address chain.
fn update_statement(field: CustomerField) -> String {
    let assignment = match field {
        // city_id arrives as text in the request body but the column is an
        // integer reference.
        CustomerField::CityId => "city_id = $1::INT4".to_string(),
        _ => format!("{} = $1", field.column()),
    };

    let predicate = match field.table() {
        "address" => "address_id = (SELECT address_id FROM customer WHERE customer_id = $2)",
        "city" => {
            "city_id = (SELECT a.city_id FROM address a \
             JOIN customer c ON c.address_id = a.address_id \
             WHERE c.customer_id = $2)"
        }
        "country" => {
            "country_id = (SELECT ci.country_id FROM city ci \
             JOIN address a ON a.city_id = ci.city_id \
             JOIN customer c ON c.address_id = a.address_id \
             WHERE c.customer_id = $2)"
        }
        _ => "customer_id = $2",
    };

    format!("UPDATE {} SET {} WHERE {}", field.table(), assignment, predicate)
}
