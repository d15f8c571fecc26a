use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::database::ports::RentalRepository;
use crate::error::{RentalError, Result};

/// Staff member recorded on rentals created through the API. The workflow
/// takes no staff parameter, so checkouts are booked against this account.
const DEFAULT_STAFF_ID: i32 = 1;

/// PostgreSQL-backed implementation of the `RentalRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresRentalRepository {
    pool: PgPool,
}

impl PostgresRentalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RentalRepository for PostgresRentalRepository {
    async fn rent_film(&self, film_id: i32, first_name: &str, last_name: &str) -> Result<i32> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| RentalError::Internal(format!("Failed to start transaction: {e}")))?;

        // Exact-match name lookup. When two customers share a full name this
        // picks an arbitrary one; the workflow has no customer id parameter.
        let customer_id: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT customer_id FROM customer
            WHERE first_name = $1 AND last_name = $2
            LIMIT 1
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| RentalError::Internal(format!("Failed to resolve customer: {e}")))?;

        let Some(customer_id) = customer_id else {
            return Err(RentalError::NotFound("Customer".to_string()));
        };

        // SKIP LOCKED keeps two concurrent checkouts off the same copy: a row
        // locked by an in-flight rental is invisible here, so with one copy
        // left exactly one transaction wins and the other sees no row.
        let inventory_id: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT i.inventory_id
            FROM inventory i
            WHERE i.film_id = $1
              AND NOT EXISTS (
                SELECT 1 FROM rental r
                WHERE r.inventory_id = i.inventory_id
                  AND r.return_date IS NULL
              )
            LIMIT 1
            FOR UPDATE SKIP LOCKED
            "#,
        )
        .bind(film_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| RentalError::Internal(format!("Failed to find an available copy: {e}")))?;

        let Some(inventory_id) = inventory_id else {
            return Err(RentalError::Unavailable(
                "Film is not available for rental".to_string(),
            ));
        };

        let rental_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO rental (rental_date, inventory_id, customer_id, return_date, staff_id)
            VALUES (now(), $1, $2, NULL, $3)
            RETURNING rental_id
            "#,
        )
        .bind(inventory_id)
        .bind(customer_id)
        .bind(DEFAULT_STAFF_ID)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RentalError::Internal(format!("Failed to create rental: {e}")))?;

        sqlx::query("UPDATE inventory SET last_update = now() WHERE inventory_id = $1")
            .bind(inventory_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RentalError::Internal(format!("Failed to touch inventory: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| RentalError::Internal(format!("Failed to commit rental: {e}")))?;

        info!(
            rental_id,
            film_id, customer_id, inventory_id, "rented film copy"
        );
        Ok(rental_id)
    }

    async fn return_film(&self, rental_id: i32) -> Result<()> {
        // Idempotent: stamping an already-returned rental refreshes the date.
        let result = sqlx::query("UPDATE rental SET return_date = now() WHERE rental_id = $1")
            .bind(rental_id)
            .execute(self.pool())
            .await
            .map_err(|e| RentalError::Internal(format!("Failed to return rental: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(RentalError::NotFound("Rental".to_string()));
        }

        info!(rental_id, "returned rental");
        Ok(())
    }
}
