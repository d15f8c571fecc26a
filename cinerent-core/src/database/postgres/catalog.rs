use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::ports::CatalogRepository;
use crate::error::{RentalError, Result};
use crate::types::{
    ActorDetails, ActorFilm, FilmDetails, FilmMatch, SearchFilters, TopActor, TopFilm,
};

/// PostgreSQL-backed implementation of the `CatalogRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn top_films(&self, limit: i64) -> Result<Vec<TopFilm>> {
        sqlx::query_as::<_, TopFilm>(
            r#"
            SELECT f.film_id, f.title, COUNT(r.rental_id) AS rental_count
            FROM film f
            JOIN inventory i ON i.film_id = f.film_id
            JOIN rental r ON r.inventory_id = i.inventory_id
            GROUP BY f.film_id, f.title
            ORDER BY rental_count DESC, f.film_id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await
        .map_err(|e| RentalError::Internal(format!("Failed to rank films: {e}")))
    }

    async fn top_actors(&self, limit: i64) -> Result<Vec<TopActor>> {
        sqlx::query_as::<_, TopActor>(
            r#"
            SELECT a.actor_id, a.first_name, a.last_name,
                   COUNT(DISTINCT fa.film_id) AS film_count
            FROM actor a
            JOIN film_actor fa ON fa.actor_id = a.actor_id
            GROUP BY a.actor_id, a.first_name, a.last_name
            ORDER BY film_count DESC, a.actor_id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await
        .map_err(|e| RentalError::Internal(format!("Failed to rank actors: {e}")))
    }

    async fn film_details(&self, film_id: i32) -> Result<Option<FilmDetails>> {
        sqlx::query_as::<_, FilmDetails>(
            r#"
            SELECT f.film_id, f.title, f.description,
                   f.release_year::INT4 AS release_year,
                   f.rating::TEXT AS rating,
                   TRIM(l.name) AS language
            FROM film f
            JOIN language l ON l.language_id = f.language_id
            WHERE f.film_id = $1
            "#,
        )
        .bind(film_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| RentalError::Internal(format!("Failed to load film {film_id}: {e}")))
    }

    async fn actor_details(&self, actor_id: i32) -> Result<Option<ActorDetails>> {
        sqlx::query_as::<_, ActorDetails>(
            "SELECT actor_id, first_name, last_name FROM actor WHERE actor_id = $1",
        )
        .bind(actor_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| RentalError::Internal(format!("Failed to load actor {actor_id}: {e}")))
    }

    async fn top_films_for_actor(&self, actor_id: i32, limit: i64) -> Result<Vec<ActorFilm>> {
        sqlx::query_as::<_, ActorFilm>(
            r#"
            SELECT f.film_id, f.title, COUNT(r.rental_id) AS rental_count
            FROM film f
            JOIN film_actor fa ON fa.film_id = f.film_id
            LEFT JOIN inventory i ON i.film_id = f.film_id
            LEFT JOIN rental r ON r.inventory_id = i.inventory_id
            WHERE fa.actor_id = $1
            GROUP BY f.film_id, f.title
            ORDER BY rental_count DESC, f.film_id
            LIMIT $2
            "#,
        )
        .bind(actor_id)
        .bind(limit)
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            RentalError::Internal(format!("Failed to rank films for actor {actor_id}: {e}"))
        })
    }

    async fn genres(&self) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT name FROM category ORDER BY name")
            .fetch_all(self.pool())
            .await
            .map_err(|e| RentalError::Internal(format!("Failed to list genres: {e}")))
    }

    async fn search_films(&self, filters: &SearchFilters) -> Result<Vec<FilmMatch>> {
        let mut qb = build_search_query(filters);

        qb.build_query_as::<FilmMatch>()
            .fetch_all(self.pool())
            .await
            .map_err(|e| RentalError::Internal(format!("Failed to search films: {e}")))
    }

    async fn available_copies(&self, film_id: i32) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM inventory i
            WHERE i.film_id = $1
              AND NOT EXISTS (
                SELECT 1 FROM rental r
                WHERE r.inventory_id = i.inventory_id
                  AND r.return_date IS NULL
              )
            "#,
        )
        .bind(film_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            RentalError::Internal(format!("Failed to count copies of film {film_id}: {e}"))
        })
    }
}

/// Composes the catalog search statement. Predicates are appended in a fixed
/// order (title, then actor name twice, then genre) so parameters bind in the
/// same sequence regardless of which filters are present.
fn build_search_query(filters: &SearchFilters) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT DISTINCT f.film_id, f.title FROM film f");
    let mut joined = false;

    if let Some(title) = filters.film_name.as_ref() {
        qb.push(" WHERE f.title ILIKE ");
        qb.push_bind(format!("%{title}%"));
        joined = true;
    }

    if let Some(actor) = filters.actor_name.as_ref() {
        qb.push(if joined { " AND " } else { " WHERE " });
        qb.push(
            "EXISTS (SELECT 1 FROM film_actor fa \
             JOIN actor a ON a.actor_id = fa.actor_id \
             WHERE fa.film_id = f.film_id AND (a.first_name ILIKE ",
        );
        let like = format!("%{actor}%");
        qb.push_bind(like.clone());
        qb.push(" OR a.last_name ILIKE ");
        qb.push_bind(like);
        qb.push("))");
        joined = true;
    }

    if let Some(genre) = filters.genre.as_ref() {
        qb.push(if joined { " AND " } else { " WHERE " });
        qb.push(
            "EXISTS (SELECT 1 FROM film_category fc \
             JOIN category c ON c.category_id = fc.category_id \
             WHERE fc.film_id = f.film_id AND c.name = ",
        );
        qb.push_bind(genre.clone());
        qb.push(")");
    }

    qb.push(" ORDER BY f.title, f.film_id");
    qb
}
