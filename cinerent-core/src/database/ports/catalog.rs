use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    ActorDetails, ActorFilm, FilmDetails, FilmMatch, SearchFilters, TopActor, TopFilm,
};

// Read-only catalog queries: rankings, details, and the filtered search.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn top_films(&self, limit: i64) -> Result<Vec<TopFilm>>;
    async fn top_actors(&self, limit: i64) -> Result<Vec<TopActor>>;
    async fn film_details(&self, film_id: i32) -> Result<Option<FilmDetails>>;
    async fn actor_details(&self, actor_id: i32) -> Result<Option<ActorDetails>>;
    async fn top_films_for_actor(&self, actor_id: i32, limit: i64) -> Result<Vec<ActorFilm>>;
    async fn genres(&self) -> Result<Vec<String>>;

    /// Films matching all of the given optional criteria; every film when
    /// none are set.
    async fn search_films(&self, filters: &SearchFilters) -> Result<Vec<FilmMatch>>;

    /// Count of inventory copies of the film with no open rental.
    async fn available_copies(&self, film_id: i32) -> Result<i64>;
}
