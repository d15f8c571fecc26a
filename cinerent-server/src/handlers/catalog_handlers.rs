use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use cinerent_core::types::{FilmAvailability, SearchFilters};

use crate::errors::{AppError, AppResult};
use crate::infra::app_state::AppState;

pub async fn top_films_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let films = state.catalog.top_films(5).await?;
    Ok(Json(json!(films)))
}

pub async fn top_actors_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let actors = state.catalog.top_actors(5).await?;
    Ok(Json(json!(actors)))
}

pub async fn film_details_handler(
    State(state): State<AppState>,
    Path(film_id): Path<i32>,
) -> AppResult<Json<Value>> {
    let film = state
        .catalog
        .film_details(film_id)
        .await?
        .ok_or_else(|| AppError::not_found("Film not found"))?;

    Ok(Json(json!(film)))
}

pub async fn actor_info_handler(
    State(state): State<AppState>,
    Path(actor_id): Path<i32>,
) -> AppResult<Json<Value>> {
    let details = state
        .catalog
        .actor_details(actor_id)
        .await?
        .ok_or_else(|| AppError::not_found("Actor not found"))?;

    let movies = state.catalog.top_films_for_actor(actor_id, 5).await?;

    Ok(Json(json!({
        "actorDetails": details,
        "actorMovies": movies,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    film_name: Option<String>,
    actor_name: Option<String>,
    genre: Option<String>,
}

pub async fn search_movies_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Value>> {
    let filters = SearchFilters {
        film_name: params.film_name,
        actor_name: params.actor_name,
        genre: params.genre,
    };

    let matches = state.catalog.search_films(&filters).await?;
    info!(hits = matches.len(), "catalog search");

    // One follow-up count per matched film: availability is always derived
    // live from the rental table, never cached on inventory.
    let mut results = Vec::with_capacity(matches.len());
    for film in matches {
        let available_copies = state.catalog.available_copies(film.film_id).await?;
        results.push(FilmAvailability {
            film_id: film.film_id,
            title: film.title,
            available_copies,
        });
    }

    Ok(Json(json!(results)))
}

pub async fn genres_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let genres = state.catalog.genres().await?;
    Ok(Json(json!(genres)))
}
