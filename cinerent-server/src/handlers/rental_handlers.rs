use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::infra::app_state::AppState;

// Fields are optional at the serde level so missing ones map to a 400 with
// a readable message instead of a body-rejection error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentFilmRequest {
    film_id: Option<i32>,
    first_name: Option<String>,
    last_name: Option<String>,
}

pub async fn rent_film_handler(
    State(state): State<AppState>,
    Json(body): Json<RentFilmRequest>,
) -> AppResult<Json<Value>> {
    let film_id = body
        .film_id
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::bad_request("filmId is required"))?;
    let first_name = body
        .first_name
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::bad_request("firstName is required"))?;
    let last_name = body
        .last_name
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::bad_request("lastName is required"))?;

    let rental_id = state
        .rentals
        .rent_film(film_id, &first_name, &last_name)
        .await?;
    info!(film_id, rental_id, "film rented");

    Ok(Json(json!({
        "success": true,
        "message": "Film rented successfully!",
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnMovieRequest {
    rental_id: Option<i32>,
}

pub async fn return_movie_handler(
    State(state): State<AppState>,
    Json(body): Json<ReturnMovieRequest>,
) -> AppResult<Json<Value>> {
    let rental_id = body
        .rental_id
        .ok_or_else(|| AppError::bad_request("rentalId is required"))?;

    state.rentals.return_film(rental_id).await?;
    info!(rental_id, "film returned");

    Ok(Json(json!({
        "success": true,
        "message": "Film returned successfully!",
    })))
}
