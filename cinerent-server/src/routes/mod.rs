use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers::{catalog_handlers, customer_handlers, rental_handlers, report_handlers};
use crate::infra::app_state::AppState;

/// Builds the application router. Public so tests can drive the app
/// in-process without binding a port.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health-check", get(health_check))
        // Catalog
        .route("/top5Films", get(catalog_handlers::top_films_handler))
        .route("/top5Actors", get(catalog_handlers::top_actors_handler))
        .route(
            "/filmDetails/{film_id}",
            get(catalog_handlers::film_details_handler),
        )
        .route(
            "/actorInfo/{actor_id}",
            get(catalog_handlers::actor_info_handler),
        )
        .route("/searchMovies", get(catalog_handlers::search_movies_handler))
        .route("/getGenres", get(catalog_handlers::genres_handler))
        // Rental lifecycle
        .route("/rentFilm", post(rental_handlers::rent_film_handler))
        .route("/returnMovie", post(rental_handlers::return_movie_handler))
        // Customer directory
        .route(
            "/getCustomer",
            get(customer_handlers::search_customers_handler),
        )
        .route(
            "/getCustomerDetails",
            get(customer_handlers::get_customer_details_handler),
        )
        .route("/addCustomer", post(customer_handlers::add_customer_handler))
        .route(
            "/updateCustomerDetails",
            post(customer_handlers::update_customer_handler),
        )
        .route(
            "/deleteCustomer",
            post(customer_handlers::delete_customer_handler),
        )
        .route(
            "/customerDetails/{customer_id}",
            get(customer_handlers::customer_details_handler),
        )
        // Reporting
        .route(
            "/generateCustomerReport",
            get(report_handlers::customer_report_handler),
        )
        .with_state(state)
}

async fn health_check() -> &'static str {
    "Hello World"
}
