//! Row structs and request/response types shared between the repositories
//! and the HTTP layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A film ranked by how often it has been rented.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TopFilm {
    pub film_id: i32,
    pub title: String,
    pub rental_count: i64,
}

/// An actor ranked by the number of distinct films they appear in.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TopActor {
    pub actor_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub film_count: i64,
}

/// A film with its language name resolved.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FilmDetails {
    pub film_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub release_year: Option<i32>,
    pub rating: Option<String>,
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActorDetails {
    pub actor_id: i32,
    pub first_name: String,
    pub last_name: String,
}

/// One of an actor's films, ranked by rental count.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActorFilm {
    pub film_id: i32,
    pub title: String,
    pub rental_count: i64,
}

/// A film matched by the catalog search, before availability enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FilmMatch {
    pub film_id: i32,
    pub title: String,
}

/// A search result annotated with its live availability count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmAvailability {
    pub film_id: i32,
    pub title: String,
    pub available_copies: i64,
}

/// Optional catalog search criteria. All absent means "every film".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilters {
    pub film_name: Option<String>,
    pub actor_name: Option<String>,
    pub genre: Option<String>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.film_name.is_none() && self.actor_name.is_none() && self.genre.is_none()
    }
}

/// A customer matched by the directory substring search.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CustomerMatch {
    pub customer_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

/// Full customer profile with the address -> city -> country chain resolved.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CustomerProfile {
    pub customer_id: i32,
    pub store_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub active: bool,
    pub create_date: NaiveDate,
    pub address: String,
    pub district: String,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub city: String,
    pub country: String,
}

/// A rental with no return date yet, as shown on a customer profile.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OpenRental {
    pub rental_id: i32,
    pub film_title: String,
    pub rental_date: DateTime<Utc>,
}

/// Payload for customer onboarding. The address, city, and country rows are
/// created on demand if they do not already exist.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub district: String,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub city: String,
    pub country: String,
}

/// A customer with at least one open rental, for the report endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DelinquentCustomer {
    pub customer_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub open_rentals: i64,
}

/// Whitelisted targets for single-field customer updates.
///
/// Each variant carries a fixed `(table, column)` pair so the update statement
/// never interpolates caller-supplied identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    Address,
    Phone,
    District,
    CityId,
    City,
    Country,
    FirstName,
    LastName,
    Email,
}

impl CustomerField {
    /// Parses a request-supplied field name. Unknown names are rejected
    /// rather than forwarded to the database.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "address" => Some(Self::Address),
            "phone" => Some(Self::Phone),
            "district" => Some(Self::District),
            "city_id" => Some(Self::CityId),
            "city" => Some(Self::City),
            "country" => Some(Self::Country),
            "first_name" => Some(Self::FirstName),
            "last_name" => Some(Self::LastName),
            "email" => Some(Self::Email),
            _ => None,
        }
    }

    /// The table the update is routed to.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Address | Self::Phone | Self::District | Self::CityId => "address",
            Self::City => "city",
            Self::Country => "country",
            Self::FirstName | Self::LastName | Self::Email => "customer",
        }
    }

    /// The column written within [`Self::table`].
    pub fn column(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Phone => "phone",
            Self::District => "district",
            Self::CityId => "city_id",
            Self::City => "city",
            Self::Country => "country",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
        }
    }
}
