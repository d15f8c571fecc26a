#![allow(dead_code)]

//! In-memory store backing the repository ports, so the full router can be
//! exercised without PostgreSQL. The tables mirror the rental schema closely
//! enough to honor the availability rule and the address lookup chain.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use tower::ServiceExt;

use cinerent_core::database::ports::{CatalogRepository, CustomerRepository, RentalRepository};
use cinerent_core::error::{RentalError, Result};
use cinerent_core::types::{
    ActorDetails, ActorFilm, CustomerField, CustomerMatch, CustomerProfile, DelinquentCustomer,
    FilmDetails, FilmMatch, NewCustomer, OpenRental, SearchFilters, TopActor, TopFilm,
};
use cinerent_server::{create_app, infra::app_state::AppState};

#[derive(Debug, Clone)]
pub struct FilmRecord {
    pub film_id: i32,
    pub title: String,
    pub genre: String,
    pub actor_ids: Vec<i32>,
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct ActorRecord {
    pub actor_id: i32,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone)]
pub struct CountryRecord {
    pub country_id: i32,
    pub country: String,
}

#[derive(Debug, Clone)]
pub struct CityRecord {
    pub city_id: i32,
    pub city: String,
    pub country_id: i32,
}

#[derive(Debug, Clone)]
pub struct AddressRecord {
    pub address_id: i32,
    pub address: String,
    pub district: String,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub city_id: i32,
}

#[derive(Debug, Clone)]
pub struct CustomerRecord {
    pub customer_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub address_id: i32,
}

#[derive(Debug, Clone)]
pub struct InventoryRecord {
    pub inventory_id: i32,
    pub film_id: i32,
}

#[derive(Debug, Clone)]
pub struct RentalRecord {
    pub rental_id: i32,
    pub inventory_id: i32,
    pub customer_id: i32,
    pub rental_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct StoreData {
    pub films: Vec<FilmRecord>,
    pub actors: Vec<ActorRecord>,
    pub countries: Vec<CountryRecord>,
    pub cities: Vec<CityRecord>,
    pub addresses: Vec<AddressRecord>,
    pub customers: Vec<CustomerRecord>,
    pub inventory: Vec<InventoryRecord>,
    pub rentals: Vec<RentalRecord>,
    pub next_id: i32,
}

impl StoreData {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn copy_is_out(&self, inventory_id: i32) -> bool {
        self.rentals
            .iter()
            .any(|r| r.inventory_id == inventory_id && r.return_date.is_none())
    }

    fn available_copies(&self, film_id: i32) -> i64 {
        self.inventory
            .iter()
            .filter(|i| i.film_id == film_id && !self.copy_is_out(i.inventory_id))
            .count() as i64
    }

    fn rental_count(&self, film_id: i32) -> i64 {
        self.rentals
            .iter()
            .filter(|r| {
                self.inventory
                    .iter()
                    .any(|i| i.inventory_id == r.inventory_id && i.film_id == film_id)
            })
            .count() as i64
    }
}

#[derive(Debug, Default)]
pub struct MockStore {
    pub data: Mutex<StoreData>,
}

#[async_trait]
impl CatalogRepository for MockStore {
    async fn top_films(&self, limit: i64) -> Result<Vec<TopFilm>> {
        let data = self.data.lock().unwrap();
        let mut films: Vec<TopFilm> = data
            .films
            .iter()
            .map(|f| TopFilm {
                film_id: f.film_id,
                title: f.title.clone(),
                rental_count: data.rental_count(f.film_id),
            })
            .filter(|f| f.rental_count > 0)
            .collect();
        films.sort_by(|a, b| b.rental_count.cmp(&a.rental_count).then(a.film_id.cmp(&b.film_id)));
        films.truncate(limit as usize);
        Ok(films)
    }

    async fn top_actors(&self, limit: i64) -> Result<Vec<TopActor>> {
        let data = self.data.lock().unwrap();
        let mut actors: Vec<TopActor> = data
            .actors
            .iter()
            .map(|a| TopActor {
                actor_id: a.actor_id,
                first_name: a.first_name.clone(),
                last_name: a.last_name.clone(),
                film_count: data
                    .films
                    .iter()
                    .filter(|f| f.actor_ids.contains(&a.actor_id))
                    .count() as i64,
            })
            .collect();
        actors.sort_by(|a, b| b.film_count.cmp(&a.film_count).then(a.actor_id.cmp(&b.actor_id)));
        actors.truncate(limit as usize);
        Ok(actors)
    }

    async fn film_details(&self, film_id: i32) -> Result<Option<FilmDetails>> {
        let data = self.data.lock().unwrap();
        Ok(data.films.iter().find(|f| f.film_id == film_id).map(|f| FilmDetails {
            film_id: f.film_id,
            title: f.title.clone(),
            description: None,
            release_year: None,
            rating: None,
            language: f.language.clone(),
        }))
    }

    async fn actor_details(&self, actor_id: i32) -> Result<Option<ActorDetails>> {
        let data = self.data.lock().unwrap();
        Ok(data
            .actors
            .iter()
            .find(|a| a.actor_id == actor_id)
            .map(|a| ActorDetails {
                actor_id: a.actor_id,
                first_name: a.first_name.clone(),
                last_name: a.last_name.clone(),
            }))
    }

    async fn top_films_for_actor(&self, actor_id: i32, limit: i64) -> Result<Vec<ActorFilm>> {
        let data = self.data.lock().unwrap();
        let mut films: Vec<ActorFilm> = data
            .films
            .iter()
            .filter(|f| f.actor_ids.contains(&actor_id))
            .map(|f| ActorFilm {
                film_id: f.film_id,
                title: f.title.clone(),
                rental_count: data.rental_count(f.film_id),
            })
            .collect();
        films.sort_by(|a, b| b.rental_count.cmp(&a.rental_count).then(a.film_id.cmp(&b.film_id)));
        films.truncate(limit as usize);
        Ok(films)
    }

    async fn genres(&self) -> Result<Vec<String>> {
        let data = self.data.lock().unwrap();
        let mut genres: Vec<String> = data.films.iter().map(|f| f.genre.clone()).collect();
        genres.sort();
        genres.dedup();
        Ok(genres)
    }

    async fn search_films(&self, filters: &SearchFilters) -> Result<Vec<FilmMatch>> {
        let data = self.data.lock().unwrap();
        let mut matches: Vec<FilmMatch> = data
            .films
            .iter()
            .filter(|f| {
                if let Some(title) = filters.film_name.as_ref() {
                    if !f.title.to_lowercase().contains(&title.to_lowercase()) {
                        return false;
                    }
                }
                if let Some(name) = filters.actor_name.as_ref() {
                    let needle = name.to_lowercase();
                    let hit = f.actor_ids.iter().any(|id| {
                        data.actors.iter().any(|a| {
                            a.actor_id == *id
                                && (a.first_name.to_lowercase().contains(&needle)
                                    || a.last_name.to_lowercase().contains(&needle))
                        })
                    });
                    if !hit {
                        return false;
                    }
                }
                if let Some(genre) = filters.genre.as_ref() {
                    if f.genre != *genre {
                        return false;
                    }
                }
                true
            })
            .map(|f| FilmMatch {
                film_id: f.film_id,
                title: f.title.clone(),
            })
            .collect();
        matches.sort_by(|a, b| a.title.cmp(&b.title).then(a.film_id.cmp(&b.film_id)));
        Ok(matches)
    }

    async fn available_copies(&self, film_id: i32) -> Result<i64> {
        let data = self.data.lock().unwrap();
        Ok(data.available_copies(film_id))
    }
}

#[async_trait]
impl RentalRepository for MockStore {
    async fn rent_film(&self, film_id: i32, first_name: &str, last_name: &str) -> Result<i32> {
        let mut data = self.data.lock().unwrap();

        let customer_id = data
            .customers
            .iter()
            .find(|c| c.first_name == first_name && c.last_name == last_name)
            .map(|c| c.customer_id)
            .ok_or_else(|| RentalError::NotFound("Customer".to_string()))?;

        let inventory_id = data
            .inventory
            .iter()
            .find(|i| i.film_id == film_id && !data.copy_is_out(i.inventory_id))
            .map(|i| i.inventory_id)
            .ok_or_else(|| {
                RentalError::Unavailable("Film is not available for rental".to_string())
            })?;

        let rental_id = data.next_id();
        data.rentals.push(RentalRecord {
            rental_id,
            inventory_id,
            customer_id,
            rental_date: Utc::now(),
            return_date: None,
        });
        Ok(rental_id)
    }

    async fn return_film(&self, rental_id: i32) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        let rental = data
            .rentals
            .iter_mut()
            .find(|r| r.rental_id == rental_id)
            .ok_or_else(|| RentalError::NotFound("Rental".to_string()))?;
        rental.return_date = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl CustomerRepository for MockStore {
    async fn search(&self, term: &str) -> Result<Vec<CustomerMatch>> {
        let data = self.data.lock().unwrap();
        let needle = term.to_lowercase();
        Ok(data
            .customers
            .iter()
            .filter(|c| {
                c.first_name.to_lowercase().contains(&needle)
                    || c.last_name.to_lowercase().contains(&needle)
                    || c.email
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&needle))
            })
            .map(|c| CustomerMatch {
                customer_id: c.customer_id,
                first_name: c.first_name.clone(),
                last_name: c.last_name.clone(),
                email: c.email.clone(),
            })
            .collect())
    }

    async fn profile(&self, customer_id: i32) -> Result<Option<CustomerProfile>> {
        let data = self.data.lock().unwrap();
        let Some(customer) = data.customers.iter().find(|c| c.customer_id == customer_id) else {
            return Ok(None);
        };
        let address = data
            .addresses
            .iter()
            .find(|a| a.address_id == customer.address_id)
            .ok_or_else(|| RentalError::Internal("dangling address reference".to_string()))?;
        let city = data
            .cities
            .iter()
            .find(|c| c.city_id == address.city_id)
            .ok_or_else(|| RentalError::Internal("dangling city reference".to_string()))?;
        let country = data
            .countries
            .iter()
            .find(|c| c.country_id == city.country_id)
            .ok_or_else(|| RentalError::Internal("dangling country reference".to_string()))?;

        Ok(Some(CustomerProfile {
            customer_id: customer.customer_id,
            store_id: 1,
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            email: customer.email.clone(),
            active: true,
            create_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            address: address.address.clone(),
            district: address.district.clone(),
            postal_code: address.postal_code.clone(),
            phone: address.phone.clone(),
            city: city.city.clone(),
            country: country.country.clone(),
        }))
    }

    async fn open_rentals(&self, customer_id: i32) -> Result<Vec<OpenRental>> {
        let data = self.data.lock().unwrap();
        Ok(data
            .rentals
            .iter()
            .filter(|r| r.customer_id == customer_id && r.return_date.is_none())
            .map(|r| {
                let film_title = data
                    .inventory
                    .iter()
                    .find(|i| i.inventory_id == r.inventory_id)
                    .and_then(|i| data.films.iter().find(|f| f.film_id == i.film_id))
                    .map(|f| f.title.clone())
                    .unwrap_or_default();
                OpenRental {
                    rental_id: r.rental_id,
                    film_title,
                    rental_date: r.rental_date,
                }
            })
            .collect())
    }

    async fn create(&self, customer: &NewCustomer) -> Result<i32> {
        let mut data = self.data.lock().unwrap();

        let country_id = match data.countries.iter().find(|c| c.country == customer.country) {
            Some(c) => c.country_id,
            None => {
                let country_id = data.next_id();
                let country = customer.country.clone();
                data.countries.push(CountryRecord {
                    country_id,
                    country,
                });
                country_id
            }
        };

        let city_id = match data
            .cities
            .iter()
            .find(|c| c.city == customer.city && c.country_id == country_id)
        {
            Some(c) => c.city_id,
            None => {
                let city_id = data.next_id();
                let city = customer.city.clone();
                data.cities.push(CityRecord {
                    city_id,
                    city,
                    country_id,
                });
                city_id
            }
        };

        let address_id = match data
            .addresses
            .iter()
            .find(|a| a.address == customer.address && a.city_id == city_id)
        {
            Some(a) => a.address_id,
            None => {
                let address_id = data.next_id();
                data.addresses.push(AddressRecord {
                    address_id,
                    address: customer.address.clone(),
                    district: customer.district.clone(),
                    postal_code: customer.postal_code.clone(),
                    phone: customer.phone.clone(),
                    city_id,
                });
                address_id
            }
        };

        let customer_id = data.next_id();
        data.customers.push(CustomerRecord {
            customer_id,
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            email: Some(customer.email.clone()),
            address_id,
        });
        Ok(customer_id)
    }

    async fn update_field(
        &self,
        customer_id: i32,
        field: CustomerField,
        value: &str,
    ) -> Result<()> {
        let mut data = self.data.lock().unwrap();

        let address_id = data
            .customers
            .iter()
            .find(|c| c.customer_id == customer_id)
            .map(|c| c.address_id)
            .ok_or_else(|| RentalError::NotFound("Customer".to_string()))?;

        match field.table() {
            "customer" => {
                let customer = data
                    .customers
                    .iter_mut()
                    .find(|c| c.customer_id == customer_id)
                    .unwrap();
                match field {
                    CustomerField::FirstName => customer.first_name = value.to_string(),
                    CustomerField::LastName => customer.last_name = value.to_string(),
                    CustomerField::Email => customer.email = Some(value.to_string()),
                    _ => unreachable!("non-customer field routed to customer table"),
                }
            }
            "address" => {
                let address = data
                    .addresses
                    .iter_mut()
                    .find(|a| a.address_id == address_id)
                    .unwrap();
                match field {
                    CustomerField::Address => address.address = value.to_string(),
                    CustomerField::Phone => address.phone = Some(value.to_string()),
                    CustomerField::District => address.district = value.to_string(),
                    CustomerField::CityId => {
                        address.city_id = value
                            .parse()
                            .map_err(|_| RentalError::Validation("city_id must be an integer".to_string()))?
                    }
                    _ => unreachable!("non-address field routed to address table"),
                }
            }
            "city" => {
                let city_id = data
                    .addresses
                    .iter()
                    .find(|a| a.address_id == address_id)
                    .map(|a| a.city_id)
                    .unwrap();
                let city = data.cities.iter_mut().find(|c| c.city_id == city_id).unwrap();
                city.city = value.to_string();
            }
            "country" => {
                let city_id = data
                    .addresses
                    .iter()
                    .find(|a| a.address_id == address_id)
                    .map(|a| a.city_id)
                    .unwrap();
                let country_id = data
                    .cities
                    .iter()
                    .find(|c| c.city_id == city_id)
                    .map(|c| c.country_id)
                    .unwrap();
                let country = data
                    .countries
                    .iter_mut()
                    .find(|c| c.country_id == country_id)
                    .unwrap();
                country.country = value.to_string();
            }
            table => unreachable!("unexpected target table {table}"),
        }
        Ok(())
    }

    async fn delete(&self, customer_id: i32) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        let before = data.customers.len();
        data.customers.retain(|c| c.customer_id != customer_id);
        if data.customers.len() == before {
            return Err(RentalError::NotFound("Customer".to_string()));
        }
        Ok(())
    }

    async fn delinquents(&self) -> Result<Vec<DelinquentCustomer>> {
        let data = self.data.lock().unwrap();
        let mut delinquents: Vec<DelinquentCustomer> = data
            .customers
            .iter()
            .map(|c| DelinquentCustomer {
                customer_id: c.customer_id,
                first_name: c.first_name.clone(),
                last_name: c.last_name.clone(),
                email: c.email.clone(),
                open_rentals: data
                    .rentals
                    .iter()
                    .filter(|r| r.customer_id == c.customer_id && r.return_date.is_none())
                    .count() as i64,
            })
            .filter(|c| c.open_rentals > 0)
            .collect();
        delinquents.sort_by(|a, b| a.last_name.cmp(&b.last_name));
        Ok(delinquents)
    }
}

/// Router plus a handle on the store so tests can assert row-level effects.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MockStore>,
}

/// Two films, two customers sharing a city, and one open rental:
/// "The Matrix" has two free copies, "Alien" has one copy already out
/// to Jane Smith.
pub fn seeded_app() -> TestApp {
    let store = Arc::new(MockStore::default());
    {
        let mut data = store.data.lock().unwrap();
        data.next_id = 1000;

        data.countries.push(CountryRecord {
            country_id: 1,
            country: "United Kingdom".to_string(),
        });
        data.cities.push(CityRecord {
            city_id: 1,
            city: "London".to_string(),
            country_id: 1,
        });
        data.addresses.push(AddressRecord {
            address_id: 1,
            address: "1 High Street".to_string(),
            district: "Westminster".to_string(),
            postal_code: Some("SW1A 1AA".to_string()),
            phone: Some("02079460000".to_string()),
            city_id: 1,
        });
        data.addresses.push(AddressRecord {
            address_id: 2,
            address: "2 Low Road".to_string(),
            district: "Camden".to_string(),
            postal_code: None,
            phone: None,
            city_id: 1,
        });
        data.customers.push(CustomerRecord {
            customer_id: 1,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: Some("john@example.com".to_string()),
            address_id: 1,
        });
        data.customers.push(CustomerRecord {
            customer_id: 2,
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            email: Some("jane@example.com".to_string()),
            address_id: 2,
        });

        data.actors.push(ActorRecord {
            actor_id: 1,
            first_name: "Keanu".to_string(),
            last_name: "Reeves".to_string(),
        });
        data.actors.push(ActorRecord {
            actor_id: 2,
            first_name: "Sigourney".to_string(),
            last_name: "Weaver".to_string(),
        });
        data.films.push(FilmRecord {
            film_id: 1,
            title: "The Matrix".to_string(),
            genre: "Action".to_string(),
            actor_ids: vec![1],
            language: "English".to_string(),
        });
        data.films.push(FilmRecord {
            film_id: 2,
            title: "Alien".to_string(),
            genre: "Horror".to_string(),
            actor_ids: vec![2],
            language: "English".to_string(),
        });

        data.inventory.push(InventoryRecord {
            inventory_id: 1,
            film_id: 1,
        });
        data.inventory.push(InventoryRecord {
            inventory_id: 2,
            film_id: 1,
        });
        data.inventory.push(InventoryRecord {
            inventory_id: 3,
            film_id: 2,
        });

        data.rentals.push(RentalRecord {
            rental_id: 1,
            inventory_id: 3,
            customer_id: 2,
            rental_date: Utc::now(),
            return_date: None,
        });
    }

    let state = AppState::new(store.clone(), store.clone(), store.clone());
    TestApp {
        router: create_app(state),
        store,
    }
}

pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get_raw(router: &Router, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, bytes.to_vec())
}
