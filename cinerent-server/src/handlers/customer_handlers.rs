use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use cinerent_core::types::{CustomerField, NewCustomer};

use crate::errors::{AppError, AppResult};
use crate::infra::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CustomerSearchParams {
    search: Option<String>,
}

pub async fn search_customers_handler(
    State(state): State<AppState>,
    Query(params): Query<CustomerSearchParams>,
) -> AppResult<Json<Value>> {
    let term = params.search.unwrap_or_default();
    let customers = state.customers.search(&term).await?;
    Ok(Json(json!(customers)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetailsParams {
    customer_id: Option<i32>,
}

pub async fn get_customer_details_handler(
    State(state): State<AppState>,
    Query(params): Query<CustomerDetailsParams>,
) -> AppResult<Json<Value>> {
    let customer_id = params
        .customer_id
        .ok_or_else(|| AppError::bad_request("customerId is required"))?;

    let profile = state
        .customers
        .profile(customer_id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;

    Ok(Json(json!({
        "success": true,
        "data": profile,
    })))
}

pub async fn customer_details_handler(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
) -> AppResult<Json<Value>> {
    let profile = state
        .customers
        .profile(customer_id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;

    let open_rentals = state.customers.open_rentals(customer_id).await?;

    Ok(Json(json!({
        "customer": profile,
        "openRentals": open_rentals,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCustomerRequest {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    address: Option<String>,
    district: Option<String>,
    postal_code: Option<String>,
    phone: Option<String>,
    city: Option<String>,
    country: Option<String>,
}

pub async fn add_customer_handler(
    State(state): State<AppState>,
    Json(body): Json<AddCustomerRequest>,
) -> AppResult<Json<Value>> {
    let required = |value: Option<String>, name: &str| {
        value
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::bad_request(format!("{name} is required")))
    };

    let customer = NewCustomer {
        first_name: required(body.first_name, "firstName")?,
        last_name: required(body.last_name, "lastName")?,
        email: required(body.email, "email")?,
        address: required(body.address, "address")?,
        district: required(body.district, "district")?,
        postal_code: body.postal_code,
        phone: body.phone,
        city: required(body.city, "city")?,
        country: required(body.country, "country")?,
    };

    let customer_id = state.customers.create(&customer).await?;
    info!(customer_id, "customer added");

    Ok(Json(json!({
        "success": true,
        "message": "Customer added successfully!",
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    customer_id: Option<i32>,
    field_name: Option<String>,
    new_value: Option<String>,
}

pub async fn update_customer_handler(
    State(state): State<AppState>,
    Json(body): Json<UpdateCustomerRequest>,
) -> AppResult<Json<Value>> {
    let customer_id = body
        .customer_id
        .ok_or_else(|| AppError::bad_request("customerId is required"))?;
    let field_name = body
        .field_name
        .ok_or_else(|| AppError::bad_request("fieldName is required"))?;
    let new_value = body
        .new_value
        .ok_or_else(|| AppError::bad_request("newValue is required"))?;

    // Only whitelisted fields are ever turned into SQL.
    let field = CustomerField::parse(&field_name)
        .ok_or_else(|| AppError::bad_request(format!("fieldName '{field_name}' is not updatable")))?;

    state
        .customers
        .update_field(customer_id, field, &new_value)
        .await?;
    info!(customer_id, field = field_name.as_str(), "customer updated");

    Ok(Json(json!({
        "success": true,
        "message": "Customer updated successfully!",
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCustomerRequest {
    customer_id: Option<i32>,
}

pub async fn delete_customer_handler(
    State(state): State<AppState>,
    Json(body): Json<DeleteCustomerRequest>,
) -> AppResult<Json<Value>> {
    let customer_id = body
        .customer_id
        .ok_or_else(|| AppError::bad_request("customerId is required"))?;

    state.customers.delete(customer_id).await?;
    info!(customer_id, "customer deleted");

    Ok(Json(json!({
        "success": true,
        "message": "Customer deleted successfully!",
    })))
}
