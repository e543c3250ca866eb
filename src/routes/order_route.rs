use crate::models::order::{OrderCreateRequest, OrderResponse};
use crate::services::order_service::OrderService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use chrono::{DateTime, Utc};
use rocket::serde::json::{json, Json, Value};
use rocket::State;
use rocket_okapi::openapi;

fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::BadRequest(format!("Invalid {} timestamp, expected RFC 3339", field)))
}

/// List the caller's orders, newest first
#[openapi(tag = "Orders")]
#[get("/orders?<created_after>")]
pub async fn list_orders(
    created_after: Option<String>,
    auth: AuthenticatedUser,
    order_service: &State<OrderService>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let created_after = match created_after {
        Some(value) => Some(parse_timestamp(&value, "created_after")?),
        None => None,
    };

    let orders = order_service.list_orders(auth.actor(), created_after).await?;
    Ok(Json(orders))
}

/// Get one order with its tickets
#[openapi(tag = "Orders")]
#[get("/orders/<id>")]
pub async fn get_order(
    id: i64,
    auth: AuthenticatedUser,
    order_service: &State<OrderService>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = order_service.get_order(auth.actor(), id).await?;
    Ok(Json(order))
}

/// Book seats: creates an order and all its tickets atomically
#[openapi(tag = "Orders")]
#[post("/orders", format = "json", data = "<request>")]
pub async fn create_order(
    request: Json<OrderCreateRequest>,
    auth: AuthenticatedUser,
    order_service: &State<OrderService>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = order_service
        .create_order(auth.actor(), request.into_inner())
        .await?;
    Ok(Json(order))
}

/// Add tickets to an existing order atomically
#[openapi(tag = "Orders")]
#[post("/orders/<id>/tickets", format = "json", data = "<request>")]
pub async fn add_tickets(
    id: i64,
    request: Json<OrderCreateRequest>,
    auth: AuthenticatedUser,
    order_service: &State<OrderService>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = order_service
        .add_tickets(auth.actor(), id, request.into_inner().tickets)
        .await?;
    Ok(Json(order))
}

/// Cancel an order and release its seats
#[openapi(tag = "Orders")]
#[delete("/orders/<id>")]
pub async fn delete_order(
    id: i64,
    auth: AuthenticatedUser,
    order_service: &State<OrderService>,
) -> Result<Json<Value>, AppError> {
    order_service.delete_order(auth.actor(), id).await?;
    Ok(Json(json!({ "status": "success" })))
}
