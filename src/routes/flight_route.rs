use crate::models::flight::{
    AvailabilityResponse, FlightCreateRequest, FlightDetail, FlightFilter, FlightListItem,
};
use crate::services::flight_service::FlightService;
use crate::utils::error::AppError;
use crate::utils::jwt::{AdminUser, AuthenticatedUser};
use chrono::{DateTime, Utc};
use rocket::serde::json::{json, Json, Value};
use rocket::State;
use rocket_okapi::openapi;

fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::BadRequest(format!("Invalid {} timestamp, expected RFC 3339", field)))
}

/// List flights with remaining seat counts
#[openapi(tag = "Flights")]
#[get("/flights?<source>&<destination>&<departure_after>&<arrival_before>&<min_available>")]
pub async fn list_flights(
    source: Option<String>,
    destination: Option<String>,
    departure_after: Option<String>,
    arrival_before: Option<String>,
    min_available: Option<i64>,
    _auth: AuthenticatedUser,
    flight_service: &State<FlightService>,
) -> Result<Json<Vec<FlightListItem>>, AppError> {
    let departure_after = match departure_after {
        Some(value) => Some(parse_timestamp(&value, "departure_after")?),
        None => None,
    };
    let arrival_before = match arrival_before {
        Some(value) => Some(parse_timestamp(&value, "arrival_before")?),
        None => None,
    };

    let filter = FlightFilter {
        source,
        destination,
        departure_after,
        arrival_before,
        min_available,
    };
    let flights = flight_service.list_flights(filter).await?;
    Ok(Json(flights))
}

/// Get one flight with its crew and taken seats
#[openapi(tag = "Flights")]
#[get("/flights/<id>")]
pub async fn get_flight(
    id: i64,
    _auth: AuthenticatedUser,
    flight_service: &State<FlightService>,
) -> Result<Json<FlightDetail>, AppError> {
    let flight = flight_service.get_flight(id).await?;
    Ok(Json(flight))
}

/// Remaining seats on a flight
#[openapi(tag = "Flights")]
#[get("/flights/<id>/availability")]
pub async fn get_availability(
    id: i64,
    _auth: AuthenticatedUser,
    flight_service: &State<FlightService>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let availability = flight_service.availability(id).await?;
    Ok(Json(availability))
}

/// Create a flight (admin only)
#[openapi(tag = "Flights")]
#[post("/flights", format = "json", data = "<request>")]
pub async fn create_flight(
    request: Json<FlightCreateRequest>,
    _admin: AdminUser,
    flight_service: &State<FlightService>,
) -> Result<Json<FlightDetail>, AppError> {
    let flight = flight_service.create_flight(request.into_inner()).await?;
    Ok(Json(flight))
}

/// Update a flight (admin only)
#[openapi(tag = "Flights")]
#[put("/flights/<id>", format = "json", data = "<request>")]
pub async fn update_flight(
    id: i64,
    request: Json<FlightCreateRequest>,
    _admin: AdminUser,
    flight_service: &State<FlightService>,
) -> Result<Json<FlightDetail>, AppError> {
    let flight = flight_service
        .update_flight(id, request.into_inner())
        .await?;
    Ok(Json(flight))
}

/// Delete a flight (admin only)
#[openapi(tag = "Flights")]
#[delete("/flights/<id>")]
pub async fn delete_flight(
    id: i64,
    _admin: AdminUser,
    flight_service: &State<FlightService>,
) -> Result<Json<Value>, AppError> {
    flight_service.delete_flight(id).await?;
    Ok(Json(json!({ "status": "success" })))
}
