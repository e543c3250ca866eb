use crate::models::airport::{Airport, AirportCreateRequest, AirportFilter};
use crate::services::airport_service::AirportService;
use crate::utils::error::AppError;
use crate::utils::jwt::{AdminUser, AuthenticatedUser};
use rocket::serde::json::{json, Json, Value};
use rocket::State;
use rocket_okapi::openapi;

/// List airports, optionally filtered by name or city substring
#[openapi(tag = "Airports")]
#[get("/airports?<name>&<closest_big_city>")]
pub async fn list_airports(
    name: Option<String>,
    closest_big_city: Option<String>,
    _auth: AuthenticatedUser,
    airport_service: &State<AirportService>,
) -> Result<Json<Vec<Airport>>, AppError> {
    let filter = AirportFilter {
        name,
        closest_big_city,
    };
    let airports = airport_service.list_airports(filter).await?;
    Ok(Json(airports))
}

/// Get one airport
#[openapi(tag = "Airports")]
#[get("/airports/<id>")]
pub async fn get_airport(
    id: i64,
    _auth: AuthenticatedUser,
    airport_service: &State<AirportService>,
) -> Result<Json<Airport>, AppError> {
    let airport = airport_service.get_airport(id).await?;
    Ok(Json(airport))
}

/// Create an airport (admin only)
#[openapi(tag = "Airports")]
#[post("/airports", format = "json", data = "<request>")]
pub async fn create_airport(
    request: Json<AirportCreateRequest>,
    _admin: AdminUser,
    airport_service: &State<AirportService>,
) -> Result<Json<Airport>, AppError> {
    let airport = airport_service.create_airport(request.into_inner()).await?;
    Ok(Json(airport))
}

/// Update an airport (admin only)
#[openapi(tag = "Airports")]
#[put("/airports/<id>", format = "json", data = "<request>")]
pub async fn update_airport(
    id: i64,
    request: Json<AirportCreateRequest>,
    _admin: AdminUser,
    airport_service: &State<AirportService>,
) -> Result<Json<Airport>, AppError> {
    let airport = airport_service
        .update_airport(id, request.into_inner())
        .await?;
    Ok(Json(airport))
}

/// Delete an airport (admin only)
#[openapi(tag = "Airports")]
#[delete("/airports/<id>")]
pub async fn delete_airport(
    id: i64,
    _admin: AdminUser,
    airport_service: &State<AirportService>,
) -> Result<Json<Value>, AppError> {
    airport_service.delete_airport(id).await?;
    Ok(Json(json!({ "status": "success" })))
}
