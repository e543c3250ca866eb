use crate::models::airplane::{
    AirplaneCreateRequest, AirplaneDetail, AirplaneListItem, AirplaneType,
    AirplaneTypeCreateRequest,
};
use crate::services::airplane_service::AirplaneService;
use crate::utils::error::AppError;
use crate::utils::jwt::{AdminUser, AuthenticatedUser};
use rocket::serde::json::{json, Json, Value};
use rocket::State;
use rocket_okapi::openapi;

/// List airplane types
#[openapi(tag = "Airplane Types")]
#[get("/airplane_types")]
pub async fn list_airplane_types(
    _auth: AuthenticatedUser,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<Vec<AirplaneType>>, AppError> {
    let types = airplane_service.list_airplane_types().await?;
    Ok(Json(types))
}

/// Get one airplane type
#[openapi(tag = "Airplane Types")]
#[get("/airplane_types/<id>")]
pub async fn get_airplane_type(
    id: i64,
    _auth: AuthenticatedUser,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<AirplaneType>, AppError> {
    let airplane_type = airplane_service.get_airplane_type(id).await?;
    Ok(Json(airplane_type))
}

/// Create an airplane type (admin only)
#[openapi(tag = "Airplane Types")]
#[post("/airplane_types", format = "json", data = "<request>")]
pub async fn create_airplane_type(
    request: Json<AirplaneTypeCreateRequest>,
    _admin: AdminUser,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<AirplaneType>, AppError> {
    let airplane_type = airplane_service
        .create_airplane_type(request.into_inner())
        .await?;
    Ok(Json(airplane_type))
}

/// Update an airplane type (admin only)
#[openapi(tag = "Airplane Types")]
#[put("/airplane_types/<id>", format = "json", data = "<request>")]
pub async fn update_airplane_type(
    id: i64,
    request: Json<AirplaneTypeCreateRequest>,
    _admin: AdminUser,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<AirplaneType>, AppError> {
    let airplane_type = airplane_service
        .update_airplane_type(id, request.into_inner())
        .await?;
    Ok(Json(airplane_type))
}

/// Delete an airplane type (admin only)
#[openapi(tag = "Airplane Types")]
#[delete("/airplane_types/<id>")]
pub async fn delete_airplane_type(
    id: i64,
    _admin: AdminUser,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<Value>, AppError> {
    airplane_service.delete_airplane_type(id).await?;
    Ok(Json(json!({ "status": "success" })))
}

/// List airplanes with their capacities
#[openapi(tag = "Airplanes")]
#[get("/airplanes")]
pub async fn list_airplanes(
    _auth: AuthenticatedUser,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<Vec<AirplaneListItem>>, AppError> {
    let airplanes = airplane_service.list_airplanes().await?;
    Ok(Json(airplanes))
}

/// Get one airplane with its seat layout
#[openapi(tag = "Airplanes")]
#[get("/airplanes/<id>")]
pub async fn get_airplane(
    id: i64,
    _auth: AuthenticatedUser,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<AirplaneDetail>, AppError> {
    let airplane = airplane_service.get_airplane(id).await?;
    Ok(Json(airplane))
}

/// Create an airplane (admin only)
#[openapi(tag = "Airplanes")]
#[post("/airplanes", format = "json", data = "<request>")]
pub async fn create_airplane(
    request: Json<AirplaneCreateRequest>,
    _admin: AdminUser,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<AirplaneDetail>, AppError> {
    let airplane = airplane_service
        .create_airplane(request.into_inner())
        .await?;
    Ok(Json(airplane))
}

/// Update an airplane (admin only)
#[openapi(tag = "Airplanes")]
#[put("/airplanes/<id>", format = "json", data = "<request>")]
pub async fn update_airplane(
    id: i64,
    request: Json<AirplaneCreateRequest>,
    _admin: AdminUser,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<AirplaneDetail>, AppError> {
    let airplane = airplane_service
        .update_airplane(id, request.into_inner())
        .await?;
    Ok(Json(airplane))
}

/// Delete an airplane (admin only)
#[openapi(tag = "Airplanes")]
#[delete("/airplanes/<id>")]
pub async fn delete_airplane(
    id: i64,
    _admin: AdminUser,
    airplane_service: &State<AirplaneService>,
) -> Result<Json<Value>, AppError> {
    airplane_service.delete_airplane(id).await?;
    Ok(Json(json!({ "status": "success" })))
}
