use crate::models::crew::{Crew, CrewCreateRequest};
use crate::services::crew_service::CrewService;
use crate::utils::error::AppError;
use crate::utils::jwt::{AdminUser, AuthenticatedUser};
use rocket::serde::json::{json, Json, Value};
use rocket::State;
use rocket_okapi::openapi;

/// List crew members
#[openapi(tag = "Crew")]
#[get("/crews")]
pub async fn list_crew(
    _auth: AuthenticatedUser,
    crew_service: &State<CrewService>,
) -> Result<Json<Vec<Crew>>, AppError> {
    let crew = crew_service.list_crew().await?;
    Ok(Json(crew))
}

/// Get one crew member
#[openapi(tag = "Crew")]
#[get("/crews/<id>")]
pub async fn get_crew(
    id: i64,
    _auth: AuthenticatedUser,
    crew_service: &State<CrewService>,
) -> Result<Json<Crew>, AppError> {
    let crew = crew_service.get_crew(id).await?;
    Ok(Json(crew))
}

/// Create a crew member (admin only)
#[openapi(tag = "Crew")]
#[post("/crews", format = "json", data = "<request>")]
pub async fn create_crew(
    request: Json<CrewCreateRequest>,
    _admin: AdminUser,
    crew_service: &State<CrewService>,
) -> Result<Json<Crew>, AppError> {
    let crew = crew_service.create_crew(request.into_inner()).await?;
    Ok(Json(crew))
}

/// Update a crew member (admin only)
#[openapi(tag = "Crew")]
#[put("/crews/<id>", format = "json", data = "<request>")]
pub async fn update_crew(
    id: i64,
    request: Json<CrewCreateRequest>,
    _admin: AdminUser,
    crew_service: &State<CrewService>,
) -> Result<Json<Crew>, AppError> {
    let crew = crew_service.update_crew(id, request.into_inner()).await?;
    Ok(Json(crew))
}

/// Delete a crew member (admin only)
#[openapi(tag = "Crew")]
#[delete("/crews/<id>")]
pub async fn delete_crew(
    id: i64,
    _admin: AdminUser,
    crew_service: &State<CrewService>,
) -> Result<Json<Value>, AppError> {
    crew_service.delete_crew(id).await?;
    Ok(Json(json!({ "status": "success" })))
}
