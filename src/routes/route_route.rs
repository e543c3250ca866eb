use crate::models::route::{RouteCreateRequest, RouteDetail, RouteListItem};
use crate::services::route_service::RouteService;
use crate::utils::error::AppError;
use crate::utils::jwt::{AdminUser, AuthenticatedUser};
use rocket::serde::json::{json, Json, Value};
use rocket::State;
use rocket_okapi::openapi;

/// List routes with airport names
#[openapi(tag = "Routes")]
#[get("/routes")]
pub async fn list_routes(
    _auth: AuthenticatedUser,
    route_service: &State<RouteService>,
) -> Result<Json<Vec<RouteListItem>>, AppError> {
    let routes = route_service.list_routes().await?;
    Ok(Json(routes))
}

/// Get one route with nested airports
#[openapi(tag = "Routes")]
#[get("/routes/<id>")]
pub async fn get_route(
    id: i64,
    _auth: AuthenticatedUser,
    route_service: &State<RouteService>,
) -> Result<Json<RouteDetail>, AppError> {
    let route = route_service.get_route(id).await?;
    Ok(Json(route))
}

/// Create a route between two airports (admin only)
#[openapi(tag = "Routes")]
#[post("/routes", format = "json", data = "<request>")]
pub async fn create_route(
    request: Json<RouteCreateRequest>,
    _admin: AdminUser,
    route_service: &State<RouteService>,
) -> Result<Json<RouteDetail>, AppError> {
    let route = route_service.create_route(request.into_inner()).await?;
    Ok(Json(route))
}

/// Update a route (admin only)
#[openapi(tag = "Routes")]
#[put("/routes/<id>", format = "json", data = "<request>")]
pub async fn update_route(
    id: i64,
    request: Json<RouteCreateRequest>,
    _admin: AdminUser,
    route_service: &State<RouteService>,
) -> Result<Json<RouteDetail>, AppError> {
    let route = route_service.update_route(id, request.into_inner()).await?;
    Ok(Json(route))
}

/// Delete a route (admin only)
#[openapi(tag = "Routes")]
#[delete("/routes/<id>")]
pub async fn delete_route(
    id: i64,
    _admin: AdminUser,
    route_service: &State<RouteService>,
) -> Result<Json<Value>, AppError> {
    route_service.delete_route(id).await?;
    Ok(Json(json!({ "status": "success" })))
}
