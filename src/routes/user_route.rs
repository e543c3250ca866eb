use crate::models::user::{
    RegisterResponse, UserLoginRequest, UserLoginResponse, UserRegistrationRequest, UserResponse,
};
use crate::services::user_service::UserService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Register a new user
#[openapi(tag = "Users")]
#[post("/register", format = "json", data = "<request>")]
pub async fn register(
    request: Json<UserRegistrationRequest>,
    user_service: &State<UserService>,
) -> Result<Json<RegisterResponse>, AppError> {
    let user_id = user_service.register_user(request.into_inner()).await?;
    Ok(Json(RegisterResponse {
        user_id,
        status: "success".to_string(),
    }))
}

/// Login a user
#[openapi(tag = "Users")]
#[post("/login", format = "json", data = "<request>")]
pub async fn login(
    request: Json<UserLoginRequest>,
    user_service: &State<UserService>,
) -> Result<Json<UserLoginResponse>, AppError> {
    let response = user_service.login_user(request.into_inner()).await?;
    Ok(Json(response))
}

/// The currently authenticated user
#[openapi(tag = "Users")]
#[get("/me")]
pub async fn me(
    auth: AuthenticatedUser,
    user_service: &State<UserService>,
) -> Result<Json<UserResponse>, AppError> {
    let response = user_service.get_user(auth.user_id).await?;
    Ok(Json(response))
}
