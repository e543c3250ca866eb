use crate::models::user::{Actor, Role};
use crate::utils::error::{AppError, AppResult};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use rocket_okapi::request::OpenApiFromRequest;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// user_id
    pub sub: i64,
    pub role: String,
    pub exp: usize,
}

/// Any user with a valid bearer token.
#[derive(Debug, OpenApiFromRequest)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            role: self.role,
        }
    }
}

/// Same as [`AuthenticatedUser`] but only admits the ADMIN role.
#[derive(Debug, OpenApiFromRequest)]
pub struct AdminUser {
    pub user_id: i64,
}

impl AdminUser {
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            role: Role::Admin,
        }
    }
}

pub fn generate_token(user_id: i64, role: Role) -> AppResult<String> {
    let expiration = chrono::Utc::now()
        // Tokens are good for 24 hours
        .checked_add_signed(chrono::Duration::hours(24))
        .ok_or_else(|| AppError::AuthError("Invalid expiration timestamp".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: expiration,
    };

    let secret = env::var("JWT_SECRET")
        .map_err(|_| AppError::AuthError("JWT_SECRET must be set".to_string()))?;
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::AuthError(e.to_string()))
}

fn decode_bearer(request: &Request<'_>) -> Option<(i64, Role)> {
    let token = match request.headers().get_one("Authorization") {
        Some(token) if token.starts_with("Bearer ") => &token[7..],
        _ => return None,
    };

    let secret = env::var("JWT_SECRET").ok()?;
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;

    let role = Role::from_str(&token_data.claims.role).ok()?;
    Some((token_data.claims.sub, role))
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match decode_bearer(request) {
            Some((user_id, role)) => Outcome::Success(AuthenticatedUser { user_id, role }),
            None => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match decode_bearer(request) {
            Some((user_id, Role::Admin)) => Outcome::Success(AdminUser { user_id }),
            Some(_) => Outcome::Error((Status::Forbidden, ())),
            None => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}
