use crate::models::user::{
    Role, User, UserLoginRequest, UserLoginResponse, UserRegistrationRequest, UserResponse,
};
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt;
use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        UserService { pool }
    }

    // Register a new user
    pub async fn register_user(&self, request: UserRegistrationRequest) -> AppResult<i64> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        // Check if username already exists
        let existing_user: Option<i64> = sqlx::query_scalar("SELECT id FROM user WHERE username = ?")
            .bind(&request.username)
            .fetch_optional(&self.pool)
            .await?;

        if existing_user.is_some() {
            return Err(AppError::Conflict("Username already exists".into()));
        }

        // Hash password
        let hashed_password = hash(request.password.as_bytes(), DEFAULT_COST)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        // Insert user
        let result = sqlx::query("INSERT INTO user (username, password, role) VALUES (?, ?, 'USER')")
            .bind(&request.username)
            .bind(&hashed_password)
            .execute(&self.pool)
            .await?;

        let user_id = result.last_insert_rowid();
        info!(user_id, username = %request.username, "registered new user");
        Ok(user_id)
    }

    // Login user
    pub async fn login_user(&self, request: UserLoginRequest) -> AppResult<UserLoginResponse> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, role FROM user WHERE username = ?",
        )
        .bind(&request.username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::AuthError("Invalid credentials".into()))?;

        // Verify password
        let password_matches = verify(request.password.as_bytes(), &user.password)
            .map_err(|e| AppError::AuthError(e.to_string()))?;

        if !password_matches {
            return Err(AppError::AuthError("Invalid credentials".into()));
        }

        // Generate JWT token
        let token = jwt::generate_token(user.id, user.role)?;

        Ok(UserLoginResponse {
            token,
            user_id: user.id,
        })
    }

    pub async fn get_user(&self, user_id: i64) -> AppResult<UserResponse> {
        let user =
            sqlx::query_as::<_, User>("SELECT id, username, password, role FROM user WHERE id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        Ok(UserResponse {
            id: user.id,
            username: user.username,
            role: user.role,
        })
    }

    /// Creates the admin account on startup if it does not exist yet.
    pub async fn ensure_admin(&self, username: &str, password: &str) -> AppResult<i64> {
        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM user WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(id) = existing {
            return Ok(id);
        }

        let hashed_password = hash(password.as_bytes(), DEFAULT_COST)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let result = sqlx::query("INSERT INTO user (username, password, role) VALUES (?, ?, ?)")
            .bind(username)
            .bind(&hashed_password)
            .bind(Role::Admin)
            .execute(&self.pool)
            .await?;

        let user_id = result.last_insert_rowid();
        info!(user_id, username, "created admin user");
        Ok(user_id)
    }
}
