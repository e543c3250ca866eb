use rocket::http::ContentType;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::Request;
use rocket::Response;
use rocket_okapi::JsonSchema;
use serde::Serialize;
use serde_json::json;
use std::io::Cursor;
use thiserror::Error;

/// One bounds failure inside a ticket batch. `field` is `"row"` or `"seat"`;
/// `ticket_index` points back into the submitted ticket list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct RangeViolation {
    pub ticket_index: usize,
    pub field: String,
    pub min: i64,
    pub max: i64,
    pub got: i64,
}

#[derive(Error, Debug, Serialize, JsonSchema)]
pub enum AppError {
    #[error("Database error")]
    DatabaseError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Row and/or seat outside the airplane's grid. Carries every violation
    /// in the request so the caller can fix both fields at once.
    #[error("Seat assignment out of range")]
    OutOfRange(Vec<RangeViolation>),

    /// The exact (flight, row, seat) already has a ticket.
    #[error("Seat already taken: flight {flight_id}, row {row}, seat {seat}")]
    SeatTaken { flight_id: i64, row: i64, seat: i64 },
}

// Map storage-layer failures onto the error taxonomy. Unique-index and
// busy/snapshot failures both mean "somebody else got there first" and are
// surfaced as Conflict so a racing booking loses cleanly instead of 500ing.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db) => {
                if db.is_unique_violation() {
                    AppError::Conflict("Conflicting record already exists".into())
                } else if db.is_foreign_key_violation() {
                    AppError::ValidationError("Referenced record does not exist".into())
                } else if db.is_check_violation() {
                    AppError::ValidationError("Record violates a schema constraint".into())
                } else if matches!(
                    db.code().as_deref(),
                    // SQLITE_BUSY / SQLITE_LOCKED families: a concurrent
                    // writer held the database past the busy timeout.
                    Some("5") | Some("261") | Some("517") | Some("6") | Some("262")
                ) {
                    AppError::Conflict("Concurrent update, please retry".into())
                } else {
                    AppError::DatabaseError(db.to_string())
                }
            }
            _ => AppError::DatabaseError(err.to_string()),
        }
    }
}

// Define a type alias for the result type
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    fn status(&self) -> Status {
        match self {
            AppError::ValidationError(_) => Status::BadRequest,
            AppError::BadRequest(_) => Status::BadRequest,
            AppError::OutOfRange(_) => Status::BadRequest,
            AppError::AuthError(_) => Status::Unauthorized,
            AppError::Forbidden(_) => Status::Forbidden,
            AppError::NotFound(_) => Status::NotFound,
            AppError::Conflict(_) => Status::Conflict,
            AppError::SeatTaken { .. } => Status::Conflict,
            AppError::DatabaseError(_) => Status::InternalServerError,
        }
    }
}

// Render every error as a JSON body at route level. Structured variants keep
// their fields so clients can produce field-level messages.
#[rocket::async_trait]
impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, _: &'r Request<'_>) -> rocket::response::Result<'static> {
        let status = self.status();

        let body = match &self {
            AppError::OutOfRange(violations) => json!({
                "error": self.to_string(),
                "violations": violations,
            }),
            AppError::SeatTaken { flight_id, row, seat } => json!({
                "error": self.to_string(),
                "flight_id": flight_id,
                "row": row,
                "seat": seat,
            }),
            _ => json!({
                "error": self.to_string(),
            }),
        };

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(None, Cursor::new(body.to_string()))
            .ok()
    }
}
