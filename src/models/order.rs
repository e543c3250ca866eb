use crate::models::ticket::{TicketRequest, TicketResponse};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
pub struct OrderCreateRequest {
    #[validate(length(min = 1, message = "An order must contain at least one ticket"))]
    pub tickets: Vec<TicketRequest>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub tickets: Vec<TicketResponse>,
}
