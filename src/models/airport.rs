use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, JsonSchema)]
pub struct Airport {
    pub id: i64,
    pub name: String,
    pub closest_big_city: String,
}

#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
pub struct AirportCreateRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub closest_big_city: String,
}

/// Substring filters for the airport list, both optional.
#[derive(Debug, Default, Clone)]
pub struct AirportFilter {
    pub name: Option<String>,
    pub closest_big_city: Option<String>,
}
