use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
pub struct RouteCreateRequest {
    /// Id of the source airport.
    pub source: i64,
    /// Id of the destination airport.
    pub destination: i64,
    /// Distance in kilometers.
    #[validate(range(min = 1))]
    pub distance: i64,
}

/// List representation with airport names instead of ids.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, JsonSchema)]
pub struct RouteListItem {
    pub id: i64,
    pub source: String,
    pub destination: String,
    pub distance: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, JsonSchema)]
pub struct RouteAirport {
    pub name: String,
    pub closest_big_city: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct RouteDetail {
    pub id: i64,
    pub source: RouteAirport,
    pub destination: RouteAirport,
    pub distance: i64,
}
