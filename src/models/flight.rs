use crate::models::crew::Crew;
use crate::models::route::RouteAirport;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
pub struct FlightCreateRequest {
    /// Id of the route to fly.
    pub route: i64,
    /// Id of the airplane assigned to the flight.
    pub airplane: i64,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    /// Ids of the crew members on board.
    #[serde(default)]
    pub crew: Vec<i64>,
}

/// Optional filters for the flight list. All of them compose with AND.
#[derive(Debug, Default, Clone)]
pub struct FlightFilter {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub departure_after: Option<DateTime<Utc>>,
    pub arrival_before: Option<DateTime<Utc>>,
    pub min_available: Option<i64>,
}

/// Raw list row straight from the aggregate query, before crew names
/// are attached.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FlightListRow {
    pub id: i64,
    pub source_name: String,
    pub destination_name: String,
    pub airplane_name: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub tickets_available: i64,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct FlightListItem {
    pub id: i64,
    /// "SOURCE - DESTINATION" airport names.
    pub route: String,
    pub airplane: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub crew: Vec<String>,
    pub tickets_available: i64,
}

/// A booked seat position on a flight.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SeatRef {
    pub row: i64,
    pub seat: i64,
}

// Hand-written because `derive(sqlx::FromRow)` generates a local binding
// named `row` that a field called `row` shadows, breaking compilation.
impl<'r, R: sqlx::Row> sqlx::FromRow<'r, R> for SeatRef
where
    &'r str: sqlx::ColumnIndex<R>,
    i64: sqlx::decode::Decode<'r, R::Database> + sqlx::types::Type<R::Database>,
{
    fn from_row(row: &'r R) -> Result<Self, sqlx::Error> {
        Ok(SeatRef {
            row: row.try_get("seat_row")?,
            seat: row.try_get("seat_number")?,
        })
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct FlightRouteInfo {
    pub source: RouteAirport,
    pub destination: RouteAirport,
    pub distance: i64,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct FlightAirplaneInfo {
    pub name: String,
    pub airplane_type: String,
    pub rows: i64,
    pub seats_in_row: i64,
    pub capacity: i64,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct FlightDetail {
    pub id: i64,
    pub route: FlightRouteInfo,
    pub airplane: FlightAirplaneInfo,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub crew: Vec<Crew>,
    /// Seats already sold, ordered by row then seat.
    pub taken_seats: Vec<SeatRef>,
}

/// Compact flight representation nested inside ticket responses.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct FlightSummary {
    pub route: String,
    pub airplane: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub crew: Vec<String>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct AvailabilityResponse {
    pub flight_id: i64,
    pub tickets_available: i64,
}
