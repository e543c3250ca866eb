use crate::models::flight::FlightSummary;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: i64,
    pub row: i64,
    pub seat: i64,
    pub flight_id: i64,
    pub order_id: i64,
}

// Hand-written because `derive(sqlx::FromRow)` generates a local binding
// named `row` that a field called `row` shadows, breaking compilation.
impl<'r, R: sqlx::Row> sqlx::FromRow<'r, R> for Ticket
where
    &'r str: sqlx::ColumnIndex<R>,
    i64: sqlx::decode::Decode<'r, R::Database> + sqlx::types::Type<R::Database>,
{
    fn from_row(row: &'r R) -> Result<Self, sqlx::Error> {
        Ok(Ticket {
            id: row.try_get("id")?,
            row: row.try_get("seat_row")?,
            seat: row.try_get("seat_number")?,
            flight_id: row.try_get("flight_id")?,
            order_id: row.try_get("order_id")?,
        })
    }
}

/// One requested seat inside an order.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct TicketRequest {
    /// Id of the flight to book.
    pub flight: i64,
    pub row: i64,
    pub seat: i64,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct TicketResponse {
    pub id: i64,
    pub row: i64,
    pub seat: i64,
    pub flight: FlightSummary,
}
