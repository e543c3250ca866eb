use crate::models::flight::FlightSummary;
use crate::models::ticket::{Ticket, TicketResponse};
use crate::models::user::Actor;
use crate::utils::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;

#[derive(sqlx::FromRow)]
struct FlightSummaryRow {
    id: i64,
    source_name: String,
    destination_name: String,
    airplane_name: String,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct TicketOwnerRow {
    id: i64,
    seat_row: i64,
    seat_number: i64,
    flight_id: i64,
    user_id: i64,
}

pub struct TicketService {
    pool: SqlitePool,
}

impl TicketService {
    pub fn new(pool: SqlitePool) -> Self {
        TicketService { pool }
    }

    /// All tickets belonging to the caller's orders, ordered by row
    /// then seat.
    pub async fn list_my_tickets(&self, actor: Actor) -> AppResult<Vec<TicketResponse>> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT t.id, t.seat_row, t.seat_number, t.flight_id, t.order_id
            FROM ticket t
            INNER JOIN orders o ON t.order_id = o.id
            WHERE o.user_id = ?
            ORDER BY t.seat_row, t.seat_number
            "#,
        )
        .bind(actor.user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut flight_ids: Vec<i64> = tickets.iter().map(|t| t.flight_id).collect();
        flight_ids.sort_unstable();
        flight_ids.dedup();
        let summaries = self.flight_summaries(&flight_ids).await?;

        tickets
            .into_iter()
            .map(|ticket| build_response(ticket.id, ticket.row, ticket.seat, ticket.flight_id, &summaries))
            .collect()
    }

    pub async fn get_ticket(&self, actor: Actor, ticket_id: i64) -> AppResult<TicketResponse> {
        let row = sqlx::query_as::<_, TicketOwnerRow>(
            r#"
            SELECT t.id, t.seat_row, t.seat_number, t.flight_id, o.user_id
            FROM ticket t
            INNER JOIN orders o ON t.order_id = o.id
            WHERE t.id = ?
            "#,
        )
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Ticket {} not found", ticket_id)))?;

        if row.user_id != actor.user_id && !actor.is_admin() {
            return Err(AppError::Forbidden("You do not own this ticket".into()));
        }

        let summaries = self.flight_summaries(&[row.flight_id]).await?;
        build_response(row.id, row.seat_row, row.seat_number, row.flight_id, &summaries)
    }

    /// Tickets for a batch of orders, grouped by order id. Each group
    /// keeps the (row, seat) ordering.
    pub async fn responses_for_orders(
        &self,
        order_ids: &[i64],
    ) -> AppResult<HashMap<i64, Vec<TicketResponse>>> {
        let mut by_order: HashMap<i64, Vec<TicketResponse>> = HashMap::new();
        if order_ids.is_empty() {
            return Ok(by_order);
        }

        let placeholders = vec!["?"; order_ids.len()].join(", ");
        let sql = format!(
            r#"
            SELECT t.id, t.seat_row, t.seat_number, t.flight_id, t.order_id
            FROM ticket t
            WHERE t.order_id IN ({})
            ORDER BY t.seat_row, t.seat_number
            "#,
            placeholders
        );

        let mut query = sqlx::query_as::<_, Ticket>(&sql);
        for order_id in order_ids {
            query = query.bind(order_id);
        }
        let tickets = query.fetch_all(&self.pool).await?;

        let mut flight_ids: Vec<i64> = tickets.iter().map(|t| t.flight_id).collect();
        flight_ids.sort_unstable();
        flight_ids.dedup();
        let summaries = self.flight_summaries(&flight_ids).await?;

        for ticket in tickets {
            let response =
                build_response(ticket.id, ticket.row, ticket.seat, ticket.flight_id, &summaries)?;
            by_order.entry(ticket.order_id).or_default().push(response);
        }

        Ok(by_order)
    }

    async fn flight_summaries(
        &self,
        flight_ids: &[i64],
    ) -> AppResult<HashMap<i64, FlightSummary>> {
        let mut summaries = HashMap::new();
        if flight_ids.is_empty() {
            return Ok(summaries);
        }

        let placeholders = vec!["?"; flight_ids.len()].join(", ");
        let sql = format!(
            r#"
            SELECT f.id, src.name AS source_name, dst.name AS destination_name,
                   a.name AS airplane_name, f.departure_time, f.arrival_time
            FROM flight f
            INNER JOIN route r ON f.route_id = r.id
            INNER JOIN airport src ON r.source_id = src.id
            INNER JOIN airport dst ON r.destination_id = dst.id
            INNER JOIN airplane a ON f.airplane_id = a.id
            WHERE f.id IN ({})
            "#,
            placeholders
        );

        let mut query = sqlx::query_as::<_, FlightSummaryRow>(&sql);
        for flight_id in flight_ids {
            query = query.bind(flight_id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let crew_sql = format!(
            r#"
            SELECT fc.flight_id, c.first_name, c.last_name
            FROM flight_crew fc
            INNER JOIN crew c ON fc.crew_id = c.id
            WHERE fc.flight_id IN ({})
            ORDER BY c.id
            "#,
            placeholders
        );
        let mut crew_query = sqlx::query_as::<_, (i64, String, String)>(&crew_sql);
        for flight_id in flight_ids {
            crew_query = crew_query.bind(flight_id);
        }

        let mut crew_names: HashMap<i64, Vec<String>> = HashMap::new();
        for (flight_id, first_name, last_name) in crew_query.fetch_all(&self.pool).await? {
            crew_names
                .entry(flight_id)
                .or_default()
                .push(format!("{} {}", first_name, last_name));
        }

        for row in rows {
            let crew = crew_names.remove(&row.id).unwrap_or_default();
            summaries.insert(
                row.id,
                FlightSummary {
                    route: format!("{} - {}", row.source_name, row.destination_name),
                    airplane: row.airplane_name,
                    departure_time: row.departure_time,
                    arrival_time: row.arrival_time,
                    crew,
                },
            );
        }

        Ok(summaries)
    }
}

fn build_response(
    id: i64,
    row: i64,
    seat: i64,
    flight_id: i64,
    summaries: &HashMap<i64, FlightSummary>,
) -> AppResult<TicketResponse> {
    let flight = summaries
        .get(&flight_id)
        .cloned()
        .ok_or_else(|| AppError::DatabaseError(format!("Flight {} missing for ticket", flight_id)))?;

    Ok(TicketResponse {
        id,
        row,
        seat,
        flight,
    })
}
