use crate::models::crew::Crew;
use crate::models::flight::{
    AvailabilityResponse, FlightAirplaneInfo, FlightCreateRequest, FlightDetail, FlightFilter,
    FlightListItem, FlightListRow, FlightRouteInfo, SeatRef,
};
use crate::models::route::RouteAirport;
use crate::utils::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use validator::Validate;

#[derive(sqlx::FromRow)]
struct FlightDetailRow {
    id: i64,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    distance: i64,
    source_name: String,
    source_city: String,
    destination_name: String,
    destination_city: String,
    airplane_name: String,
    airplane_type: String,
    seat_rows: i64,
    seats_in_row: i64,
}

pub struct FlightService {
    pool: SqlitePool,
}

impl FlightService {
    pub fn new(pool: SqlitePool) -> Self {
        FlightService { pool }
    }

    pub async fn create_flight(&self, request: FlightCreateRequest) -> AppResult<FlightDetail> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        check_times(request.departure_time, request.arrival_time)?;

        let mut tx = self.pool.begin().await?;

        ensure_route_exists(&mut tx, request.route).await?;
        ensure_airplane_exists(&mut tx, request.airplane).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO flight (route_id, airplane_id, departure_time, arrival_time)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(request.route)
        .bind(request.airplane)
        .bind(request.departure_time)
        .bind(request.arrival_time)
        .execute(&mut *tx)
        .await?;

        let flight_id = result.last_insert_rowid();
        replace_crew(&mut tx, flight_id, &request.crew).await?;

        tx.commit().await?;

        self.get_flight(flight_id).await
    }

    pub async fn update_flight(
        &self,
        id: i64,
        request: FlightCreateRequest,
    ) -> AppResult<FlightDetail> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        check_times(request.departure_time, request.arrival_time)?;

        let mut tx = self.pool.begin().await?;

        ensure_route_exists(&mut tx, request.route).await?;
        ensure_airplane_exists(&mut tx, request.airplane).await?;

        let result = sqlx::query(
            r#"
            UPDATE flight
            SET route_id = ?, airplane_id = ?, departure_time = ?, arrival_time = ?
            WHERE id = ?
            "#,
        )
        .bind(request.route)
        .bind(request.airplane)
        .bind(request.departure_time)
        .bind(request.arrival_time)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Flight {} not found", id)));
        }

        replace_crew(&mut tx, id, &request.crew).await?;

        tx.commit().await?;

        self.get_flight(id).await
    }

    pub async fn delete_flight(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM flight WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Flight {} not found", id)));
        }

        Ok(())
    }

    pub async fn get_flight(&self, id: i64) -> AppResult<FlightDetail> {
        let row = sqlx::query_as::<_, FlightDetailRow>(
            r#"
            SELECT f.id, f.departure_time, f.arrival_time, r.distance,
                   src.name AS source_name, src.closest_big_city AS source_city,
                   dst.name AS destination_name, dst.closest_big_city AS destination_city,
                   a.name AS airplane_name, tp.name AS airplane_type,
                   a.seat_rows, a.seats_in_row
            FROM flight f
            INNER JOIN route r ON f.route_id = r.id
            INNER JOIN airport src ON r.source_id = src.id
            INNER JOIN airport dst ON r.destination_id = dst.id
            INNER JOIN airplane a ON f.airplane_id = a.id
            INNER JOIN airplane_type tp ON a.airplane_type_id = tp.id
            WHERE f.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Flight {} not found", id)))?;

        let crew = sqlx::query_as::<_, Crew>(
            r#"
            SELECT c.id, c.first_name, c.last_name
            FROM crew c
            INNER JOIN flight_crew fc ON fc.crew_id = c.id
            WHERE fc.flight_id = ?
            ORDER BY c.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let taken_seats = sqlx::query_as::<_, SeatRef>(
            r#"
            SELECT seat_row, seat_number
            FROM ticket
            WHERE flight_id = ?
            ORDER BY seat_row, seat_number
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(FlightDetail {
            id: row.id,
            route: FlightRouteInfo {
                source: RouteAirport {
                    name: row.source_name,
                    closest_big_city: row.source_city,
                },
                destination: RouteAirport {
                    name: row.destination_name,
                    closest_big_city: row.destination_city,
                },
                distance: row.distance,
            },
            airplane: FlightAirplaneInfo {
                name: row.airplane_name,
                airplane_type: row.airplane_type,
                rows: row.seat_rows,
                seats_in_row: row.seats_in_row,
                capacity: row.seat_rows * row.seats_in_row,
            },
            departure_time: row.departure_time,
            arrival_time: row.arrival_time,
            crew,
            taken_seats,
        })
    }

    /// Lists flights with their remaining seat counts. The count is
    /// derived in the same query that applies the filters, so a
    /// minimum-availability filter costs no extra round trips.
    pub async fn list_flights(&self, filter: FlightFilter) -> AppResult<Vec<FlightListItem>> {
        let mut sql = String::from(
            r#"
            SELECT f.id, src.name AS source_name, dst.name AS destination_name,
                   a.name AS airplane_name, f.departure_time, f.arrival_time,
                   a.seat_rows * a.seats_in_row - COUNT(t.id) AS tickets_available
            FROM flight f
            INNER JOIN route r ON f.route_id = r.id
            INNER JOIN airport src ON r.source_id = src.id
            INNER JOIN airport dst ON r.destination_id = dst.id
            INNER JOIN airplane a ON f.airplane_id = a.id
            LEFT JOIN ticket t ON t.flight_id = f.id
            "#,
        );

        let mut conditions: Vec<&str> = Vec::new();
        if filter.source.is_some() {
            conditions.push("src.name LIKE ?");
        }
        if filter.destination.is_some() {
            conditions.push("dst.name LIKE ?");
        }
        if filter.departure_after.is_some() {
            conditions.push("f.departure_time >= ?");
        }
        if filter.arrival_before.is_some() {
            conditions.push("f.arrival_time <= ?");
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        sql.push_str(" GROUP BY f.id");
        if filter.min_available.is_some() {
            sql.push_str(" HAVING tickets_available >= ?");
        }
        sql.push_str(" ORDER BY f.departure_time, f.id");

        let mut query = sqlx::query_as::<_, FlightListRow>(&sql);
        if let Some(source) = &filter.source {
            query = query.bind(format!("%{}%", source));
        }
        if let Some(destination) = &filter.destination {
            query = query.bind(format!("%{}%", destination));
        }
        if let Some(departure_after) = filter.departure_after {
            query = query.bind(departure_after);
        }
        if let Some(arrival_before) = filter.arrival_before {
            query = query.bind(arrival_before);
        }
        if let Some(min_available) = filter.min_available {
            query = query.bind(min_available);
        }

        let rows = query.fetch_all(&self.pool).await?;
        let crew_names = self.crew_names_by_flight(&rows).await?;

        let flights = rows
            .into_iter()
            .map(|row| {
                let crew = crew_names.get(&row.id).cloned().unwrap_or_default();
                FlightListItem {
                    id: row.id,
                    route: format!("{} - {}", row.source_name, row.destination_name),
                    airplane: row.airplane_name,
                    departure_time: row.departure_time,
                    arrival_time: row.arrival_time,
                    crew,
                    tickets_available: row.tickets_available,
                }
            })
            .collect();

        Ok(flights)
    }

    /// Remaining seats on one flight: airplane capacity minus sold
    /// tickets, computed in a single aggregate read.
    pub async fn availability(&self, flight_id: i64) -> AppResult<AvailabilityResponse> {
        let tickets_available: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT a.seat_rows * a.seats_in_row - COUNT(t.id) AS tickets_available
            FROM flight f
            INNER JOIN airplane a ON f.airplane_id = a.id
            LEFT JOIN ticket t ON t.flight_id = f.id
            WHERE f.id = ?
            GROUP BY f.id
            "#,
        )
        .bind(flight_id)
        .fetch_optional(&self.pool)
        .await?;

        let tickets_available = tickets_available
            .ok_or_else(|| AppError::NotFound(format!("Flight {} not found", flight_id)))?;

        Ok(AvailabilityResponse {
            flight_id,
            tickets_available,
        })
    }

    // One query for the crews of a whole page of flights.
    async fn crew_names_by_flight(
        &self,
        rows: &[FlightListRow],
    ) -> AppResult<HashMap<i64, Vec<String>>> {
        let mut crew_names: HashMap<i64, Vec<String>> = HashMap::new();
        if rows.is_empty() {
            return Ok(crew_names);
        }

        let placeholders = vec!["?"; rows.len()].join(", ");
        let sql = format!(
            r#"
            SELECT fc.flight_id, c.first_name, c.last_name
            FROM flight_crew fc
            INNER JOIN crew c ON fc.crew_id = c.id
            WHERE fc.flight_id IN ({})
            ORDER BY c.id
            "#,
            placeholders
        );

        let mut query = sqlx::query_as::<_, (i64, String, String)>(&sql);
        for row in rows {
            query = query.bind(row.id);
        }

        for (flight_id, first_name, last_name) in query.fetch_all(&self.pool).await? {
            crew_names
                .entry(flight_id)
                .or_default()
                .push(format!("{} {}", first_name, last_name));
        }

        Ok(crew_names)
    }
}

fn check_times(departure: DateTime<Utc>, arrival: DateTime<Utc>) -> AppResult<()> {
    if arrival <= departure {
        return Err(AppError::ValidationError(
            "Arrival time must be after departure time".into(),
        ));
    }
    Ok(())
}

async fn ensure_route_exists(tx: &mut Transaction<'_, Sqlite>, id: i64) -> AppResult<()> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM route WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

    if found.is_none() {
        return Err(AppError::NotFound(format!("Route {} not found", id)));
    }

    Ok(())
}

async fn ensure_airplane_exists(tx: &mut Transaction<'_, Sqlite>, id: i64) -> AppResult<()> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM airplane WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

    if found.is_none() {
        return Err(AppError::NotFound(format!("Airplane {} not found", id)));
    }

    Ok(())
}

async fn replace_crew(
    tx: &mut Transaction<'_, Sqlite>,
    flight_id: i64,
    crew: &[i64],
) -> AppResult<()> {
    sqlx::query("DELETE FROM flight_crew WHERE flight_id = ?")
        .bind(flight_id)
        .execute(&mut **tx)
        .await?;

    for crew_id in crew {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM crew WHERE id = ?")
            .bind(crew_id)
            .fetch_optional(&mut **tx)
            .await?;

        if found.is_none() {
            return Err(AppError::NotFound(format!("Crew member {} not found", crew_id)));
        }

        sqlx::query("INSERT INTO flight_crew (flight_id, crew_id) VALUES (?, ?)")
            .bind(flight_id)
            .bind(crew_id)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}
