use crate::models::airplane::SeatGrid;
use crate::models::order::{Order, OrderCreateRequest, OrderResponse};
use crate::models::ticket::TicketRequest;
use crate::models::user::Actor;
use crate::services::ticket_service::TicketService;
use crate::utils::error::{AppError, AppResult, RangeViolation};
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use tracing::info;
use validator::Validate;

pub struct OrderService {
    pool: SqlitePool,
    ticket_service: TicketService,
}

impl OrderService {
    pub fn new(pool: SqlitePool) -> Self {
        OrderService {
            ticket_service: TicketService::new(pool.clone()),
            pool,
        }
    }

    /// Creates an order with all its tickets in one transaction. Either
    /// every requested seat is booked or nothing is written at all,
    /// including the order row itself.
    pub async fn create_order(
        &self,
        actor: Actor,
        request: OrderCreateRequest,
    ) -> AppResult<OrderResponse> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let mut tx = self.pool.begin().await?;

        let created_at = Utc::now();
        let result = sqlx::query("INSERT INTO orders (user_id, created_at) VALUES (?, ?)")
            .bind(actor.user_id)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;
        let order_id = result.last_insert_rowid();

        insert_tickets(&mut tx, order_id, &request.tickets).await?;

        tx.commit().await?;
        info!(
            order_id,
            user_id = actor.user_id,
            tickets = request.tickets.len(),
            "order created"
        );

        self.get_order(actor, order_id).await
    }

    /// Books additional seats on an existing order, with the same
    /// all-or-nothing guarantee as order creation.
    pub async fn add_tickets(
        &self,
        actor: Actor,
        order_id: i64,
        tickets: Vec<TicketRequest>,
    ) -> AppResult<OrderResponse> {
        if tickets.is_empty() {
            return Err(AppError::ValidationError(
                "At least one ticket is required".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let owner: Option<i64> = sqlx::query_scalar("SELECT user_id FROM orders WHERE id = ?")
            .bind(order_id)
            .fetch_optional(&mut *tx)
            .await?;
        let owner = owner.ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;

        if owner != actor.user_id && !actor.is_admin() {
            return Err(AppError::Forbidden("You do not own this order".into()));
        }

        insert_tickets(&mut tx, order_id, &tickets).await?;

        tx.commit().await?;
        info!(
            order_id,
            user_id = actor.user_id,
            tickets = tickets.len(),
            "tickets added to order"
        );

        self.get_order(actor, order_id).await
    }

    /// The caller's orders, newest first. Orders that have lost all
    /// their tickets are skipped.
    pub async fn list_orders(
        &self,
        actor: Actor,
        created_after: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<OrderResponse>> {
        let mut sql = String::from(
            r#"
            SELECT o.id, o.user_id, o.created_at
            FROM orders o
            WHERE o.user_id = ?
              AND EXISTS (SELECT 1 FROM ticket t WHERE t.order_id = o.id)
            "#,
        );
        if created_after.is_some() {
            sql.push_str(" AND o.created_at >= ?");
        }
        sql.push_str(" ORDER BY o.created_at DESC, o.id DESC");

        let mut query = sqlx::query_as::<_, Order>(&sql).bind(actor.user_id);
        if let Some(created_after) = created_after {
            query = query.bind(created_after);
        }
        let orders = query.fetch_all(&self.pool).await?;

        let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        let mut tickets_by_order = self.ticket_service.responses_for_orders(&order_ids).await?;

        let responses = orders
            .into_iter()
            .map(|order| OrderResponse {
                id: order.id,
                created_at: order.created_at,
                tickets: tickets_by_order.remove(&order.id).unwrap_or_default(),
            })
            .collect();

        Ok(responses)
    }

    pub async fn get_order(&self, actor: Actor, order_id: i64) -> AppResult<OrderResponse> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT id, user_id, created_at FROM orders WHERE id = ?",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;

        if order.user_id != actor.user_id && !actor.is_admin() {
            return Err(AppError::Forbidden("You do not own this order".into()));
        }

        let mut tickets_by_order = self.ticket_service.responses_for_orders(&[order_id]).await?;

        Ok(OrderResponse {
            id: order.id,
            created_at: order.created_at,
            tickets: tickets_by_order.remove(&order_id).unwrap_or_default(),
        })
    }

    /// Cancels an order. The seats go back on sale as soon as the
    /// ticket rows are gone.
    pub async fn delete_order(&self, actor: Actor, order_id: i64) -> AppResult<()> {
        let owner: Option<i64> = sqlx::query_scalar("SELECT user_id FROM orders WHERE id = ?")
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;
        let owner = owner.ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;

        if owner != actor.user_id && !actor.is_admin() {
            return Err(AppError::Forbidden("You do not own this order".into()));
        }

        sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        info!(order_id, user_id = actor.user_id, "order cancelled");
        Ok(())
    }
}

/// Books a batch of seats for an order inside the caller's transaction.
///
/// Runs in two phases. Phase one resolves each flight's seat grid and
/// collects every bounds violation across the whole batch, so the
/// client sees all bad coordinates at once. Phase two claims the seats
/// one by one. The transaction sees its own pending inserts, which
/// makes a duplicate seat within a single request fail the same way as
/// a seat sold to someone else. Any error unwinds the transaction and
/// leaves no rows behind.
async fn insert_tickets(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
    tickets: &[TicketRequest],
) -> AppResult<()> {
    let mut grids: HashMap<i64, SeatGrid> = HashMap::new();
    let mut violations: Vec<RangeViolation> = Vec::new();

    for (index, ticket) in tickets.iter().enumerate() {
        let grid = match grids.get(&ticket.flight) {
            Some(grid) => *grid,
            None => {
                let grid = sqlx::query_as::<_, SeatGrid>(
                    r#"
                    SELECT a.seat_rows, a.seats_in_row
                    FROM flight f
                    INNER JOIN airplane a ON f.airplane_id = a.id
                    WHERE f.id = ?
                    "#,
                )
                .bind(ticket.flight)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Flight {} not found", ticket.flight)))?;
                grids.insert(ticket.flight, grid);
                grid
            }
        };

        violations.extend(grid.check_position(index, ticket.row, ticket.seat));
    }

    if !violations.is_empty() {
        return Err(AppError::OutOfRange(violations));
    }

    for ticket in tickets {
        let taken: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM ticket WHERE flight_id = ? AND seat_row = ? AND seat_number = ?",
        )
        .bind(ticket.flight)
        .bind(ticket.row)
        .bind(ticket.seat)
        .fetch_optional(&mut **tx)
        .await?;

        if taken.is_some() {
            return Err(AppError::SeatTaken {
                flight_id: ticket.flight,
                row: ticket.row,
                seat: ticket.seat,
            });
        }

        sqlx::query(
            "INSERT INTO ticket (seat_row, seat_number, flight_id, order_id) VALUES (?, ?, ?, ?)",
        )
        .bind(ticket.row)
        .bind(ticket.seat)
        .bind(ticket.flight)
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}
