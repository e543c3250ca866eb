use airport_api::{
    models::airplane::{AirplaneCreateRequest, AirplaneTypeCreateRequest},
    models::airport::AirportCreateRequest,
    models::flight::FlightCreateRequest,
    models::order::OrderCreateRequest,
    models::route::RouteCreateRequest,
    models::ticket::TicketRequest,
    models::user::{Actor, Role, UserRegistrationRequest},
    services::{
        airplane_service::AirplaneService, airport_service::AirportService,
        flight_service::FlightService, order_service::OrderService, route_service::RouteService,
        user_service::UserService,
    },
    utils::error::AppError,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use ctor::dtor;
use sqlx::SqlitePool;
use test_context::{test_context, AsyncTestContext};

mod common {
    pub mod test_utils;
}
use common::test_utils::TestDb;

struct OrderServiceContext {
    pool: SqlitePool,
    airport_service: AirportService,
    route_service: RouteService,
    airplane_service: AirplaneService,
    flight_service: FlightService,
    order_service: OrderService,
    user_service: UserService,
}

#[dtor]
fn cleanup() {
    if let Err(e) = TestDb::cleanup_database_sync() {
        eprintln!("Failed to cleanup test database: {}", e);
    }
}

#[async_trait]
impl AsyncTestContext for OrderServiceContext {
    async fn setup() -> Self {
        let pool: SqlitePool = TestDb::get_instance(file!())
            .await
            .expect("Failed to get test database instance");

        OrderServiceContext {
            airport_service: AirportService::new(pool.clone()),
            route_service: RouteService::new(pool.clone()),
            airplane_service: AirplaneService::new(pool.clone()),
            flight_service: FlightService::new(pool.clone()),
            order_service: OrderService::new(pool.clone()),
            user_service: UserService::new(pool.clone()),
            pool,
        }
    }

    async fn teardown(self) {}
}

impl OrderServiceContext {
    // A ready-to-book flight on a rows x seats_in_row airplane
    async fn create_flight(
        &self,
        prefix: &str,
        rows: i64,
        seats_in_row: i64,
    ) -> Result<i64, AppError> {
        let source = self
            .airport_service
            .create_airport(AirportCreateRequest {
                name: format!("{} Source", prefix),
                closest_big_city: format!("{} Source City", prefix),
            })
            .await?;
        let destination = self
            .airport_service
            .create_airport(AirportCreateRequest {
                name: format!("{} Destination", prefix),
                closest_big_city: format!("{} Destination City", prefix),
            })
            .await?;
        let route = self
            .route_service
            .create_route(RouteCreateRequest {
                source: source.id,
                destination: destination.id,
                distance: 1000,
            })
            .await?;
        let airplane_type = self
            .airplane_service
            .create_airplane_type(AirplaneTypeCreateRequest {
                name: format!("{} Type", prefix),
            })
            .await?;
        let airplane = self
            .airplane_service
            .create_airplane(AirplaneCreateRequest {
                name: format!("{} Plane", prefix),
                rows,
                seats_in_row,
                airplane_type: airplane_type.id,
            })
            .await?;
        let flight = self
            .flight_service
            .create_flight(FlightCreateRequest {
                route: route.id,
                airplane: airplane.id,
                departure_time: Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap(),
                arrival_time: Utc.with_ymd_and_hms(2025, 6, 1, 14, 0, 0).unwrap(),
                crew: vec![],
            })
            .await?;

        Ok(flight.id)
    }

    async fn register_user(&self, username: &str) -> Result<Actor, AppError> {
        let user_id = self
            .user_service
            .register_user(UserRegistrationRequest {
                username: username.to_string(),
                password: "test_password123".to_string(),
            })
            .await?;
        Ok(Actor {
            user_id,
            role: Role::User,
        })
    }

    async fn admin(&self, username: &str) -> Result<Actor, AppError> {
        let user_id = self
            .user_service
            .ensure_admin(username, "admin_password123")
            .await?;
        Ok(Actor {
            user_id,
            role: Role::Admin,
        })
    }

    async fn order_count(&self, user_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn ticket_count(&self, flight_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ticket WHERE flight_id = ?")
            .bind(flight_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn seats(flight: i64, positions: &[(i64, i64)]) -> OrderCreateRequest {
    OrderCreateRequest {
        tickets: positions
            .iter()
            .map(|(row, seat)| TicketRequest {
                flight,
                row: *row,
                seat: *seat,
            })
            .collect(),
    }
}

#[test_context(OrderServiceContext)]
#[tokio::test]
async fn test_create_order_books_all_seats(ctx: &OrderServiceContext) -> Result<(), AppError> {
    let flight_id = ctx.create_flight("HappyPath", 3, 4).await?;
    let actor = ctx.register_user("happy_path_buyer").await?;

    let order = ctx
        .order_service
        .create_order(actor, seats(flight_id, &[(1, 1), (1, 2)]))
        .await?;

    assert_eq!(order.tickets.len(), 2);
    assert_eq!(order.tickets[0].row, 1);
    assert_eq!(order.tickets[0].seat, 1);
    assert_eq!(
        order.tickets[0].flight.route,
        "HappyPath Source - HappyPath Destination"
    );

    let availability = ctx.flight_service.availability(flight_id).await?;
    assert_eq!(availability.tickets_available, 10);

    Ok(())
}

#[test_context(OrderServiceContext)]
#[tokio::test]
async fn test_row_out_of_range_reports_bounds(ctx: &OrderServiceContext) -> Result<(), AppError> {
    let flight_id = ctx.create_flight("RowBounds", 3, 4).await?;
    let actor = ctx.register_user("row_bounds_buyer").await?;

    let err = ctx
        .order_service
        .create_order(actor, seats(flight_id, &[(4, 2)]))
        .await
        .unwrap_err();

    match err {
        AppError::OutOfRange(violations) => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].ticket_index, 0);
            assert_eq!(violations[0].field, "row");
            assert_eq!(violations[0].min, 1);
            assert_eq!(violations[0].max, 3);
            assert_eq!(violations[0].got, 4);
        }
        other => panic!("expected OutOfRange, got {:?}", other),
    }

    assert_eq!(ctx.order_count(actor.user_id).await?, 0);
    assert_eq!(ctx.ticket_count(flight_id).await?, 0);

    Ok(())
}

#[test_context(OrderServiceContext)]
#[tokio::test]
async fn test_bad_row_and_seat_both_reported(ctx: &OrderServiceContext) -> Result<(), AppError> {
    let flight_id = ctx.create_flight("BothBounds", 3, 4).await?;
    let actor = ctx.register_user("both_bounds_buyer").await?;

    let err = ctx
        .order_service
        .create_order(actor, seats(flight_id, &[(0, 9)]))
        .await
        .unwrap_err();

    match err {
        AppError::OutOfRange(violations) => {
            assert_eq!(violations.len(), 2, "row and seat are both out of range");
            assert_eq!(violations[0].field, "row");
            assert_eq!(violations[0].got, 0);
            assert_eq!(violations[1].field, "seat");
            assert_eq!(violations[1].max, 4);
            assert_eq!(violations[1].got, 9);
        }
        other => panic!("expected OutOfRange, got {:?}", other),
    }

    Ok(())
}

#[test_context(OrderServiceContext)]
#[tokio::test]
async fn test_violations_collected_across_batch(ctx: &OrderServiceContext) -> Result<(), AppError> {
    let flight_id = ctx.create_flight("BatchBounds", 3, 4).await?;
    let actor = ctx.register_user("batch_bounds_buyer").await?;

    let err = ctx
        .order_service
        .create_order(actor, seats(flight_id, &[(1, 1), (5, 1), (2, 9)]))
        .await
        .unwrap_err();

    match err {
        AppError::OutOfRange(violations) => {
            assert_eq!(violations.len(), 2);
            assert_eq!(violations[0].ticket_index, 1);
            assert_eq!(violations[0].field, "row");
            assert_eq!(violations[1].ticket_index, 2);
            assert_eq!(violations[1].field, "seat");
        }
        other => panic!("expected OutOfRange, got {:?}", other),
    }

    // The valid first ticket must not survive on its own
    assert_eq!(ctx.ticket_count(flight_id).await?, 0);

    Ok(())
}

#[test_context(OrderServiceContext)]
#[tokio::test]
async fn test_taken_seat_rejected(ctx: &OrderServiceContext) -> Result<(), AppError> {
    let flight_id = ctx.create_flight("TakenSeat", 3, 4).await?;
    let first = ctx.register_user("taken_seat_first").await?;
    let second = ctx.register_user("taken_seat_second").await?;

    ctx.order_service
        .create_order(first, seats(flight_id, &[(2, 2)]))
        .await?;

    let err = ctx
        .order_service
        .create_order(second, seats(flight_id, &[(2, 2)]))
        .await
        .unwrap_err();

    match err {
        AppError::SeatTaken {
            flight_id: reported_flight,
            row,
            seat,
        } => {
            assert_eq!(reported_flight, flight_id);
            assert_eq!(row, 2);
            assert_eq!(seat, 2);
        }
        other => panic!("expected SeatTaken, got {:?}", other),
    }

    assert_eq!(ctx.order_count(second.user_id).await?, 0);
    assert_eq!(ctx.ticket_count(flight_id).await?, 1);

    Ok(())
}

#[test_context(OrderServiceContext)]
#[tokio::test]
async fn test_duplicate_seat_in_request_books_nothing(
    ctx: &OrderServiceContext,
) -> Result<(), AppError> {
    let flight_id = ctx.create_flight("DupRequest", 3, 4).await?;
    let actor = ctx.register_user("dup_request_buyer").await?;

    let err = ctx
        .order_service
        .create_order(actor, seats(flight_id, &[(1, 1), (1, 1)]))
        .await
        .unwrap_err();

    assert!(
        matches!(err, AppError::SeatTaken { .. }),
        "expected SeatTaken, got {:?}",
        err
    );

    // All or nothing: no tickets and no dangling order row
    assert_eq!(ctx.ticket_count(flight_id).await?, 0);
    assert_eq!(ctx.order_count(actor.user_id).await?, 0);

    Ok(())
}

#[test_context(OrderServiceContext)]
#[tokio::test]
async fn test_partially_valid_batch_books_nothing(
    ctx: &OrderServiceContext,
) -> Result<(), AppError> {
    let flight_id = ctx.create_flight("PartialBatch", 3, 4).await?;
    let first = ctx.register_user("partial_batch_first").await?;
    let second = ctx.register_user("partial_batch_second").await?;

    ctx.order_service
        .create_order(first, seats(flight_id, &[(1, 1)]))
        .await?;

    let err = ctx
        .order_service
        .create_order(second, seats(flight_id, &[(2, 1), (1, 1), (2, 2)]))
        .await
        .unwrap_err();

    assert!(
        matches!(err, AppError::SeatTaken { .. }),
        "expected SeatTaken, got {:?}",
        err
    );
    assert_eq!(
        ctx.ticket_count(flight_id).await?,
        1,
        "only the first user's seat remains"
    );
    assert_eq!(ctx.order_count(second.user_id).await?, 0);

    Ok(())
}

#[test_context(OrderServiceContext)]
#[tokio::test]
async fn test_order_can_span_flights(ctx: &OrderServiceContext) -> Result<(), AppError> {
    let flight_a = ctx.create_flight("SpanAlpha", 3, 4).await?;
    let flight_b = ctx.create_flight("SpanBravo", 2, 2).await?;
    let actor = ctx.register_user("span_buyer").await?;

    let order = ctx
        .order_service
        .create_order(
            actor,
            OrderCreateRequest {
                tickets: vec![
                    TicketRequest {
                        flight: flight_a,
                        row: 1,
                        seat: 1,
                    },
                    TicketRequest {
                        flight: flight_b,
                        row: 2,
                        seat: 2,
                    },
                ],
            },
        )
        .await?;

    assert_eq!(order.tickets.len(), 2);
    assert_eq!(ctx.ticket_count(flight_a).await?, 1);
    assert_eq!(ctx.ticket_count(flight_b).await?, 1);

    Ok(())
}

#[test_context(OrderServiceContext)]
#[tokio::test]
async fn test_unknown_flight_books_nothing(ctx: &OrderServiceContext) -> Result<(), AppError> {
    let actor = ctx.register_user("unknown_flight_buyer").await?;

    let err = ctx
        .order_service
        .create_order(actor, seats(999_999, &[(1, 1)]))
        .await
        .unwrap_err();

    assert!(
        matches!(err, AppError::NotFound(_)),
        "expected NotFound, got {:?}",
        err
    );
    assert_eq!(ctx.order_count(actor.user_id).await?, 0);

    Ok(())
}

#[test_context(OrderServiceContext)]
#[tokio::test]
async fn test_empty_order_rejected(ctx: &OrderServiceContext) -> Result<(), AppError> {
    let actor = ctx.register_user("empty_order_buyer").await?;

    let err = ctx
        .order_service
        .create_order(actor, OrderCreateRequest { tickets: vec![] })
        .await
        .unwrap_err();

    assert!(
        matches!(err, AppError::ValidationError(_)),
        "expected ValidationError, got {:?}",
        err
    );

    Ok(())
}

#[test_context(OrderServiceContext)]
#[tokio::test]
async fn test_add_tickets_appends_atomically(ctx: &OrderServiceContext) -> Result<(), AppError> {
    let flight_id = ctx.create_flight("AddTickets", 3, 4).await?;
    let actor = ctx.register_user("add_tickets_buyer").await?;
    let blocker = ctx.register_user("add_tickets_blocker").await?;

    let order = ctx
        .order_service
        .create_order(actor, seats(flight_id, &[(1, 1)]))
        .await?;

    let grown = ctx
        .order_service
        .add_tickets(
            actor,
            order.id,
            seats(flight_id, &[(1, 2), (1, 3)]).tickets,
        )
        .await?;
    assert_eq!(grown.tickets.len(), 3);

    // One of the two new seats is taken, so neither may land
    ctx.order_service
        .create_order(blocker, seats(flight_id, &[(2, 1)]))
        .await?;

    let err = ctx
        .order_service
        .add_tickets(
            actor,
            order.id,
            seats(flight_id, &[(2, 2), (2, 1)]).tickets,
        )
        .await
        .unwrap_err();
    assert!(
        matches!(err, AppError::SeatTaken { .. }),
        "expected SeatTaken, got {:?}",
        err
    );

    let unchanged = ctx.order_service.get_order(actor, order.id).await?;
    assert_eq!(unchanged.tickets.len(), 3, "failed batch must not grow the order");

    Ok(())
}

#[test_context(OrderServiceContext)]
#[tokio::test]
async fn test_add_tickets_requires_ownership(ctx: &OrderServiceContext) -> Result<(), AppError> {
    let flight_id = ctx.create_flight("AddOwnership", 3, 4).await?;
    let owner = ctx.register_user("add_ownership_owner").await?;
    let intruder = ctx.register_user("add_ownership_intruder").await?;
    let admin = ctx.admin("add_ownership_admin").await?;

    let order = ctx
        .order_service
        .create_order(owner, seats(flight_id, &[(1, 1)]))
        .await?;

    let err = ctx
        .order_service
        .add_tickets(intruder, order.id, seats(flight_id, &[(1, 2)]).tickets)
        .await
        .unwrap_err();
    assert!(
        matches!(err, AppError::Forbidden(_)),
        "expected Forbidden, got {:?}",
        err
    );

    // Admins may act on any order
    let grown = ctx
        .order_service
        .add_tickets(admin, order.id, seats(flight_id, &[(1, 3)]).tickets)
        .await?;
    assert_eq!(grown.tickets.len(), 2);

    Ok(())
}

#[test_context(OrderServiceContext)]
#[tokio::test]
async fn test_get_order_enforces_ownership(ctx: &OrderServiceContext) -> Result<(), AppError> {
    let flight_id = ctx.create_flight("GetOwnership", 3, 4).await?;
    let owner = ctx.register_user("get_ownership_owner").await?;
    let intruder = ctx.register_user("get_ownership_intruder").await?;
    let admin = ctx.admin("get_ownership_admin").await?;

    let order = ctx
        .order_service
        .create_order(owner, seats(flight_id, &[(3, 4)]))
        .await?;

    let err = ctx
        .order_service
        .get_order(intruder, order.id)
        .await
        .unwrap_err();
    assert!(
        matches!(err, AppError::Forbidden(_)),
        "expected Forbidden, got {:?}",
        err
    );

    let via_admin = ctx.order_service.get_order(admin, order.id).await?;
    assert_eq!(via_admin.id, order.id);

    let err = ctx.order_service.get_order(owner, 999_999).await.unwrap_err();
    assert!(
        matches!(err, AppError::NotFound(_)),
        "expected NotFound, got {:?}",
        err
    );

    Ok(())
}

#[test_context(OrderServiceContext)]
#[tokio::test]
async fn test_list_orders_newest_first_skips_empty(
    ctx: &OrderServiceContext,
) -> Result<(), AppError> {
    let flight_id = ctx.create_flight("ListOrders", 3, 4).await?;
    let actor = ctx.register_user("list_orders_buyer").await?;

    let first = ctx
        .order_service
        .create_order(actor, seats(flight_id, &[(1, 1)]))
        .await?;
    let second = ctx
        .order_service
        .create_order(actor, seats(flight_id, &[(1, 2)]))
        .await?;
    let third = ctx
        .order_service
        .create_order(actor, seats(flight_id, &[(1, 3)]))
        .await?;

    // Empty an order behind the service's back
    sqlx::query("DELETE FROM ticket WHERE order_id = ?")
        .bind(second.id)
        .execute(&ctx.pool)
        .await?;

    let orders = ctx.order_service.list_orders(actor, None).await?;
    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();

    assert_eq!(ids, vec![third.id, first.id], "newest first, empty order skipped");

    Ok(())
}

#[test_context(OrderServiceContext)]
#[tokio::test]
async fn test_list_orders_created_after(ctx: &OrderServiceContext) -> Result<(), AppError> {
    let flight_id = ctx.create_flight("ListAfter", 3, 4).await?;
    let actor = ctx.register_user("list_after_buyer").await?;

    ctx.order_service
        .create_order(actor, seats(flight_id, &[(1, 1)]))
        .await?;
    let mark = Utc::now();
    let late = ctx
        .order_service
        .create_order(actor, seats(flight_id, &[(1, 2)]))
        .await?;

    let orders = ctx.order_service.list_orders(actor, Some(mark)).await?;
    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();

    assert_eq!(ids, vec![late.id]);

    Ok(())
}

#[test_context(OrderServiceContext)]
#[tokio::test]
async fn test_list_orders_only_shows_own(ctx: &OrderServiceContext) -> Result<(), AppError> {
    let flight_id = ctx.create_flight("ListOwn", 3, 4).await?;
    let first = ctx.register_user("list_own_first").await?;
    let second = ctx.register_user("list_own_second").await?;

    ctx.order_service
        .create_order(first, seats(flight_id, &[(1, 1)]))
        .await?;
    ctx.order_service
        .create_order(second, seats(flight_id, &[(1, 2)]))
        .await?;

    let orders = ctx.order_service.list_orders(first, None).await?;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].tickets[0].seat, 1);

    Ok(())
}

#[test_context(OrderServiceContext)]
#[tokio::test]
async fn test_delete_order_releases_seats(ctx: &OrderServiceContext) -> Result<(), AppError> {
    let flight_id = ctx.create_flight("DeleteRelease", 3, 4).await?;
    let actor = ctx.register_user("delete_release_buyer").await?;
    let next = ctx.register_user("delete_release_next").await?;

    let order = ctx
        .order_service
        .create_order(actor, seats(flight_id, &[(1, 1), (1, 2)]))
        .await?;
    assert_eq!(
        ctx.flight_service.availability(flight_id).await?.tickets_available,
        10
    );

    ctx.order_service.delete_order(actor, order.id).await?;

    assert_eq!(
        ctx.flight_service.availability(flight_id).await?.tickets_available,
        12
    );
    let err = ctx.order_service.get_order(actor, order.id).await.unwrap_err();
    assert!(
        matches!(err, AppError::NotFound(_)),
        "expected NotFound, got {:?}",
        err
    );

    // The freed seat can be sold again
    ctx.order_service
        .create_order(next, seats(flight_id, &[(1, 1)]))
        .await?;

    Ok(())
}

#[test_context(OrderServiceContext)]
#[tokio::test]
async fn test_delete_order_requires_ownership(ctx: &OrderServiceContext) -> Result<(), AppError> {
    let flight_id = ctx.create_flight("DeleteOwnership", 3, 4).await?;
    let owner = ctx.register_user("delete_ownership_owner").await?;
    let intruder = ctx.register_user("delete_ownership_intruder").await?;
    let admin = ctx.admin("delete_ownership_admin").await?;

    let order = ctx
        .order_service
        .create_order(owner, seats(flight_id, &[(1, 1)]))
        .await?;

    let err = ctx
        .order_service
        .delete_order(intruder, order.id)
        .await
        .unwrap_err();
    assert!(
        matches!(err, AppError::Forbidden(_)),
        "expected Forbidden, got {:?}",
        err
    );

    ctx.order_service.delete_order(admin, order.id).await?;
    assert_eq!(ctx.ticket_count(flight_id).await?, 0);

    Ok(())
}
