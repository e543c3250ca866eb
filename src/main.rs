#[macro_use]
extern crate rocket;

use airport_api::db;
use airport_api::routes;
use airport_api::services;
use airport_api::swagger::{rapidoc, swagger_ui};
use dotenv::dotenv;
use rocket::fairing::AdHoc;
use rocket_okapi::openapi_get_routes;
use rocket_okapi::rapidoc::make_rapidoc;
use rocket_okapi::swagger_ui::*;
use tracing_subscriber::EnvFilter;

#[launch]
async fn rocket() -> _ {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Connect to the database and bring the schema up to date
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = db::connect(&database_url)
        .await
        .expect("Failed to connect to database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let user_service = services::user_service::UserService::new(pool.clone());
    let airport_service = services::airport_service::AirportService::new(pool.clone());
    let route_service = services::route_service::RouteService::new(pool.clone());
    let airplane_service = services::airplane_service::AirplaneService::new(pool.clone());
    let crew_service = services::crew_service::CrewService::new(pool.clone());
    let flight_service = services::flight_service::FlightService::new(pool.clone());
    let order_service = services::order_service::OrderService::new(pool.clone());
    let ticket_service = services::ticket_service::TicketService::new(pool.clone());

    // Seed the admin account when credentials are configured
    if let (Ok(username), Ok(password)) = (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_PASSWORD"),
    ) {
        user_service
            .ensure_admin(&username, &password)
            .await
            .expect("Failed to create admin user");
    }

    rocket::build()
        .manage(user_service)
        .manage(airport_service)
        .manage(route_service)
        .manage(airplane_service)
        .manage(crew_service)
        .manage(flight_service)
        .manage(order_service)
        .manage(ticket_service)
        .mount(
            "/api",
            openapi_get_routes![
                routes::user_route::register,
                routes::user_route::login,
                routes::user_route::me,
                routes::airport_route::list_airports,
                routes::airport_route::get_airport,
                routes::airport_route::create_airport,
                routes::airport_route::update_airport,
                routes::airport_route::delete_airport,
                routes::route_route::list_routes,
                routes::route_route::get_route,
                routes::route_route::create_route,
                routes::route_route::update_route,
                routes::route_route::delete_route,
                routes::airplane_route::list_airplane_types,
                routes::airplane_route::get_airplane_type,
                routes::airplane_route::create_airplane_type,
                routes::airplane_route::update_airplane_type,
                routes::airplane_route::delete_airplane_type,
                routes::airplane_route::list_airplanes,
                routes::airplane_route::get_airplane,
                routes::airplane_route::create_airplane,
                routes::airplane_route::update_airplane,
                routes::airplane_route::delete_airplane,
                routes::crew_route::list_crew,
                routes::crew_route::get_crew,
                routes::crew_route::create_crew,
                routes::crew_route::update_crew,
                routes::crew_route::delete_crew,
                routes::flight_route::list_flights,
                routes::flight_route::get_flight,
                routes::flight_route::get_availability,
                routes::flight_route::create_flight,
                routes::flight_route::update_flight,
                routes::flight_route::delete_flight,
                routes::order_route::list_orders,
                routes::order_route::get_order,
                routes::order_route::create_order,
                routes::order_route::add_tickets,
                routes::order_route::delete_order,
                routes::ticket_route::list_tickets,
                routes::ticket_route::get_ticket,
            ],
        )
        .mount("/swagger", make_swagger_ui(&swagger_ui()))
        .mount("/rapidoc", make_rapidoc(&rapidoc()))
        .attach(AdHoc::on_response("CORS", |_, res| {
            Box::pin(async move {
                res.set_header(rocket::http::Header::new(
                    "Access-Control-Allow-Origin",
                    "*",
                ));
            })
        }))
}
