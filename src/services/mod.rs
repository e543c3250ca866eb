pub mod airplane_service;
pub mod airport_service;
pub mod crew_service;
pub mod flight_service;
pub mod order_service;
pub mod route_service;
pub mod ticket_service;
pub mod user_service;
