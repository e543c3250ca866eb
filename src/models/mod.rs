pub mod airplane;
pub mod airport;
pub mod crew;
pub mod flight;
pub mod order;
pub mod route;
pub mod ticket;
pub mod user;
