use crate::models::ticket::TicketResponse;
use crate::services::ticket_service::TicketService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// List the caller's tickets, ordered by row then seat
#[openapi(tag = "Tickets")]
#[get("/tickets")]
pub async fn list_tickets(
    auth: AuthenticatedUser,
    ticket_service: &State<TicketService>,
) -> Result<Json<Vec<TicketResponse>>, AppError> {
    let tickets = ticket_service.list_my_tickets(auth.actor()).await?;
    Ok(Json(tickets))
}

/// Get one ticket with its flight details
#[openapi(tag = "Tickets")]
#[get("/tickets/<id>")]
pub async fn get_ticket(
    id: i64,
    auth: AuthenticatedUser,
    ticket_service: &State<TicketService>,
) -> Result<Json<TicketResponse>, AppError> {
    let ticket = ticket_service.get_ticket(auth.actor(), id).await?;
    Ok(Json(ticket))
}
