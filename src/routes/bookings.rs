use actix_web::{web, HttpResponse};

use super::AppState;
use crate::error::AppError;

/// Booking status for the confirmation page.
pub async fn get_booking(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let booking_id = path.into_inner();
    let receipt = state.controller.backend().get_booking(&booking_id).await?;
    Ok(HttpResponse::Ok().json(receipt))
}
