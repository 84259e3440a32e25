use actix_web::{web, HttpResponse};

use super::AppState;
use crate::{error::AppError, models::room::AvailabilityQuery};

pub async fn get_available_rooms(
    state: web::Data<AppState>,
    query: web::Query<AvailabilityQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    if query.check_out <= query.check_in {
        return Err(AppError::BadRequest(
            "check_out must be after check_in".to_string(),
        ));
    }
    if query.guests == 0 {
        return Err(AppError::BadRequest("guests must be at least 1".to_string()));
    }

    let rooms = state
        .controller
        .backend()
        .fetch_available_rooms(query.check_in, query.check_out, query.guests)
        .await?;
    Ok(HttpResponse::Ok().json(rooms))
}
