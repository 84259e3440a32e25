use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::Deserialize;

use super::AppState;
use crate::{
    error::{AppError, FunnelError},
    models::booking::StayDates,
    services::{pricing_service::PricingService, validation::FieldErrors},
};

#[derive(Debug, Deserialize)]
pub struct QuoteInput {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub nightly_rate: f64,
    #[serde(default)]
    pub add_ons: Vec<String>,
}

pub async fn list_add_ons(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.catalog.as_ref())
}

/// Price preview for the room cards; never touches a session.
pub async fn quote(
    state: web::Data<AppState>,
    input: web::Json<QuoteInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();

    if input.nightly_rate < 0.0 {
        let mut errors = FieldErrors::default();
        errors.insert("nightly_rate", "Nightly rate cannot be negative");
        return Err(FunnelError::Validation(errors).into());
    }
    if let Some(unknown) = input.add_ons.iter().find(|id| !state.catalog.contains(id)) {
        return Err(AppError::BadRequest(format!("Unknown add-on: {}", unknown)));
    }

    let dates = StayDates {
        check_in: input.check_in,
        check_out: input.check_out,
    };
    let quote = PricingService::quote(
        &dates,
        input.nightly_rate,
        &input.add_ons,
        &state.catalog,
        &state.currency,
    );
    Ok(HttpResponse::Ok().json(quote))
}
