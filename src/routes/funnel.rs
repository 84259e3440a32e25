use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::AppState;
use crate::{
    error::{funnel_status, AppError},
    models::{
        booking::{BookingDraft, BookingReceipt, GuestContact},
        payment::{PaymentAttempt, PaymentMethod},
    },
    services::{
        funnel::{Action, Funnel, FunnelOptions, PaymentPhase, RoomAvailability, Step},
        pricing_service::PriceQuote,
        validation::FieldErrors,
    },
};

/// What the front end renders for one open booking funnel.
#[derive(Debug, Serialize)]
pub struct FunnelView {
    pub id: Uuid,
    pub step: Step,
    pub step_index: usize,
    pub draft: BookingDraft,
    pub rooms: RoomAvailability,
    pub quote: PriceQuote,
    pub booking: Option<BookingReceipt>,
    pub payment: PaymentPhase,
    pub attempts: Vec<PaymentAttempt>,
    pub errors: FieldErrors,
    pub notice: Option<String>,
    pub submitting: bool,
    pub complete: bool,
}

impl FunnelView {
    pub fn new(id: Uuid, funnel: &Funnel) -> Self {
        Self {
            id,
            step: funnel.step(),
            step_index: funnel.step().index(),
            draft: funnel.draft().clone(),
            rooms: funnel.rooms().clone(),
            quote: funnel.quote(),
            booking: funnel.receipt().cloned(),
            payment: funnel.payment().clone(),
            attempts: funnel.attempts().to_vec(),
            errors: funnel.errors().clone(),
            notice: funnel.notice().map(str::to_string),
            submitting: funnel.is_submitting(),
            complete: funnel.is_complete(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenFunnelInput {
    pub preselected_room_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DatesInput {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RoomInput {
    pub room_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ContactInput {
    #[serde(flatten)]
    pub contact: GuestContact,
    pub special_requests: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddOnsInput {
    pub add_ons: Vec<String>,
}

pub async fn open(
    state: web::Data<AppState>,
    input: Option<web::Json<OpenFunnelInput>>,
) -> HttpResponse {
    let input = input.map(|json| json.into_inner()).unwrap_or_default();
    let options = FunnelOptions {
        preselected_room_id: input.preselected_room_id,
        currency: state.currency.clone(),
    };
    let funnel = Funnel::new(options, state.catalog.clone());
    let view_funnel = funnel.clone();
    let id = state.sessions.open(funnel).await;
    info!("Booking funnel {} opened", id);

    HttpResponse::Created().json(FunnelView::new(id, &view_funnel))
}

pub async fn get(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let funnel = state
        .sessions
        .get(&id)
        .await
        .ok_or(AppError::SessionNotFound(id))?;
    let funnel = funnel.lock().await;
    Ok(HttpResponse::Ok().json(FunnelView::new(id, &funnel)))
}

/// Closing the wizard discards the draft.
pub async fn cancel(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if !state.sessions.remove(&id).await {
        return Err(AppError::SessionNotFound(id));
    }
    info!("Booking funnel {} cancelled", id);
    Ok(HttpResponse::NoContent().finish())
}

pub async fn set_dates(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<DatesInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    let mut actions = vec![Action::SetDates {
        check_in: input.check_in,
        check_out: input.check_out,
    }];
    if let Some(guests) = input.guests {
        actions.push(Action::SetGuestCount(guests));
    }
    apply(&state, path.into_inner(), actions).await
}

pub async fn select_room(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<RoomInput>,
) -> Result<HttpResponse, AppError> {
    let action = Action::SelectRoom(input.into_inner().room_id);
    apply(&state, path.into_inner(), vec![action]).await
}

pub async fn set_contact(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<ContactInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    let mut actions = vec![Action::SetContact(input.contact)];
    if let Some(text) = input.special_requests {
        actions.push(Action::SetSpecialRequests(text));
    }
    apply(&state, path.into_inner(), actions).await
}

pub async fn set_add_ons(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<AddOnsInput>,
) -> Result<HttpResponse, AppError> {
    let action = Action::SetAddOns(input.into_inner().add_ons);
    apply(&state, path.into_inner(), vec![action]).await
}

pub async fn next(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    apply(&state, path.into_inner(), vec![Action::Next]).await
}

pub async fn back(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    apply(&state, path.into_inner(), vec![Action::Back]).await
}

pub async fn pay(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<PaymentMethod>,
) -> Result<HttpResponse, AppError> {
    apply(&state, path.into_inner(), vec![Action::Pay(input.into_inner())]).await
}

pub async fn dismiss_notice(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    apply(&state, path.into_inner(), vec![Action::DismissNotice]).await
}

/// Runs `actions` in order against one session, stopping at the first refusal.
/// Refusals still return the funnel so the UI can show field errors and notices.
///
/// A failed room fetch after `next` on the dates step is not a refusal: the funnel has moved
/// to room selection and the response is 200 with `rooms.status = "failed"` and the notice set.
async fn apply(
    state: &AppState,
    id: Uuid,
    actions: Vec<Action>,
) -> Result<HttpResponse, AppError> {
    let shared = state
        .sessions
        .get(&id)
        .await
        .ok_or(AppError::SessionNotFound(id))?;
    let was_complete = shared.lock().await.is_complete();

    let mut outcome = Ok(());
    for action in actions {
        outcome = state.controller.dispatch(&shared, action).await;
        if outcome.is_err() {
            break;
        }
    }

    let funnel = shared.lock().await;
    if !was_complete && funnel.is_complete() {
        info!("Booking funnel {} completed", id);
        state.sessions.schedule_close(id, state.close_delay);
    }

    let view = FunnelView::new(id, &funnel);
    Ok(match outcome {
        Ok(()) => HttpResponse::Ok().json(view),
        Err(err) => HttpResponse::build(funnel_status(&err)).json(json!({
            "error": err.to_string(),
            "fields": err.field_errors(),
            "funnel": view,
        })),
    })
}
