use std::{sync::Arc, time::Duration};

use actix_web::web;

use crate::{
    config::AppConfig,
    models::add_on::AddOnCatalog,
    services::{
        booking_api::BookingBackend, funnel::FunnelController, payment_service::PaymentGateway,
        session_store::SessionStore,
    },
};

pub mod bookings;
pub mod funnel;
pub mod health;
pub mod quote;
pub mod rooms;

/// Shared application state handed to every handler.
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub controller: FunnelController,
    pub catalog: Arc<AddOnCatalog>,
    pub currency: String,
    pub close_delay: Duration,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        backend: Arc<dyn BookingBackend>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            sessions: Arc::new(SessionStore::new()),
            controller: FunnelController::new(backend, payments),
            catalog: Arc::new(config.add_on_catalog()),
            currency: config.currency.clone(),
            close_delay: config.close_delay,
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .route("/add-ons", web::get().to(quote::list_add_ons))
                .route("/quote", web::post().to(quote::quote))
                .route(
                    "/rooms/available",
                    web::get().to(rooms::get_available_rooms),
                )
                .route("/bookings/{id}", web::get().to(bookings::get_booking))
                .service(
                    web::scope("/funnels")
                        .route("", web::post().to(funnel::open))
                        .route("/{id}", web::get().to(funnel::get))
                        .route("/{id}", web::delete().to(funnel::cancel))
                        .route("/{id}/dates", web::put().to(funnel::set_dates))
                        .route("/{id}/room", web::put().to(funnel::select_room))
                        .route("/{id}/contact", web::put().to(funnel::set_contact))
                        .route("/{id}/add-ons", web::put().to(funnel::set_add_ons))
                        .route("/{id}/next", web::post().to(funnel::next))
                        .route("/{id}/back", web::post().to(funnel::back))
                        .route("/{id}/pay", web::post().to(funnel::pay))
                        .route(
                            "/{id}/notice/dismiss",
                            web::post().to(funnel::dismiss_notice),
                        ),
                ),
        );
}
