use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::info;

use stayfunnel::{
    config::AppConfig,
    routes::{self, AppState},
    services::{booking_api::RestBookingApi, payment_service::MockPaymentGateway},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    info!("Application starting...");

    let config = AppConfig::from_env();
    info!("Using booking API at {}", config.booking_api_url);

    let backend = Arc::new(RestBookingApi::new(
        config.booking_api_url.clone(),
        config.booking_api_token.clone(),
    ));
    let payments = Arc::new(MockPaymentGateway::new(config.payment_delay));
    let state = web::Data::new(AppState::new(&config, backend, payments));

    info!("Starting HTTP server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind((config.host.clone(), config.port))?
    .run()
    .await
}
