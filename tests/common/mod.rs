#![allow(dead_code)]

use std::{
    net::TcpListener,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use actix_web::{web, App};
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::time::sleep;

use stayfunnel::{
    config::AppConfig,
    error::ApiError,
    models::{
        booking::{BookingReceipt, BookingRequest},
        room::Room,
    },
    routes::{configure, AppState},
    services::{booking_api::BookingBackend, payment_service::MockPaymentGateway},
};

/// In-memory stand-in for the booking REST API.
pub struct FakeBackend {
    pub rooms: Vec<Room>,
    pub fail_rooms: AtomicBool,
    pub fail_submission: AtomicBool,
    pub submissions: Mutex<Vec<BookingRequest>>,
}

impl FakeBackend {
    pub fn new(rooms: Vec<Room>) -> Self {
        Self {
            rooms,
            fail_rooms: AtomicBool::new(false),
            fail_submission: AtomicBool::new(false),
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn set_fail_rooms(&self, fail: bool) {
        self.fail_rooms.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_submission(&self, fail: bool) {
        self.fail_submission.store(fail, Ordering::SeqCst);
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

#[async_trait]
impl BookingBackend for FakeBackend {
    async fn fetch_available_rooms(
        &self,
        _check_in: NaiveDate,
        _check_out: NaiveDate,
        guests: u32,
    ) -> Result<Vec<Room>, ApiError> {
        if self.fail_rooms.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 503,
                body: "catalog offline".to_string(),
            });
        }
        Ok(self
            .rooms
            .iter()
            .filter(|room| room.fits(guests))
            .cloned()
            .collect())
    }

    async fn create_booking(&self, request: &BookingRequest) -> Result<BookingReceipt, ApiError> {
        if self.fail_submission.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                body: "database unavailable".to_string(),
            });
        }
        let mut submissions = self.submissions.lock().unwrap();
        submissions.push(request.clone());
        Ok(BookingReceipt {
            id: format!("bk_{}", submissions.len()),
            status: "pending".to_string(),
        })
    }

    async fn get_booking(&self, booking_id: &str) -> Result<BookingReceipt, ApiError> {
        let submissions = self.submissions.lock().unwrap();
        let index: usize = booking_id
            .trim_start_matches("bk_")
            .parse()
            .map_err(|_| ApiError::Status {
                status: 404,
                body: "not found".to_string(),
            })?;
        if index == 0 || index > submissions.len() {
            return Err(ApiError::Status {
                status: 404,
                body: "not found".to_string(),
            });
        }
        Ok(BookingReceipt {
            id: booking_id.to_string(),
            status: "pending".to_string(),
        })
    }
}

pub fn sample_rooms() -> Vec<Room> {
    vec![
        Room {
            id: "ocean-suite".to_string(),
            name: "Ocean Suite".to_string(),
            nightly_rate: 300.0,
            capacity: 2,
            room_type: Some("suite".to_string()),
            view: Some("ocean".to_string()),
            image_url: None,
        },
        Room {
            id: "family-villa".to_string(),
            name: "Family Villa".to_string(),
            nightly_rate: 520.0,
            capacity: 6,
            room_type: Some("villa".to_string()),
            view: Some("garden".to_string()),
            image_url: None,
        },
    ]
}

pub struct TestApp {
    pub backend: Arc<FakeBackend>,
    pub state: web::Data<AppState>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_payment_delay(Duration::ZERO)
    }

    /// Mobile money and card charges settle only after `payment_delay`.
    pub fn with_payment_delay(payment_delay: Duration) -> Self {
        let config = AppConfig {
            payment_delay,
            close_delay: Duration::from_millis(50),
            ..AppConfig::default()
        };
        let backend = Arc::new(FakeBackend::new(sample_rooms()));
        let payments = Arc::new(MockPaymentGateway::new(config.payment_delay));
        let state = web::Data::new(AppState::new(&config, backend.clone(), payments));

        Self { backend, state }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .configure(configure)
    }
}

/// Reserves an ephemeral local port for a throwaway HTTP server.
pub fn free_listener() -> TcpListener {
    TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port")
}

pub async fn wait_for_server_ready(port: u16) {
    for _ in 0..30 {
        if reqwest::get(format!("http://127.0.0.1:{}/health", port))
            .await
            .is_ok()
        {
            return;
        }
        sleep(Duration::from_millis(100)).await;
    }
    panic!("Server failed to start within timeout");
}
