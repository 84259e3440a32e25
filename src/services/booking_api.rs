use async_trait::async_trait;
use chrono::NaiveDate;
use log::{info, warn};
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    error::ApiError,
    models::{
        booking::{BookingReceipt, BookingRequest},
        room::Room,
    },
};

/// The external booking-management API the funnel reads rooms from and submits bookings to.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    async fn fetch_available_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: u32,
    ) -> Result<Vec<Room>, ApiError>;

    async fn create_booking(&self, request: &BookingRequest) -> Result<BookingReceipt, ApiError>;

    async fn get_booking(&self, booking_id: &str) -> Result<BookingReceipt, ApiError>;
}

/// The API answers either with a bare payload or wrapped as `{"success": .., "data": ..}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(data) => data,
        }
    }
}

pub struct RestBookingApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl RestBookingApi {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Booking API responded with {}: {}", status, body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice::<Envelope<T>>(&bytes)
            .map(Envelope::into_inner)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl BookingBackend for RestBookingApi {
    async fn fetch_available_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: u32,
    ) -> Result<Vec<Room>, ApiError> {
        let request = self.client.get(self.url("rooms/available")).query(&[
            ("check_in", check_in.to_string()),
            ("check_out", check_out.to_string()),
            ("guests", guests.to_string()),
        ]);
        let response = self.authorize(request).send().await?;
        let rooms: Vec<Room> = Self::read_json(response).await?;

        Ok(rooms.into_iter().filter(|room| room.fits(guests)).collect())
    }

    async fn create_booking(&self, request: &BookingRequest) -> Result<BookingReceipt, ApiError> {
        info!(
            "Submitting booking for room {} ({} to {})",
            request.room_id, request.check_in, request.check_out
        );
        let response = self
            .authorize(self.client.post(self.url("bookings")).json(request))
            .send()
            .await?;
        let receipt: BookingReceipt = Self::read_json(response).await?;
        info!("Booking {} created with status {}", receipt.id, receipt.status);

        Ok(receipt)
    }

    async fn get_booking(&self, booking_id: &str) -> Result<BookingReceipt, ApiError> {
        let response = self
            .authorize(self.client.get(self.url(&format!("bookings/{}", booking_id))))
            .send()
            .await?;
        Self::read_json(response).await
    }
}
