use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::room::Room;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StayDates {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
}

impl StayDates {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            check_in: Some(check_in),
            check_out: Some(check_out),
        }
    }

    /// Both dates present and correctly ordered.
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) if check_out > check_in => {
                Some((check_in, check_out))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GuestContact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// In-memory, unsaved state of a booking while the guest walks the funnel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingDraft {
    pub dates: StayDates,
    pub guest_count: u32,
    pub selected_room: Option<Room>,
    pub contact: GuestContact,
    pub special_requests: String,
    pub add_ons: Vec<String>,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            dates: StayDates::default(),
            guest_count: 1,
            selected_room: None,
            contact: GuestContact::default(),
            special_requests: String::new(),
            add_ons: Vec::new(),
        }
    }
}

/// Payload handed to the booking API on final confirmation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BookingRequest {
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub guests: u32,
    pub guest: GuestContact,
    pub special_requests: Option<String>,
    pub add_ons: Vec<String>,
    pub total_price: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BookingReceipt {
    #[serde(alias = "booking_id")]
    pub id: String,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "pending".to_string()
}
