use serde::{Deserialize, Serialize};

/// A bookable room or suite as published by the room catalog.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub nightly_rate: f64,
    pub capacity: u32,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Room {
    pub fn fits(&self, guests: u32) -> bool {
        self.capacity >= guests
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AvailabilityQuery {
    pub check_in: chrono::NaiveDate,
    pub check_out: chrono::NaiveDate,
    #[serde(default = "default_guests")]
    pub guests: u32,
}

fn default_guests() -> u32 {
    1
}
