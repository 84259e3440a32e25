use std::{env, str::FromStr, time::Duration};

use log::warn;

use crate::models::add_on::AddOnCatalog;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const BOOKING_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub booking_api_url: String,
    pub booking_api_token: Option<String>,
    pub currency: String,
    pub payment_delay: Duration,
    pub close_delay: Duration,
    pub late_checkout_fee: f64,
    pub airport_pickup_fee: f64,
    pub breakfast_percent: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            booking_api_url: BOOKING_API_URL.to_string(),
            booking_api_token: None,
            currency: "USD".to_string(),
            payment_delay: Duration::from_millis(2000),
            close_delay: Duration::from_millis(3000),
            late_checkout_fee: 150.0,
            airport_pickup_fee: 75.0,
            breakfast_percent: 10.0,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            host: parsed("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            booking_api_url: parsed("BOOKING_API_URL").unwrap_or(defaults.booking_api_url),
            booking_api_token: parsed("BOOKING_API_TOKEN"),
            currency: parsed("CURRENCY")
                .map(|c| c.to_uppercase())
                .unwrap_or(defaults.currency),
            payment_delay: Duration::from_millis(parse_or(
                &lookup,
                "PAYMENT_DELAY_MS",
                defaults.payment_delay.as_millis() as u64,
            )),
            close_delay: Duration::from_millis(parse_or(
                &lookup,
                "FUNNEL_CLOSE_DELAY_MS",
                defaults.close_delay.as_millis() as u64,
            )),
            late_checkout_fee: parse_fee(&lookup, "LATE_CHECKOUT_FEE", defaults.late_checkout_fee),
            airport_pickup_fee: parse_fee(
                &lookup,
                "AIRPORT_PICKUP_FEE",
                defaults.airport_pickup_fee,
            ),
            breakfast_percent: parse_fee(&lookup, "BREAKFAST_PERCENT", defaults.breakfast_percent),
        }
    }

    pub fn add_on_catalog(&self) -> AddOnCatalog {
        AddOnCatalog::with_fees(
            self.late_checkout_fee,
            self.airport_pickup_fee,
            self.breakfast_percent,
        )
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid value for {}: {:?}", key, raw);
            default
        }),
        None => default,
    }
}

/// Fees and percentages must be finite and non-negative.
fn parse_fee<F>(lookup: &F, key: &str, default: f64) -> f64
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default);
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!("Ignoring invalid value for {}: {}", key, value);
        default
    }
}
