use std::time::Duration;

use async_trait::async_trait;
use log::info;
use rand::{distributions::Alphanumeric, Rng};
use uuid::Uuid;

use crate::models::payment::{PaymentMethod, PaymentOutcome, PaymentRequest};

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn process(&self, request: &PaymentRequest) -> PaymentOutcome;
}

/// Stands in for the mobile-money push and card charge providers.
/// Every charge settles after a fixed delay with a synthetic transaction id.
pub struct MockPaymentGateway {
    delay: Duration,
}

impl MockPaymentGateway {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn process(&self, request: &PaymentRequest) -> PaymentOutcome {
        if request.amount <= 0.0 {
            return PaymentOutcome::failed("Nothing to charge for this booking");
        }

        match &request.method {
            PaymentMethod::PayLater => PaymentOutcome {
                success: true,
                transaction_id: Some(format!("PL-{}", Uuid::new_v4().simple())),
                status: "pending".to_string(),
                message: "Pay at the property on arrival".to_string(),
            },
            PaymentMethod::MobileMoney { phone } => {
                let msisdn = match normalize_msisdn(phone) {
                    Some(msisdn) => msisdn,
                    None => return PaymentOutcome::failed("Enter a valid mobile money number"),
                };
                info!(
                    "Sending mobile money prompt to {} for {:.2} {}",
                    msisdn, request.amount, request.currency
                );
                tokio::time::sleep(self.delay).await;
                PaymentOutcome {
                    success: true,
                    transaction_id: Some(receipt_code()),
                    status: "completed".to_string(),
                    message: format!("Payment received from {}", msisdn),
                }
            }
            PaymentMethod::Card {
                holder,
                number,
                expiry,
                cvc,
            } => {
                if let Err(reason) = validate_card(holder, number, expiry, cvc) {
                    return PaymentOutcome::failed(reason);
                }
                info!(
                    "Charging card ending {} for {:.2} {}",
                    last_four(number),
                    request.amount,
                    request.currency
                );
                tokio::time::sleep(self.delay).await;
                PaymentOutcome {
                    success: true,
                    transaction_id: Some(format!("ch_{}", Uuid::new_v4().simple())),
                    status: "completed".to_string(),
                    message: "Card payment approved".to_string(),
                }
            }
        }
    }
}

/// Kenyan mobile numbers in international form: `0712345678` and `+254712345678` become
/// `254712345678`.
pub fn normalize_msisdn(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    let national = if let Some(rest) = digits.strip_prefix("254") {
        rest
    } else if let Some(rest) = digits.strip_prefix('0') {
        rest
    } else {
        digits.as_str()
    };

    let valid = national.len() == 9 && (national.starts_with('7') || national.starts_with('1'));
    valid.then(|| format!("254{}", national))
}

pub fn luhn_valid(number: &str) -> bool {
    let digits: Vec<u32> = number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()
        .unwrap_or_default();
    if !(12..=19).contains(&digits.len()) {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

fn validate_card(holder: &str, number: &str, expiry: &str, cvc: &str) -> Result<(), &'static str> {
    if holder.trim().is_empty() {
        return Err("Card holder name is required");
    }
    if !luhn_valid(number) {
        return Err("Card number is invalid");
    }
    let valid_expiry = match expiry.split_once('/') {
        Some((month, year)) => {
            let month = month.trim().parse::<u32>().ok();
            let year_ok = year.trim().len() == 2 && year.trim().parse::<u32>().is_ok();
            matches!(month, Some(1..=12)) && year_ok
        }
        None => false,
    };
    if !valid_expiry {
        return Err("Expiry must be in MM/YY format");
    }
    if !(3..=4).contains(&cvc.len()) || !cvc.chars().all(|c| c.is_ascii_digit()) {
        return Err("Security code is invalid");
    }
    Ok(())
}

fn last_four(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(|c| c.is_ascii_digit()).collect();
    digits[digits.len().saturating_sub(4)..].iter().collect()
}

fn receipt_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect()
}
