use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    MobileMoney {
        phone: String,
    },
    Card {
        holder: String,
        number: String,
        expiry: String,
        cvc: String,
    },
    PayLater,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::MobileMoney { .. } => "mobile_money",
            PaymentMethod::Card { .. } => "card",
            PaymentMethod::PayLater => "pay_later",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PaymentRequest {
    pub booking_id: String,
    pub amount: f64,
    pub currency: String,
    pub method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PaymentOutcome {
    pub success: bool,
    pub transaction_id: Option<String>,
    pub status: String,
    pub message: String,
}

impl PaymentOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            transaction_id: None,
            status: "failed".to_string(),
            message: message.into(),
        }
    }
}

/// One try at paying for a booking. Failed attempts are kept so the form can be shown again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentAttempt {
    pub method: String,
    pub outcome: PaymentOutcome,
}
