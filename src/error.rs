use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::services::{funnel::Step, validation::FieldErrors};

/// Reasons the funnel refuses an action. The funnel state is left consistent in every case.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FunnelError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// User-facing notification, shown as a toast.
    #[error("{0}")]
    Notice(String),

    #[error("Already on the first step")]
    AtFirstStep,

    #[error("{action} is not available on the {step} step")]
    WrongStep { action: &'static str, step: Step },

    #[error("Still waiting for {0}")]
    Busy(&'static str),

    #[error("Booking has already been submitted and can no longer be edited")]
    Submitted,

    #[error("Booking is complete")]
    Closed,
}

impl FunnelError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            FunnelError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Failures talking to the booking REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Booking API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response from booking API: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message safe to show to a guest.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => {
                "We could not reach the booking service. Please try again.".to_string()
            }
            ApiError::Status { status, .. } if *status == 404 => {
                "The requested booking could not be found.".to_string()
            }
            ApiError::Status { status, .. } if *status == 409 => {
                "That room is no longer available for the selected dates.".to_string()
            }
            ApiError::Status { .. } | ApiError::Decode(_) => {
                "The booking service could not process the request. Please try again."
                    .to_string()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Booking session {0} not found")]
    SessionNotFound(Uuid),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Funnel(#[from] FunnelError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub fn funnel_status(err: &FunnelError) -> StatusCode {
    match err {
        FunnelError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        FunnelError::Notice(_)
        | FunnelError::AtFirstStep
        | FunnelError::WrongStep { .. }
        | FunnelError::Busy(_)
        | FunnelError::Submitted
        | FunnelError::Closed => StatusCode::CONFLICT,
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Funnel(err) => funnel_status(err),
            AppError::Api(ApiError::Status { status: 404, .. }) => StatusCode::NOT_FOUND,
            AppError::Api(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Api(err) => err.user_message(),
            other => other.to_string(),
        };
        let mut body = json!({ "error": message });
        if let AppError::Funnel(FunnelError::Validation(fields)) = self {
            body["fields"] = json!(fields);
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}
