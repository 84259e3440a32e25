use std::sync::Arc;

use log::{info, warn};
use tokio::sync::Mutex;

use super::state::{Action, Effect, Funnel};
use crate::{
    error::FunnelError,
    services::{booking_api::BookingBackend, payment_service::PaymentGateway},
};

/// Runs the effects a [`Funnel`] asks for and feeds their results back into it.
#[derive(Clone)]
pub struct FunnelController {
    backend: Arc<dyn BookingBackend>,
    payments: Arc<dyn PaymentGateway>,
}

impl FunnelController {
    pub fn new(backend: Arc<dyn BookingBackend>, payments: Arc<dyn PaymentGateway>) -> Self {
        Self { backend, payments }
    }

    pub fn backend(&self) -> &Arc<dyn BookingBackend> {
        &self.backend
    }

    /// Applies `action`, then performs any follow-up work until the funnel settles.
    /// The lock is released while a collaborator call runs, so the session stays readable
    /// and the reducer answers `Busy` for input that would collide with the call.
    /// A failed submission or payment is reported as a notice; the funnel keeps its state.
    pub async fn dispatch(
        &self,
        funnel: &Mutex<Funnel>,
        action: Action,
    ) -> Result<(), FunnelError> {
        let mut pending = funnel.lock().await.reduce(action)?;

        while let Some(effect) = pending.take() {
            let result = self.perform(effect).await;
            let failure = result.failure_message().map(str::to_string);
            pending = funnel.lock().await.reduce(result)?;
            if let Some(message) = failure {
                return Err(FunnelError::Notice(message));
            }
        }

        Ok(())
    }

    async fn perform(&self, effect: Effect) -> Action {
        match effect {
            Effect::FetchRooms {
                check_in,
                check_out,
                guests,
            } => match self
                .backend
                .fetch_available_rooms(check_in, check_out, guests)
                .await
            {
                Ok(rooms) => {
                    info!(
                        "{} rooms available {} to {} for {} guests",
                        rooms.len(),
                        check_in,
                        check_out,
                        guests
                    );
                    Action::RoomsLoaded(rooms)
                }
                Err(err) => {
                    warn!("Failed to fetch room availability: {}", err);
                    Action::RoomsFailed(err.user_message())
                }
            },
            Effect::SubmitBooking(request) => match self.backend.create_booking(&request).await {
                Ok(receipt) => Action::SubmissionSucceeded(receipt),
                Err(err) => {
                    warn!("Booking submission failed: {}", err);
                    Action::SubmissionFailed(err.user_message())
                }
            },
            Effect::ProcessPayment(request) => {
                let outcome = self.payments.process(&request).await;
                if outcome.success {
                    info!(
                        "Payment for booking {} settled via {}",
                        request.booking_id,
                        request.method.label()
                    );
                } else {
                    warn!(
                        "Payment for booking {} failed: {}",
                        request.booking_id, outcome.message
                    );
                }
                Action::PaymentFinished(outcome)
            }
        }
    }
}
