//! The booking funnel: dates, room selection, guest details, review, payment.
//!
//! [`Funnel`] is a pure state machine; [`FunnelController`] performs the network
//! calls it requests.

mod controller;
mod state;
mod step;

pub use controller::FunnelController;
pub use state::{Action, Effect, Funnel, FunnelOptions, PaymentPhase, RoomAvailability};
pub use step::Step;
