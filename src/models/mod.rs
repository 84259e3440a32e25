pub mod add_on;
pub mod booking;
pub mod payment;
pub mod room;
